pub mod app_config;
pub mod config;
pub mod display;
pub mod projection;
pub mod types;

pub use app_config::{AppConfig, BulkOpenPolicy, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use projection::{project, Projection};
pub use types::{
    ClearHistoryResponse, DeleteFavoriteResponse, Favorite, FavoriteCreate, FavoritesResponse,
    HistoryEntry, HistoryResponse, ParsedQuery, PriceRange, ResultStatus, SearchRequest,
    SearchResponse, VendorResult,
};

use thiserror::Error;

/// Errors raised while loading client configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
