#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// How a bulk "open all results" request is carried out.
///
/// `OpenImmediately` opens every ready result in one pass and offers
/// popup-recovery guidance afterwards. `ConfirmFirst` asks the user to
/// confirm the number of tabs before the pass starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BulkOpenPolicy {
    #[default]
    OpenImmediately,
    ConfirmFirst,
}

impl std::fmt::Display for BulkOpenPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BulkOpenPolicy::OpenImmediately => write!(f, "open-immediately"),
            BulkOpenPolicy::ConfirmFirst => write!(f, "confirm-first"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Base URL of the parts-search backend, without a trailing slash.
    pub api_url: String,
    pub env: Environment,
    pub log_level: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub history_limit: u32,
    /// Optional vendor filter sent with every search; `None` lets the
    /// backend use its own default vendor list.
    pub vendors: Option<Vec<String>>,
    pub bulk_open_policy: BulkOpenPolicy,
    pub recovery_delay_ms: u64,
}
