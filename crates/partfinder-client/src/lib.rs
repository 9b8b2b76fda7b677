pub mod client;
pub mod error;
mod favorites;
mod history;

pub use client::PartfinderClient;
pub use error::ClientError;
