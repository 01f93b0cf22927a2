//! Infrastructure error types and mappings into the domain error

use helmdesk_domain::HelmdeskError;
use thiserror::Error;

/// Errors raised by infrastructure adapters
#[derive(Debug, Error)]
pub enum InfraError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("connection pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config error: {0}")]
    Config(String),
}

impl From<InfraError> for HelmdeskError {
    fn from(err: InfraError) -> Self {
        match err {
            InfraError::Config(message) => Self::Configuration(message),
            other => Self::Database(other.to_string()),
        }
    }
}
