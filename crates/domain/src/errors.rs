//! Error types used throughout the application

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for Helmdesk
#[derive(Error, Debug, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum HelmdeskError {
    #[error("Database error: {0}")]
    Database(String),

    /// Degenerate SLA configuration (zero-length business window, empty
    /// business-day set). Distinct from "no SLA applies", which is a valid
    /// empty lookup result, not an error.
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for Helmdesk operations
pub type Result<T> = std::result::Result<T, HelmdeskError>;
