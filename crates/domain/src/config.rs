//! Application configuration structures
//!
//! Typed configuration loaded by the infra layer from environment variables
//! or config files. See `helmdesk-infra::config` for the loading strategy.

use serde::{Deserialize, Serialize};

/// Top-level application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    #[serde(default)]
    pub debit: DebitPolicy,
}

/// Database settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite database file path
    pub path: String,
    /// Connection pool size
    pub pool_size: u32,
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address, e.g. "127.0.0.1:8080"
    pub bind_addr: String,
}

/// Policy governing hour-bank debits.
///
/// The ledger does not clamp `consumed_hours` to `total_hours`, and debits
/// against expired or inactive banks are accepted by default (overage
/// billing). Tenants that want hard enforcement flip these flags.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DebitPolicy {
    /// Permit debits that push `consumed_hours` past `total_hours`
    pub allow_overdraw: bool,
    /// Permit debits against expired or deactivated banks
    pub allow_inactive_bank_debit: bool,
}

impl Default for DebitPolicy {
    fn default() -> Self {
        Self { allow_overdraw: true, allow_inactive_bank_debit: true }
    }
}
