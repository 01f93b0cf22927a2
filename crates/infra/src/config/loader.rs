//! Configuration loader
//!
//! Loads application configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If incomplete, falls back to loading from file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `HELMDESK_DB_PATH`: Database file path
//! - `HELMDESK_DB_POOL_SIZE`: Connection pool size
//! - `HELMDESK_BIND_ADDR`: HTTP bind address, e.g. `127.0.0.1:8080`
//! - `HELMDESK_ALLOW_OVERDRAW`: Permit hour-bank overdraw (true/false)
//! - `HELMDESK_ALLOW_INACTIVE_BANK_DEBIT`: Permit debits against expired or
//!   inactive banks (true/false)
//!
//! ## File Locations
//! The loader probes `config.{json,toml}` and `helmdesk.{json,toml}` in the
//! working directory, its parents (two levels), and next to the executable.

use std::path::{Path, PathBuf};

use helmdesk_domain::{Config, DatabaseConfig, DebitPolicy, HelmdeskError, Result, ServerConfig};

/// Load configuration with automatic fallback strategy
///
/// First attempts to load from environment variables. If any required
/// variables are missing, falls back to loading from a config file.
///
/// # Errors
/// Returns `HelmdeskError::Configuration` if:
/// - Configuration cannot be loaded from either source
/// - File format is invalid
/// - Required fields are missing
pub fn load() -> Result<Config> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = ?e, "Failed to load from environment, trying file");
            load_from_file(None)
        }
    }
}

/// Load configuration from environment variables
///
/// All required environment variables must be present. Returns an error
/// if any are missing.
///
/// # Errors
/// Returns `HelmdeskError::Configuration` if required variables are
/// missing or have invalid values.
pub fn load_from_env() -> Result<Config> {
    let db_path = env_var("HELMDESK_DB_PATH")?;
    let db_pool_size = env_var("HELMDESK_DB_POOL_SIZE").and_then(|s| {
        s.parse::<u32>()
            .map_err(|e| HelmdeskError::Configuration(format!("Invalid pool size: {e}")))
    })?;
    let bind_addr = env_var("HELMDESK_BIND_ADDR")?;

    let allow_overdraw = env_bool("HELMDESK_ALLOW_OVERDRAW", true);
    let allow_inactive_bank_debit = env_bool("HELMDESK_ALLOW_INACTIVE_BANK_DEBIT", true);

    Ok(Config {
        database: DatabaseConfig { path: db_path, pool_size: db_pool_size },
        server: ServerConfig { bind_addr },
        debit: DebitPolicy { allow_overdraw, allow_inactive_bank_debit },
    })
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `HelmdeskError::Configuration` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
/// - Required fields are missing
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(HelmdeskError::Configuration(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            HelmdeskError::Configuration(
                "No config file found in any of the standard locations".to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| HelmdeskError::Configuration(format!("Failed to read config file: {e}")))?;

    parse_config(&contents, &config_path)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| HelmdeskError::Configuration(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| HelmdeskError::Configuration(format!("Invalid JSON format: {e}"))),
        _ => Err(HelmdeskError::Configuration(format!("Unsupported config format: {extension}"))),
    }
}

/// Probe multiple paths for configuration files
///
/// Searches the working directory, its parents (two levels), and the
/// executable's directory, in that order.
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut candidates = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        candidates.extend(vec![
            cwd.join("config.json"),
            cwd.join("config.toml"),
            cwd.join("helmdesk.json"),
            cwd.join("helmdesk.toml"),
            cwd.join("../config.json"),
            cwd.join("../config.toml"),
            cwd.join("../../config.json"),
            cwd.join("../../config.toml"),
        ]);
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            candidates.extend(vec![
                exe_dir.join("config.json"),
                exe_dir.join("config.toml"),
                exe_dir.join("helmdesk.json"),
                exe_dir.join("helmdesk.toml"),
            ]);
        }
    }

    candidates.into_iter().find(|path| path.exists())
}

/// Get required environment variable
fn env_var(name: &str) -> Result<String> {
    std::env::var(name).map_err(|_| {
        HelmdeskError::Configuration(format!("Missing environment variable: {name}"))
    })
}

/// Boolean environment variable with a default
fn env_bool(name: &str, default: bool) -> bool {
    std::env::var(name)
        .map(|value| matches!(value.to_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}
