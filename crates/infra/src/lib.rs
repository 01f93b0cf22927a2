//! # Helmdesk Infra
//!
//! Infrastructure adapters for the Helmdesk core.
//!
//! This crate contains:
//! - SQLite-backed repository implementations of the core ports
//! - Database connection management and schema migrations
//! - Configuration loading (environment variables and config files)
//!
//! ## Architecture
//! - Depends on `helmdesk-domain` and `helmdesk-core`
//! - Implements the port traits defined in core
//! - All blocking database work is bridged via `spawn_blocking`

pub mod config;
pub mod database;
pub mod errors;

pub use database::DbManager;
pub use errors::InfraError;
