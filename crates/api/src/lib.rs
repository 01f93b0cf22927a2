//! # Helmdesk API
//!
//! HTTP application layer - routes and main entry point.
//!
//! This crate contains:
//! - axum routes (REST surface for the SLA and hour-bank engines)
//! - Application context (dependency injection)
//! - Request/response DTOs and API error mapping
//!
//! ## Architecture
//! - Depends on `domain`, `core`, and `infra`
//! - Wires up the hexagonal architecture
//! - Tenant identity arrives from the external auth layer as headers

pub mod context;
pub mod error;
pub mod extract;
pub mod routes;

// Re-export for convenience
pub use context::AppContext;
pub use error::{ApiError, ApiResult};
pub use routes::router;
