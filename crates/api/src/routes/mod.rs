//! Router configuration for the Helmdesk API.

use axum::routing::{get, patch};
use axum::Router;

use crate::context::AppContext;

pub mod health;
pub mod hour_banks;
pub mod sla_alerts;
pub mod sla_configs;
pub mod sla_reports;
pub mod time_entries;

/// Assemble the full API router over the application context.
pub fn router(ctx: AppContext) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/sla/configs", get(sla_configs::list).post(sla_configs::create))
        .route(
            "/sla/configs/{id}",
            get(sla_configs::get)
                .patch(sla_configs::update)
                .delete(sla_configs::deactivate),
        )
        .route("/sla/alerts", get(sla_alerts::list))
        .route("/sla/reports", get(sla_reports::report))
        .route("/sla/tickets/{id}/status", get(sla_reports::ticket_status))
        .route("/hour-banks", get(hour_banks::list).post(hour_banks::create))
        .route("/hour-banks/{id}", get(hour_banks::get))
        .route("/time-entries", get(time_entries::list).post(time_entries::create))
        .route("/time-entries/{id}", patch(time_entries::stop))
        .with_state(ctx)
}
