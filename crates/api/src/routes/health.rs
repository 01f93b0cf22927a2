//! Liveness and database connectivity probe.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::context::AppContext;
use crate::error::ApiResult;

/// Health response body.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Check process liveness and database reachability.
pub async fn health(State(ctx): State<AppContext>) -> ApiResult<Json<HealthResponse>> {
    let db = ctx.db.clone();
    tokio::task::spawn_blocking(move || db.health_check())
        .await
        .map_err(|err| {
            helmdesk_domain::HelmdeskError::Internal(format!("health check task failed: {err}"))
        })??;

    Ok(Json(HealthResponse { status: "ok" }))
}
