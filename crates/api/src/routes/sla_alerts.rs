//! HTTP handlers for SLA alerts.

use axum::extract::{Query, State};
use axum::Json;
use helmdesk_domain::SlaAlert;
use serde::Deserialize;

use crate::context::AppContext;
use crate::error::ApiResult;
use crate::extract::TenantId;

/// List filter; limits are clamped server-side.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ListAlertsQuery {
    #[serde(default)]
    pub limit: Option<i64>,
    #[serde(default)]
    pub offset: Option<i64>,
}

/// One page of the tenant's unresolved alerts, newest first.
pub async fn list(
    State(ctx): State<AppContext>,
    TenantId(tenant_id): TenantId,
    Query(query): Query<ListAlertsQuery>,
) -> ApiResult<Json<Vec<SlaAlert>>> {
    let alerts = ctx.sla.unresolved_alerts(tenant_id, query.limit, query.offset).await?;
    Ok(Json(alerts))
}
