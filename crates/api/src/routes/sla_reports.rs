//! HTTP handlers for SLA reports and per-ticket status.

use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::{NaiveDate, NaiveTime, TimeZone, Utc};
use helmdesk_domain::{SlaReport, TicketSlaStatus};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::context::AppContext;
use crate::error::{ApiError, ApiResult};
use crate::extract::TenantId;

/// Report range; both dates inclusive, `YYYY-MM-DD`.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReportQuery {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// Per-ticket evaluation; `sla_applies = false` means no active config
/// matched and tracking is off for this ticket.
#[derive(Debug, Serialize)]
pub struct TicketSlaStatusResponse {
    pub sla_applies: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TicketSlaStatus>,
}

/// Aggregate compliance over the requested date range.
pub async fn report(
    State(ctx): State<AppContext>,
    TenantId(tenant_id): TenantId,
    Query(query): Query<ReportQuery>,
) -> ApiResult<Json<SlaReport>> {
    if query.end_date < query.start_date {
        return Err(ApiError::Validation("end_date must not precede start_date".into()));
    }

    let start = Utc.from_utc_datetime(&query.start_date.and_time(NaiveTime::MIN));
    let end_date = query.end_date.succ_opt().ok_or_else(|| {
        ApiError::Validation("end_date is out of the representable range".into())
    })?;
    let end = Utc.from_utc_datetime(&end_date.and_time(NaiveTime::MIN));

    let report = ctx.sla.build_report(tenant_id, start, end, Utc::now()).await?;
    Ok(Json(report))
}

/// Evaluate one ticket's deadlines, recording any newly crossed alerts.
pub async fn ticket_status(
    State(ctx): State<AppContext>,
    TenantId(tenant_id): TenantId,
    Path(ticket_id): Path<Uuid>,
) -> ApiResult<Json<TicketSlaStatusResponse>> {
    let status = ctx.sla.evaluate_and_alert(tenant_id, ticket_id, Utc::now()).await?;
    Ok(Json(TicketSlaStatusResponse { sla_applies: status.is_some(), status }))
}
