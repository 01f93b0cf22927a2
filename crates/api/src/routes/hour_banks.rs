//! HTTP handlers for hour banks.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use helmdesk_core::hourbank::service::HourBankDraft;
use helmdesk_domain::HourBankSummary;
use serde::Deserialize;
use uuid::Uuid;

use crate::context::AppContext;
use crate::error::ApiResult;
use crate::extract::TenantId;

/// Create request; unknown fields are rejected.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateHourBankRequest {
    pub customer_id: Uuid,
    pub total_hours: f64,
    #[serde(default)]
    pub hourly_rate: Option<f64>,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

/// List filter; limits are clamped server-side.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ListHourBanksQuery {
    #[serde(default)]
    pub customer_id: Option<Uuid>,
    #[serde(default)]
    pub limit: Option<i64>,
    #[serde(default)]
    pub offset: Option<i64>,
}

/// One page of the tenant's banks with derived balance fields.
pub async fn list(
    State(ctx): State<AppContext>,
    TenantId(tenant_id): TenantId,
    Query(query): Query<ListHourBanksQuery>,
) -> ApiResult<Json<Vec<HourBankSummary>>> {
    let banks = ctx
        .hour_banks
        .list_banks(tenant_id, query.customer_id, query.limit, query.offset, Utc::now())
        .await?;
    Ok(Json(banks))
}

/// Fetch one bank with derived balance fields.
pub async fn get(
    State(ctx): State<AppContext>,
    TenantId(tenant_id): TenantId,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<HourBankSummary>> {
    let bank = ctx.hour_banks.get_bank(tenant_id, id, Utc::now()).await?;
    Ok(Json(bank))
}

/// Open a new bank for a customer.
pub async fn create(
    State(ctx): State<AppContext>,
    TenantId(tenant_id): TenantId,
    Json(request): Json<CreateHourBankRequest>,
) -> ApiResult<(StatusCode, Json<HourBankSummary>)> {
    let draft = HourBankDraft {
        customer_id: request.customer_id,
        total_hours: request.total_hours,
        hourly_rate: request.hourly_rate,
        expires_at: request.expires_at,
    };

    let bank = ctx.hour_banks.create_bank(tenant_id, draft).await?;
    let summary = ctx.hour_banks.get_bank(tenant_id, bank.id, Utc::now()).await?;
    Ok((StatusCode::CREATED, Json(summary)))
}
