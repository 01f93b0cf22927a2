//! HTTP handlers for SLA configuration management.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveTime;
use helmdesk_core::sla::service::{SlaConfigDraft, SlaConfigPatch};
use helmdesk_domain::{SlaConfig, TicketPriority};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::context::AppContext;
use crate::error::{ApiError, ApiResult};
use crate::extract::TenantId;

/// Create request; unknown fields are rejected.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateSlaConfigRequest {
    pub priority: TicketPriority,
    #[serde(default)]
    pub category_id: Option<Uuid>,
    pub first_response_minutes: i64,
    pub resolution_minutes: i64,
    /// `HH:MM`, tenant-local
    pub business_hours_start: String,
    /// `HH:MM`, tenant-local
    pub business_hours_end: String,
    /// Weekday indices, 0 = Sunday .. 6 = Saturday
    pub business_days: Vec<u8>,
    /// IANA timezone name
    pub timezone: String,
}

/// Update request; absent fields keep their stored value.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateSlaConfigRequest {
    #[serde(default)]
    pub first_response_minutes: Option<i64>,
    #[serde(default)]
    pub resolution_minutes: Option<i64>,
    #[serde(default)]
    pub business_hours_start: Option<String>,
    #[serde(default)]
    pub business_hours_end: Option<String>,
    #[serde(default)]
    pub business_days: Option<Vec<u8>>,
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

/// Wire form of a config; times rendered as `HH:MM`.
#[derive(Debug, Serialize)]
pub struct SlaConfigResponse {
    pub id: Uuid,
    pub priority: TicketPriority,
    pub category_id: Option<Uuid>,
    pub first_response_minutes: i64,
    pub resolution_minutes: i64,
    pub business_hours_start: String,
    pub business_hours_end: String,
    pub business_days: Vec<u8>,
    pub timezone: String,
    pub is_active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<SlaConfig> for SlaConfigResponse {
    fn from(config: SlaConfig) -> Self {
        Self {
            id: config.id,
            priority: config.priority,
            category_id: config.category_id,
            first_response_minutes: config.first_response_minutes,
            resolution_minutes: config.resolution_minutes,
            business_hours_start: config.business_hours_start.format("%H:%M").to_string(),
            business_hours_end: config.business_hours_end.format("%H:%M").to_string(),
            business_days: config.business_days,
            timezone: config.timezone,
            is_active: config.is_active,
            created_at: config.created_at,
            updated_at: config.updated_at,
        }
    }
}

/// List the tenant's SLA configs.
pub async fn list(
    State(ctx): State<AppContext>,
    TenantId(tenant_id): TenantId,
) -> ApiResult<Json<Vec<SlaConfigResponse>>> {
    let configs = ctx.sla.list_configs(tenant_id).await?;
    Ok(Json(configs.into_iter().map(SlaConfigResponse::from).collect()))
}

/// Fetch one SLA config.
pub async fn get(
    State(ctx): State<AppContext>,
    TenantId(tenant_id): TenantId,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<SlaConfigResponse>> {
    let config = ctx.sla.get_config(tenant_id, id).await?;
    Ok(Json(config.into()))
}

/// Create an SLA config.
pub async fn create(
    State(ctx): State<AppContext>,
    TenantId(tenant_id): TenantId,
    Json(request): Json<CreateSlaConfigRequest>,
) -> ApiResult<(StatusCode, Json<SlaConfigResponse>)> {
    let draft = SlaConfigDraft {
        priority: request.priority,
        category_id: request.category_id,
        first_response_minutes: request.first_response_minutes,
        resolution_minutes: request.resolution_minutes,
        business_hours_start: parse_hhmm("business_hours_start", &request.business_hours_start)?,
        business_hours_end: parse_hhmm("business_hours_end", &request.business_hours_end)?,
        business_days: request.business_days,
        timezone: request.timezone,
    };

    let config = ctx.sla.create_config(tenant_id, draft).await?;
    Ok((StatusCode::CREATED, Json(config.into())))
}

/// Apply a partial update to an SLA config.
pub async fn update(
    State(ctx): State<AppContext>,
    TenantId(tenant_id): TenantId,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateSlaConfigRequest>,
) -> ApiResult<Json<SlaConfigResponse>> {
    let patch = SlaConfigPatch {
        first_response_minutes: request.first_response_minutes,
        resolution_minutes: request.resolution_minutes,
        business_hours_start: request
            .business_hours_start
            .as_deref()
            .map(|value| parse_hhmm("business_hours_start", value))
            .transpose()?,
        business_hours_end: request
            .business_hours_end
            .as_deref()
            .map(|value| parse_hhmm("business_hours_end", value))
            .transpose()?,
        business_days: request.business_days,
        timezone: request.timezone,
        is_active: request.is_active,
    };

    let config = ctx.sla.update_config(tenant_id, id, patch).await?;
    Ok(Json(config.into()))
}

/// Deactivate an SLA config. Configs are never deleted.
pub async fn deactivate(
    State(ctx): State<AppContext>,
    TenantId(tenant_id): TenantId,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    ctx.sla.deactivate_config(tenant_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

fn parse_hhmm(field: &str, value: &str) -> Result<NaiveTime, ApiError> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .map_err(|_| ApiError::Validation(format!("{field} must be HH:MM, got {value:?}")))
}
