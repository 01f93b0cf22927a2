//! HTTP handlers for time entries.
//!
//! One POST shape covers both timer starts and manual entries: a supplied
//! `duration_hours` marks the entry as manual (already closed), its
//! absence opens a running timer anchored at the current instant.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use helmdesk_core::timesheet::service::{ManualEntry, TimerStart};
use helmdesk_domain::TimeEntry;
use serde::Deserialize;
use uuid::Uuid;

use crate::context::AppContext;
use crate::error::{ApiError, ApiResult};
use crate::extract::{TenantId, UserId};

/// Create request; unknown fields are rejected.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateTimeEntryRequest {
    pub ticket_id: Uuid,
    #[serde(default)]
    pub hour_bank_id: Option<Uuid>,
    #[serde(default)]
    pub description: String,
    /// Required for manual entries; ignored for timer starts.
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,
    /// Present = manual entry, absent = start a timer.
    #[serde(default)]
    pub duration_hours: Option<f64>,
}

/// Stop request; a missing `end_time` stops the timer now.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StopTimeEntryRequest {
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
}

/// List filter; limits are clamped server-side.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ListTimeEntriesQuery {
    pub ticket_id: Uuid,
    #[serde(default)]
    pub limit: Option<i64>,
    #[serde(default)]
    pub offset: Option<i64>,
}

/// Start a timer or record a manual entry.
pub async fn create(
    State(ctx): State<AppContext>,
    TenantId(tenant_id): TenantId,
    UserId(user_id): UserId,
    Json(request): Json<CreateTimeEntryRequest>,
) -> ApiResult<(StatusCode, Json<TimeEntry>)> {
    let now = Utc::now();

    let entry = match request.duration_hours {
        Some(duration_hours) => {
            let start_time = request.start_time.ok_or_else(|| {
                ApiError::Validation("start_time is required for manual entries".into())
            })?;
            ctx.time_entries
                .add_manual_entry(
                    tenant_id,
                    ManualEntry {
                        ticket_id: request.ticket_id,
                        user_id,
                        start_time,
                        duration_hours,
                        hour_bank_id: request.hour_bank_id,
                        description: request.description,
                    },
                    now,
                )
                .await?
        }
        None => {
            ctx.time_entries
                .start_timer(
                    tenant_id,
                    TimerStart {
                        ticket_id: request.ticket_id,
                        user_id,
                        hour_bank_id: request.hour_bank_id,
                        description: request.description,
                    },
                    now,
                )
                .await?
        }
    };

    Ok((StatusCode::CREATED, Json(entry)))
}

/// Stop a running timer; derives the duration and debits the bank.
pub async fn stop(
    State(ctx): State<AppContext>,
    TenantId(tenant_id): TenantId,
    Path(id): Path<Uuid>,
    Json(request): Json<StopTimeEntryRequest>,
) -> ApiResult<Json<TimeEntry>> {
    let now = Utc::now();
    let end_time = request.end_time.unwrap_or(now);

    let entry = ctx.time_entries.stop_timer(tenant_id, id, end_time, now).await?;
    Ok(Json(entry))
}

/// One page of the entries logged against a ticket, oldest first.
pub async fn list(
    State(ctx): State<AppContext>,
    TenantId(tenant_id): TenantId,
    Query(query): Query<ListTimeEntriesQuery>,
) -> ApiResult<Json<Vec<TimeEntry>>> {
    let entries = ctx
        .time_entries
        .entries_for_ticket(tenant_id, query.ticket_id, query.limit, query.offset)
        .await?;
    Ok(Json(entries))
}
