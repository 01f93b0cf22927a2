//! SLA service - core business logic
//!
//! Orchestrates the calendar, deadline calculator, and classifier over the
//! repository ports. Every operation is a one-shot computation; alert
//! emission is idempotent and safe to run on every read.

use std::sync::Arc;

use chrono::{DateTime, NaiveTime, Utc};
use helmdesk_domain::constants::{
    DEFAULT_PAGE_SIZE, DEFAULT_RISK_THRESHOLD, MAX_ALERT_MESSAGE_LENGTH, MAX_PAGE_SIZE,
};
use helmdesk_domain::{
    DeadlineKind, DeadlineState, HelmdeskError, Result, SlaAlert, SlaAlertType, SlaConfig,
    SlaReport, Ticket, TicketPriority, TicketSlaStatus,
};
use tracing::{debug, info};
use uuid::Uuid;

use super::business_hours::BusinessCalendar;
use super::classifier::classify_deadline;
use super::deadlines::compute_deadlines;
use super::ports::{SlaAlertRepository, SlaConfigRepository, TicketRepository};
use super::report::{ReportAccumulator, TicketEvaluation};

/// Fields required to create an SLA configuration
#[derive(Debug, Clone)]
pub struct SlaConfigDraft {
    pub priority: TicketPriority,
    pub category_id: Option<Uuid>,
    pub first_response_minutes: i64,
    pub resolution_minutes: i64,
    pub business_hours_start: NaiveTime,
    pub business_hours_end: NaiveTime,
    pub business_days: Vec<u8>,
    pub timezone: String,
}

/// Partial update for an existing configuration; absent fields keep their
/// stored value
#[derive(Debug, Clone, Default)]
pub struct SlaConfigPatch {
    pub first_response_minutes: Option<i64>,
    pub resolution_minutes: Option<i64>,
    pub business_hours_start: Option<NaiveTime>,
    pub business_hours_end: Option<NaiveTime>,
    pub business_days: Option<Vec<u8>>,
    pub timezone: Option<String>,
    pub is_active: Option<bool>,
}

/// SLA engine service
pub struct SlaService {
    configs: Arc<dyn SlaConfigRepository>,
    tickets: Arc<dyn TicketRepository>,
    alerts: Arc<dyn SlaAlertRepository>,
    risk_threshold: f64,
}

impl SlaService {
    /// Create a new SLA service with the default at-risk threshold
    pub fn new(
        configs: Arc<dyn SlaConfigRepository>,
        tickets: Arc<dyn TicketRepository>,
        alerts: Arc<dyn SlaAlertRepository>,
    ) -> Self {
        Self { configs, tickets, alerts, risk_threshold: DEFAULT_RISK_THRESHOLD }
    }

    /// Override the at-risk threshold (fraction of budget remaining)
    pub fn with_risk_threshold(mut self, threshold: f64) -> Self {
        self.risk_threshold = threshold.clamp(0.0, 1.0);
        self
    }

    // ------------------------------------------------------------------
    // Configuration management
    // ------------------------------------------------------------------

    /// Create and persist an SLA config for a tenant.
    ///
    /// The storage layer's partial unique index rejects a second active
    /// config for the same (priority, category) combination.
    pub async fn create_config(&self, tenant_id: Uuid, draft: SlaConfigDraft) -> Result<SlaConfig> {
        validate_sla_fields(
            draft.first_response_minutes,
            draft.resolution_minutes,
            draft.business_hours_start,
            draft.business_hours_end,
            &draft.business_days,
            &draft.timezone,
        )?;

        let now = Utc::now();
        let config = SlaConfig {
            id: Uuid::now_v7(),
            tenant_id,
            priority: draft.priority,
            category_id: draft.category_id,
            first_response_minutes: draft.first_response_minutes,
            resolution_minutes: draft.resolution_minutes,
            business_hours_start: draft.business_hours_start,
            business_hours_end: draft.business_hours_end,
            business_days: normalize_days(draft.business_days),
            timezone: draft.timezone,
            is_active: true,
            created_at: now,
            updated_at: now,
        };

        self.configs.insert(config.clone()).await?;
        info!(tenant_id = %tenant_id, config_id = %config.id, priority = %config.priority, "SLA config created");
        Ok(config)
    }

    /// Apply a partial update to a config
    pub async fn update_config(
        &self,
        tenant_id: Uuid,
        id: Uuid,
        patch: SlaConfigPatch,
    ) -> Result<SlaConfig> {
        let mut config = self
            .configs
            .find_by_id(tenant_id, id)
            .await?
            .ok_or_else(|| HelmdeskError::NotFound(format!("SLA config {id}")))?;

        if let Some(minutes) = patch.first_response_minutes {
            config.first_response_minutes = minutes;
        }
        if let Some(minutes) = patch.resolution_minutes {
            config.resolution_minutes = minutes;
        }
        if let Some(start) = patch.business_hours_start {
            config.business_hours_start = start;
        }
        if let Some(end) = patch.business_hours_end {
            config.business_hours_end = end;
        }
        if let Some(days) = patch.business_days {
            config.business_days = normalize_days(days);
        }
        if let Some(timezone) = patch.timezone {
            config.timezone = timezone;
        }
        if let Some(is_active) = patch.is_active {
            config.is_active = is_active;
        }

        validate_sla_fields(
            config.first_response_minutes,
            config.resolution_minutes,
            config.business_hours_start,
            config.business_hours_end,
            &config.business_days,
            &config.timezone,
        )?;

        config.updated_at = Utc::now();
        if !self.configs.update(config.clone()).await? {
            return Err(HelmdeskError::NotFound(format!("SLA config {id}")));
        }

        info!(tenant_id = %tenant_id, config_id = %id, "SLA config updated");
        Ok(config)
    }

    /// All configs for a tenant
    pub async fn list_configs(&self, tenant_id: Uuid) -> Result<Vec<SlaConfig>> {
        self.configs.list(tenant_id).await
    }

    /// Fetch one config
    pub async fn get_config(&self, tenant_id: Uuid, id: Uuid) -> Result<SlaConfig> {
        self.configs
            .find_by_id(tenant_id, id)
            .await?
            .ok_or_else(|| HelmdeskError::NotFound(format!("SLA config {id}")))
    }

    /// Deactivate a config; configs are never deleted
    pub async fn deactivate_config(&self, tenant_id: Uuid, id: Uuid) -> Result<()> {
        if !self.configs.deactivate(tenant_id, id).await? {
            return Err(HelmdeskError::NotFound(format!("SLA config {id}")));
        }
        info!(tenant_id = %tenant_id, config_id = %id, "SLA config deactivated");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Evaluation and alerting
    // ------------------------------------------------------------------

    /// Evaluate a ticket's deadlines and states at `now`.
    ///
    /// `Ok(None)` means no active config applies: SLA tracking is off for
    /// this ticket. That is a valid terminal outcome, not an error.
    pub async fn evaluate_ticket(
        &self,
        tenant_id: Uuid,
        ticket_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Option<TicketSlaStatus>> {
        let ticket = self
            .tickets
            .find_by_id(tenant_id, ticket_id)
            .await?
            .ok_or_else(|| HelmdeskError::NotFound(format!("ticket {ticket_id}")))?;

        Ok(self.evaluate(&ticket, now).await?.map(|evaluated| evaluated.status))
    }

    /// Evaluate a ticket and record any newly crossed risk/breach alerts.
    ///
    /// Re-running on an already-breached ticket emits nothing: existing
    /// (ticket, type) rows win, so this is safe to call on every read.
    pub async fn evaluate_and_alert(
        &self,
        tenant_id: Uuid,
        ticket_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Option<TicketSlaStatus>> {
        let ticket = self
            .tickets
            .find_by_id(tenant_id, ticket_id)
            .await?
            .ok_or_else(|| HelmdeskError::NotFound(format!("ticket {ticket_id}")))?;

        let Some(evaluated) = self.evaluate(&ticket, now).await? else {
            return Ok(None);
        };

        self.record_alert(&ticket, DeadlineKind::FirstResponse, evaluated.status.first_response, evaluated.status.deadlines.first_response_due_at, now)
            .await?;
        self.record_alert(&ticket, DeadlineKind::Resolution, evaluated.status.resolution, evaluated.status.deadlines.resolution_due_at, now)
            .await?;

        Ok(Some(evaluated.status))
    }

    /// Unresolved alerts for a tenant, newest first
    pub async fn unresolved_alerts(
        &self,
        tenant_id: Uuid,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<SlaAlert>> {
        let limit = limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
        let offset = offset.unwrap_or(0).max(0);
        self.alerts.list_unresolved(tenant_id, limit, offset).await
    }

    // ------------------------------------------------------------------
    // Reporting
    // ------------------------------------------------------------------

    /// Aggregate compliance over tickets created inside `[start, end)`.
    ///
    /// Tickets with no applicable config are excluded from the denominator.
    pub async fn build_report(
        &self,
        tenant_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<SlaReport> {
        if start >= end {
            return Err(HelmdeskError::Validation(
                "start_date must be before end_date".into(),
            ));
        }

        let tickets = self.tickets.find_created_between(tenant_id, start, end).await?;
        let mut accumulator = ReportAccumulator::new();
        let mut skipped = 0_u64;

        for ticket in &tickets {
            match self.evaluate(ticket, now).await? {
                Some(evaluated) => accumulator.add(&evaluated.metrics),
                None => skipped += 1,
            }
        }

        if skipped > 0 {
            debug!(tenant_id = %tenant_id, skipped, "tickets without an applicable SLA config excluded from report");
        }

        Ok(accumulator.finish(start, end))
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    async fn evaluate(&self, ticket: &Ticket, now: DateTime<Utc>) -> Result<Option<EvaluatedTicket>> {
        let Some(config) = self
            .configs
            .find_active(ticket.tenant_id, ticket.priority, ticket.category_id)
            .await?
        else {
            debug!(tenant_id = %ticket.tenant_id, ticket_id = %ticket.id, "no active SLA config, tracking disabled for ticket");
            return Ok(None);
        };

        let calendar = BusinessCalendar::from_config(&config)?;
        let deadlines = compute_deadlines(&calendar, &config, ticket.created_at)?;

        let first_response = self.classify(
            &calendar,
            deadlines.first_response_due_at,
            ticket.first_response_at,
            now,
            config.first_response_minutes,
        )?;
        let resolution = self.classify(
            &calendar,
            deadlines.resolution_due_at,
            ticket.resolved_at,
            now,
            config.resolution_minutes,
        )?;

        let response_minutes = ticket
            .first_response_at
            .map(|at| calendar.business_minutes_between(ticket.created_at, at))
            .transpose()?;
        let resolution_minutes = ticket
            .resolved_at
            .map(|at| calendar.business_minutes_between(ticket.created_at, at))
            .transpose()?;

        Ok(Some(EvaluatedTicket {
            status: TicketSlaStatus {
                ticket_id: ticket.id,
                deadlines,
                first_response,
                resolution,
            },
            metrics: TicketEvaluation {
                first_response,
                resolution,
                response_minutes,
                resolution_minutes,
            },
        }))
    }

    fn classify(
        &self,
        calendar: &BusinessCalendar,
        due_at: DateTime<Utc>,
        event_at: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
        budget_minutes: i64,
    ) -> Result<DeadlineState> {
        let remaining = if now < due_at {
            calendar.business_minutes_between(now, due_at)?
        } else {
            0
        };

        Ok(classify_deadline(due_at, event_at, now, remaining, budget_minutes, self.risk_threshold))
    }

    async fn record_alert(
        &self,
        ticket: &Ticket,
        kind: DeadlineKind,
        state: DeadlineState,
        due_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<()> {
        let alert_type = match state {
            DeadlineState::AtRisk => SlaAlertType::for_deadline(kind, false),
            DeadlineState::Breached => SlaAlertType::for_deadline(kind, true),
            DeadlineState::Pending | DeadlineState::Met | DeadlineState::MetLate => return Ok(()),
        };

        let mut message = match state {
            DeadlineState::AtRisk => {
                format!("Ticket {} {kind} due {}", ticket.id, due_at.to_rfc3339())
            }
            _ => format!("Ticket {} {kind} breached, was due {}", ticket.id, due_at.to_rfc3339()),
        };
        message.truncate(MAX_ALERT_MESSAGE_LENGTH);

        let alert = SlaAlert {
            id: Uuid::now_v7(),
            tenant_id: ticket.tenant_id,
            ticket_id: ticket.id,
            alert_type,
            severity: ticket.priority,
            message,
            created_at: now,
            resolved_at: None,
        };

        if self.alerts.insert_if_absent(alert).await? {
            info!(
                tenant_id = %ticket.tenant_id,
                ticket_id = %ticket.id,
                alert_type = %alert_type,
                "SLA alert recorded"
            );
        }

        Ok(())
    }
}

struct EvaluatedTicket {
    status: TicketSlaStatus,
    metrics: TicketEvaluation,
}

/// Validate SLA config fields, with field-named messages.
///
/// Write-time rejection surfaces as `Validation`; the same degenerate
/// window on a stored config surfaces as `Configuration` at computation
/// time (see [`BusinessCalendar::from_config`]).
fn validate_sla_fields(
    first_response_minutes: i64,
    resolution_minutes: i64,
    start: NaiveTime,
    end: NaiveTime,
    business_days: &[u8],
    timezone: &str,
) -> Result<()> {
    if first_response_minutes <= 0 {
        return Err(HelmdeskError::Validation(
            "first_response_minutes must be a positive integer".into(),
        ));
    }
    if resolution_minutes <= 0 {
        return Err(HelmdeskError::Validation(
            "resolution_minutes must be a positive integer".into(),
        ));
    }
    if start >= end {
        return Err(HelmdeskError::Validation(
            "business_hours_start must precede business_hours_end".into(),
        ));
    }
    if business_days.is_empty() {
        return Err(HelmdeskError::Validation("business_days must not be empty".into()));
    }
    if let Some(bad) = business_days.iter().find(|day| **day > 6) {
        return Err(HelmdeskError::Validation(format!(
            "business_days entries must be weekday indices 0-6, got {bad}"
        )));
    }
    if timezone.parse::<chrono_tz::Tz>().is_err() {
        return Err(HelmdeskError::Validation(format!("timezone is not a known IANA name: {timezone}")));
    }
    Ok(())
}

fn normalize_days(mut days: Vec<u8>) -> Vec<u8> {
    days.sort_unstable();
    days.dedup();
    days
}
