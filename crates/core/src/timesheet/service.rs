//! Time-entry service - core business logic

use std::sync::Arc;

use chrono::{DateTime, Utc};
use helmdesk_domain::constants::{DEFAULT_PAGE_SIZE, MAX_DESCRIPTION_LENGTH, MAX_PAGE_SIZE};
use helmdesk_domain::{HelmdeskError, Result, TimeEntry};
use tracing::info;
use uuid::Uuid;

use super::ports::TimeEntryRepository;
use crate::hourbank::HourBankService;

/// Fields required to start a timer
#[derive(Debug, Clone)]
pub struct TimerStart {
    pub ticket_id: Uuid,
    pub user_id: Uuid,
    pub hour_bank_id: Option<Uuid>,
    pub description: String,
}

/// Fields required for a manual (already closed) entry
#[derive(Debug, Clone)]
pub struct ManualEntry {
    pub ticket_id: Uuid,
    pub user_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub duration_hours: f64,
    pub hour_bank_id: Option<Uuid>,
    pub description: String,
}

/// Time-entry service
pub struct TimeEntryService {
    entries: Arc<dyn TimeEntryRepository>,
    banks: Arc<HourBankService>,
}

impl TimeEntryService {
    /// Create a new time-entry service
    pub fn new(entries: Arc<dyn TimeEntryRepository>, banks: Arc<HourBankService>) -> Self {
        Self { entries, banks }
    }

    /// Open a timer against a ticket.
    ///
    /// The running timer is not a server-side process: clients recompute
    /// elapsed time from the persisted `start_time`, and the entry stays
    /// open until [`Self::stop_timer`].
    pub async fn start_timer(
        &self,
        tenant_id: Uuid,
        start: TimerStart,
        now: DateTime<Utc>,
    ) -> Result<TimeEntry> {
        validate_description(&start.description)?;

        let entry = TimeEntry {
            id: Uuid::now_v7(),
            tenant_id,
            ticket_id: start.ticket_id,
            user_id: start.user_id,
            start_time: now,
            end_time: None,
            duration_hours: None,
            hour_bank_id: start.hour_bank_id,
            description: start.description,
            created_at: now,
        };

        self.entries.insert(entry.clone()).await?;
        info!(tenant_id = %tenant_id, entry_id = %entry.id, ticket_id = %entry.ticket_id, "timer started");
        Ok(entry)
    }

    /// Record an already-completed entry with a supplied duration.
    ///
    /// Manual entries carry `end_time == start_time`; the duration is
    /// authoritative, not derived. Debits its bank immediately.
    pub async fn add_manual_entry(
        &self,
        tenant_id: Uuid,
        manual: ManualEntry,
        now: DateTime<Utc>,
    ) -> Result<TimeEntry> {
        validate_description(&manual.description)?;
        if !manual.duration_hours.is_finite() || manual.duration_hours <= 0.0 {
            return Err(HelmdeskError::Validation(
                "duration_hours must be a positive number".into(),
            ));
        }

        let entry = TimeEntry {
            id: Uuid::now_v7(),
            tenant_id,
            ticket_id: manual.ticket_id,
            user_id: manual.user_id,
            start_time: manual.start_time,
            end_time: Some(manual.start_time),
            duration_hours: Some(manual.duration_hours),
            hour_bank_id: manual.hour_bank_id,
            description: manual.description,
            created_at: now,
        };

        self.entries.insert(entry.clone()).await?;
        info!(tenant_id = %tenant_id, entry_id = %entry.id, hours = manual.duration_hours, "manual time entry recorded");

        if let Some(bank_id) = entry.hour_bank_id {
            self.banks.debit(tenant_id, bank_id, manual.duration_hours, now).await?;
        }

        Ok(entry)
    }

    /// Close a running timer, deriving its duration from the interval.
    ///
    /// Exactly one completion per entry: a second stop is rejected, so the
    /// debit fires at most once.
    pub async fn stop_timer(
        &self,
        tenant_id: Uuid,
        entry_id: Uuid,
        end_time: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<TimeEntry> {
        let entry = self
            .entries
            .find_by_id(tenant_id, entry_id)
            .await?
            .ok_or_else(|| HelmdeskError::NotFound(format!("time entry {entry_id}")))?;

        if !entry.is_running() {
            return Err(HelmdeskError::Validation(
                "time entry is already completed and immutable".into(),
            ));
        }
        if end_time < entry.start_time {
            return Err(HelmdeskError::Validation(
                "end_time must not precede start_time".into(),
            ));
        }

        let duration_hours = (end_time - entry.start_time).num_seconds() as f64 / 3600.0;

        if !self.entries.complete(tenant_id, entry_id, end_time, duration_hours).await? {
            // Lost a race against another stop; the first writer's debit
            // stands.
            return Err(HelmdeskError::Validation(
                "time entry is already completed and immutable".into(),
            ));
        }

        info!(tenant_id = %tenant_id, entry_id = %entry_id, hours = duration_hours, "timer stopped");

        if let Some(bank_id) = entry.hour_bank_id {
            if duration_hours > 0.0 {
                self.banks.debit(tenant_id, bank_id, duration_hours, now).await?;
            }
        }

        Ok(TimeEntry {
            end_time: Some(end_time),
            duration_hours: Some(duration_hours),
            ..entry
        })
    }

    /// One page of the entries logged against a ticket, oldest first
    pub async fn entries_for_ticket(
        &self,
        tenant_id: Uuid,
        ticket_id: Uuid,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<TimeEntry>> {
        let limit = limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
        let offset = offset.unwrap_or(0).max(0);
        self.entries.list_by_ticket(tenant_id, ticket_id, limit, offset).await
    }
}

fn validate_description(description: &str) -> Result<()> {
    if description.len() > MAX_DESCRIPTION_LENGTH {
        return Err(HelmdeskError::Validation(format!(
            "description exceeds {MAX_DESCRIPTION_LENGTH} characters"
        )));
    }
    Ok(())
}
