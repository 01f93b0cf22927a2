//! SLA deadline calculation
//!
//! Anchors the per-priority response/resolution budgets at ticket creation
//! and projects them through the tenant's business-hours calendar.

use chrono::{DateTime, Utc};
use helmdesk_domain::{Result, SlaConfig, SlaDeadlines};

use super::business_hours::BusinessCalendar;

/// Compute both deadlines for a ticket created at `created_at` under
/// `config`.
///
/// # Errors
/// Propagates `HelmdeskError::Configuration` from calendar validation.
pub fn compute_deadlines(
    calendar: &BusinessCalendar,
    config: &SlaConfig,
    created_at: DateTime<Utc>,
) -> Result<SlaDeadlines> {
    Ok(SlaDeadlines {
        first_response_due_at: calendar
            .add_business_minutes(created_at, config.first_response_minutes)?,
        resolution_due_at: calendar.add_business_minutes(created_at, config.resolution_minutes)?,
    })
}
