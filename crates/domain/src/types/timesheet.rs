//! Time-entry types
//!
//! An entry is created at timer start (open-ended) or as a manual entry
//! (already closed), mutated exactly once at stop, and immutable after.
//! Running timers are not a server-side ticking process: elapsed time is
//! recomputed from the persisted `start_time` on every read.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Work logged against a ticket, optionally debiting one hour bank
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeEntry {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub ticket_id: Uuid,
    pub user_id: Uuid,
    pub start_time: DateTime<Utc>,
    /// None while the timer is running
    pub end_time: Option<DateTime<Utc>>,
    /// Decimal hours; derived at stop, or supplied for manual entries
    pub duration_hours: Option<f64>,
    /// Bank to debit on completion; None for untracked work
    pub hour_bank_id: Option<Uuid>,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl TimeEntry {
    /// Whether the timer is still open
    pub fn is_running(&self) -> bool {
        self.end_time.is_none()
    }

    /// Elapsed hours for a running entry, recomputed from `start_time`
    pub fn elapsed_hours(&self, now: DateTime<Utc>) -> f64 {
        let end = self.end_time.unwrap_or(now);
        let seconds = (end - self.start_time).num_seconds().max(0);
        seconds as f64 / 3600.0
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn elapsed_hours_uses_now_while_running() {
        let start = Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).single().expect("valid ts");
        let now = Utc.with_ymd_and_hms(2026, 3, 2, 10, 30, 0).single().expect("valid ts");
        let entry = TimeEntry {
            id: Uuid::nil(),
            tenant_id: Uuid::nil(),
            ticket_id: Uuid::nil(),
            user_id: Uuid::nil(),
            start_time: start,
            end_time: None,
            duration_hours: None,
            hour_bank_id: None,
            description: String::new(),
            created_at: start,
        };

        assert!(entry.is_running());
        assert!((entry.elapsed_hours(now) - 1.5).abs() < f64::EPSILON);
    }
}
