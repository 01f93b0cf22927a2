//! SLA compliance report aggregation
//!
//! Pure accumulation over per-ticket evaluations. Tickets with no
//! applicable SLA config never reach the accumulator; they are excluded
//! from the denominator entirely.

use chrono::{DateTime, Utc};
use helmdesk_domain::{DeadlineState, SlaReport};

/// One evaluated ticket, as fed to the accumulator
#[derive(Debug, Clone, Copy)]
pub struct TicketEvaluation {
    pub first_response: DeadlineState,
    pub resolution: DeadlineState,
    /// Business minutes from creation to first response, when recorded
    pub response_minutes: Option<i64>,
    /// Business minutes from creation to resolution, when recorded
    pub resolution_minutes: Option<i64>,
}

/// Streaming accumulator for an [`SlaReport`]
#[derive(Debug, Default)]
pub struct ReportAccumulator {
    total: u64,
    compliant: u64,
    breached: u64,
    response_minutes_sum: i64,
    response_samples: u64,
    resolution_minutes_sum: i64,
    resolution_samples: u64,
}

impl ReportAccumulator {
    /// Create an empty accumulator
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one evaluated ticket into the aggregate
    pub fn add(&mut self, evaluation: &TicketEvaluation) {
        self.total += 1;

        let both_met = evaluation.first_response == DeadlineState::Met
            && evaluation.resolution == DeadlineState::Met;
        let either_breached = matches!(
            evaluation.first_response,
            DeadlineState::Breached | DeadlineState::MetLate
        ) || matches!(
            evaluation.resolution,
            DeadlineState::Breached | DeadlineState::MetLate
        );

        if both_met {
            self.compliant += 1;
        }
        if either_breached {
            self.breached += 1;
        }

        if let Some(minutes) = evaluation.response_minutes {
            self.response_minutes_sum += minutes;
            self.response_samples += 1;
        }
        if let Some(minutes) = evaluation.resolution_minutes {
            self.resolution_minutes_sum += minutes;
            self.resolution_samples += 1;
        }
    }

    /// Finish the aggregation for the given range.
    ///
    /// The compliance rate is 0 (never NaN) when no tickets were counted.
    pub fn finish(self, start_date: DateTime<Utc>, end_date: DateTime<Utc>) -> SlaReport {
        let compliance_rate = if self.total > 0 {
            self.compliant as f64 / self.total as f64 * 100.0
        } else {
            0.0
        };

        SlaReport {
            start_date,
            end_date,
            total_tickets: self.total,
            compliant_tickets: self.compliant,
            breached_tickets: self.breached,
            compliance_rate,
            average_response_minutes: mean(self.response_minutes_sum, self.response_samples),
            average_resolution_minutes: mean(self.resolution_minutes_sum, self.resolution_samples),
        }
    }
}

fn mean(sum: i64, samples: u64) -> Option<f64> {
    if samples == 0 {
        None
    } else {
        Some(sum as f64 / samples as f64)
    }
}
