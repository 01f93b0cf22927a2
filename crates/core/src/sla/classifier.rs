//! SLA deadline state classification
//!
//! Pure state machine over one deadline. Two instances run per ticket
//! (first response, resolution); the service layer feeds each the matching
//! event timestamp and the remaining business-minute budget.

use chrono::{DateTime, Utc};
use helmdesk_domain::DeadlineState;

/// Classify a single deadline.
///
/// - `event_at` is the recorded timestamp that satisfies the deadline
///   (first response or resolution); once set, the state freezes as `Met`
///   or `MetLate` depending on which side of the deadline it landed.
/// - `remaining_business_minutes` is the business time left from `now` to
///   `due_at`, used for the at-risk window; callers pass 0 when `now` is
///   already past the deadline.
/// - `risk_threshold` is the fraction of the budget that marks the at-risk
///   window (0.20 = alert when 20% or less of the budget remains).
pub fn classify_deadline(
    due_at: DateTime<Utc>,
    event_at: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
    remaining_business_minutes: i64,
    budget_minutes: i64,
    risk_threshold: f64,
) -> DeadlineState {
    if let Some(event) = event_at {
        return if event <= due_at { DeadlineState::Met } else { DeadlineState::MetLate };
    }

    if now > due_at {
        return DeadlineState::Breached;
    }

    let risk_budget = (budget_minutes as f64 * risk_threshold).floor() as i64;
    if remaining_business_minutes <= risk_budget {
        DeadlineState::AtRisk
    } else {
        DeadlineState::Pending
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;

    fn ts(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 2, hour, minute, 0).single().expect("valid ts")
    }

    #[test]
    fn event_before_deadline_is_met() {
        let state = classify_deadline(ts(11, 0), Some(ts(10, 30)), ts(12, 0), 0, 60, 0.2);
        assert_eq!(state, DeadlineState::Met);
    }

    #[test]
    fn event_after_deadline_is_met_late() {
        let state = classify_deadline(ts(11, 0), Some(ts(11, 30)), ts(12, 0), 0, 60, 0.2);
        assert_eq!(state, DeadlineState::MetLate);
    }

    #[test]
    fn event_exactly_at_deadline_counts_as_met() {
        let state = classify_deadline(ts(11, 0), Some(ts(11, 0)), ts(12, 0), 0, 60, 0.2);
        assert_eq!(state, DeadlineState::Met);
    }

    #[test]
    fn past_deadline_without_event_is_breached() {
        let state = classify_deadline(ts(11, 0), None, ts(11, 1), 0, 60, 0.2);
        assert_eq!(state, DeadlineState::Breached);
    }

    #[test]
    fn met_state_wins_over_elapsed_clock() {
        // Even long after the deadline, a recorded early response freezes
        // the state.
        let state = classify_deadline(
            ts(11, 0),
            Some(ts(10, 0)),
            ts(11, 0) + Duration::days(30),
            0,
            60,
            0.2,
        );
        assert_eq!(state, DeadlineState::Met);
    }

    #[test]
    fn inside_risk_window_is_at_risk() {
        // 60-minute budget, 20% threshold: at risk once 12 minutes or fewer
        // remain.
        let state = classify_deadline(ts(11, 0), None, ts(10, 50), 10, 60, 0.2);
        assert_eq!(state, DeadlineState::AtRisk);
    }

    #[test]
    fn outside_risk_window_is_pending() {
        let state = classify_deadline(ts(11, 0), None, ts(10, 0), 60, 60, 0.2);
        assert_eq!(state, DeadlineState::Pending);
    }
}
