//! Hour-bank balance arithmetic
//!
//! Pure functions over a single bank record. Remaining hours are not
//! clamped; a negative balance is a display and billing concern, never an
//! error.

use chrono::{DateTime, Duration, Utc};
use helmdesk_domain::constants::{EXPIRING_SOON_DAYS, LOW_BALANCE_THRESHOLD_PCT};
use helmdesk_domain::{HourBank, HourBankStatus, HourBankSummary};

/// `total - consumed`; may be negative when over-consumed
pub fn remaining_hours(bank: &HourBank) -> f64 {
    bank.total_hours - bank.consumed_hours
}

/// Consumption as a percentage of the purchased quantity.
///
/// Guarded division: 0 whenever `total_hours` is 0, regardless of
/// `consumed_hours`.
pub fn usage_percentage(bank: &HourBank) -> f64 {
    if bank.total_hours > 0.0 {
        bank.consumed_hours / bank.total_hours * 100.0
    } else {
        0.0
    }
}

/// Monetary value of the bank, when a rate is attached
pub fn total_value(bank: &HourBank) -> Option<f64> {
    bank.hourly_rate.map(|rate| bank.total_hours * rate)
}

/// Whether the bank's expiry has passed
pub fn is_expired(bank: &HourBank, now: DateTime<Utc>) -> bool {
    bank.expires_at.is_some_and(|expires| expires < now)
}

/// Whether the bank expires within the warning horizon (and has not yet)
pub fn is_expiring_soon(bank: &HourBank, now: DateTime<Utc>) -> bool {
    bank.expires_at.is_some_and(|expires| {
        expires >= now && expires <= now + Duration::days(EXPIRING_SOON_DAYS)
    })
}

/// Whether consumption crossed the low-balance threshold
pub fn is_running_low(bank: &HourBank) -> bool {
    usage_percentage(bank) > LOW_BALANCE_THRESHOLD_PCT
}

/// Status label, first matching rule wins:
/// Expired, then Inactive, then Expiring Soon, then Low Balance, then
/// Active.
pub fn status(bank: &HourBank, now: DateTime<Utc>) -> HourBankStatus {
    if is_expired(bank, now) {
        HourBankStatus::Expired
    } else if !bank.is_active {
        HourBankStatus::Inactive
    } else if is_expiring_soon(bank, now) {
        HourBankStatus::ExpiringSoon
    } else if is_running_low(bank) {
        HourBankStatus::LowBalance
    } else {
        HourBankStatus::Active
    }
}

/// Bank plus all derived fields.
///
/// The warning flags are computed independently of the status label so
/// that co-occurring conditions (expiring soon while running low) both
/// surface.
pub fn summarize(bank: HourBank, now: DateTime<Utc>) -> HourBankSummary {
    let remaining = remaining_hours(&bank);
    let usage = usage_percentage(&bank);
    let value = total_value(&bank);
    let label = status(&bank, now);
    let expiring = is_expiring_soon(&bank, now);
    let low = is_running_low(&bank);

    HourBankSummary {
        bank,
        remaining_hours: remaining,
        usage_percentage: usage,
        total_value: value,
        status: label,
        is_expiring_soon: expiring,
        is_running_low: low,
    }
}
