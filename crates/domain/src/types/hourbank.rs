//! Hour-bank ledger types
//!
//! A bank holds a purchased quantity of support hours for one customer.
//! `consumed_hours` only moves forward, incremented by committed time-entry
//! debits; the balance arithmetic itself lives in `helmdesk-core`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Prepaid hour bank for a (tenant, customer) pair.
///
/// A customer may hold several concurrent banks. `consumed_hours` is not
/// clamped to `total_hours`; overage is a display and billing concern.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HourBank {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub customer_id: Uuid,
    pub total_hours: f64,
    pub consumed_hours: f64,
    pub hourly_rate: Option<f64>,
    pub expires_at: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Status label for a bank, first matching rule wins
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HourBankStatus {
    Expired,
    Inactive,
    ExpiringSoon,
    LowBalance,
    Active,
}

impl HourBankStatus {
    /// Human-readable label for UI and reports
    pub fn label(&self) -> &'static str {
        match self {
            Self::Expired => "Expired",
            Self::Inactive => "Inactive",
            Self::ExpiringSoon => "Expiring Soon",
            Self::LowBalance => "Low Balance",
            Self::Active => "Active",
        }
    }
}

impl std::fmt::Display for HourBankStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Bank plus its derived balance fields, as returned to callers.
///
/// The status label picks a single value by precedence, but the warning
/// flags co-occur independently so both can surface in a report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HourBankSummary {
    #[serde(flatten)]
    pub bank: HourBank,
    pub remaining_hours: f64,
    pub usage_percentage: f64,
    pub total_value: Option<f64>,
    pub status: HourBankStatus,
    pub is_expiring_soon: bool,
    pub is_running_low: bool,
}
