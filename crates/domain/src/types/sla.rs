//! SLA configuration, alert, and report types

use chrono::{DateTime, NaiveTime, Utc, Weekday};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ticket::TicketPriority;

/// Per-(tenant, priority[, category]) SLA targets and business-hours window.
///
/// At most one active config may exist for a given
/// (tenant, priority, category) combination; storage enforces this with a
/// partial unique index. Configs are deactivated, never deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlaConfig {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub priority: TicketPriority,
    pub category_id: Option<Uuid>,
    /// First-response budget in business minutes, > 0
    pub first_response_minutes: i64,
    /// Resolution budget in business minutes, > 0
    pub resolution_minutes: i64,
    /// Daily window open, tenant-local time
    pub business_hours_start: NaiveTime,
    /// Daily window close, tenant-local time
    pub business_hours_end: NaiveTime,
    /// Weekday indices, 0 = Sunday .. 6 = Saturday
    pub business_days: Vec<u8>,
    /// IANA timezone name, e.g. "America/Sao_Paulo"
    pub timezone: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SlaConfig {
    /// Business days as chrono weekdays, skipping out-of-range indices
    pub fn business_weekdays(&self) -> Vec<Weekday> {
        self.business_days.iter().filter_map(|idx| weekday_from_index(*idx)).collect()
    }
}

/// Map a 0 = Sunday .. 6 = Saturday index onto a chrono weekday
pub fn weekday_from_index(index: u8) -> Option<Weekday> {
    match index {
        0 => Some(Weekday::Sun),
        1 => Some(Weekday::Mon),
        2 => Some(Weekday::Tue),
        3 => Some(Weekday::Wed),
        4 => Some(Weekday::Thu),
        5 => Some(Weekday::Fri),
        6 => Some(Weekday::Sat),
        _ => None,
    }
}

/// Which of a ticket's two SLA deadlines is being tracked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeadlineKind {
    FirstResponse,
    Resolution,
}

impl std::fmt::Display for DeadlineKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FirstResponse => write!(f, "first_response"),
            Self::Resolution => write!(f, "resolution"),
        }
    }
}

/// State of a single deadline, per the classifier
///
/// `Met`, `MetLate`, and `Breached` are terminal. `MetLate` counts as a
/// breach for compliance purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeadlineState {
    Pending,
    AtRisk,
    Breached,
    Met,
    MetLate,
}

impl DeadlineState {
    /// Compliance verdict: `None` while the outcome is still open
    pub fn is_compliant(&self) -> Option<bool> {
        match self {
            Self::Met => Some(true),
            Self::MetLate | Self::Breached => Some(false),
            Self::Pending | Self::AtRisk => None,
        }
    }
}

impl std::fmt::Display for DeadlineState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::AtRisk => write!(f, "at_risk"),
            Self::Breached => write!(f, "breached"),
            Self::Met => write!(f, "met"),
            Self::MetLate => write!(f, "met_late"),
        }
    }
}

/// The two deadlines computed for a ticket under its active config
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SlaDeadlines {
    pub first_response_due_at: DateTime<Utc>,
    pub resolution_due_at: DateTime<Utc>,
}

/// Full per-ticket evaluation: deadlines plus both deadline states
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketSlaStatus {
    pub ticket_id: Uuid,
    pub deadlines: SlaDeadlines,
    pub first_response: DeadlineState,
    pub resolution: DeadlineState,
}

/// Alert category, unique per ticket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlaAlertType {
    FirstResponseAtRisk,
    ResolutionAtRisk,
    FirstResponseBreached,
    ResolutionBreached,
}

impl SlaAlertType {
    /// Stable string form used in storage and API payloads
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FirstResponseAtRisk => "first_response_at_risk",
            Self::ResolutionAtRisk => "resolution_at_risk",
            Self::FirstResponseBreached => "first_response_breached",
            Self::ResolutionBreached => "resolution_breached",
        }
    }

    /// Alert type for a deadline kind crossing the risk or breach threshold
    pub fn for_deadline(kind: DeadlineKind, breached: bool) -> Self {
        match (kind, breached) {
            (DeadlineKind::FirstResponse, false) => Self::FirstResponseAtRisk,
            (DeadlineKind::Resolution, false) => Self::ResolutionAtRisk,
            (DeadlineKind::FirstResponse, true) => Self::FirstResponseBreached,
            (DeadlineKind::Resolution, true) => Self::ResolutionBreached,
        }
    }
}

impl std::fmt::Display for SlaAlertType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SlaAlertType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "first_response_at_risk" => Ok(Self::FirstResponseAtRisk),
            "resolution_at_risk" => Ok(Self::ResolutionAtRisk),
            "first_response_breached" => Ok(Self::FirstResponseBreached),
            "resolution_breached" => Ok(Self::ResolutionBreached),
            _ => Err(format!("Invalid SLA alert type: {s}")),
        }
    }
}

/// A recorded SLA alert.
///
/// One row per (ticket, alert type); re-running classification never
/// duplicates an alert that already exists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlaAlert {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub ticket_id: Uuid,
    pub alert_type: SlaAlertType,
    pub severity: TicketPriority,
    pub message: String,
    pub created_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
}

/// Compliance aggregate over a date range, computed at read time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlaReport {
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    /// Tickets in range with an applicable SLA config
    pub total_tickets: u64,
    /// Both deadlines met before their due instants
    pub compliant_tickets: u64,
    /// Either deadline breached or met late
    pub breached_tickets: u64,
    /// compliant / total x 100; 0 when total is 0
    pub compliance_rate: f64,
    /// Mean business minutes from creation to first response, over tickets
    /// with a response recorded
    pub average_response_minutes: Option<f64>,
    /// Mean business minutes from creation to resolution, over resolved
    /// tickets
    pub average_resolution_minutes: Option<f64>,
}
