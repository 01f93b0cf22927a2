//! Application constants
//!
//! Centralized location for all domain-level constants used throughout the
//! application.

// SLA thresholds
pub const DEFAULT_RISK_THRESHOLD: f64 = 0.20; // fraction of budget remaining

// Hour bank thresholds
pub const LOW_BALANCE_THRESHOLD_PCT: f64 = 80.0;
pub const EXPIRING_SOON_DAYS: i64 = 30;

// Pagination
pub const DEFAULT_PAGE_SIZE: i64 = 50;
pub const MAX_PAGE_SIZE: i64 = 100;

// Field limits
pub const MAX_DESCRIPTION_LENGTH: usize = 2000;
pub const MAX_ALERT_MESSAGE_LENGTH: usize = 500;
