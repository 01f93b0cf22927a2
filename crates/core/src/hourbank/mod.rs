//! Hour-bank engine
//!
//! Balance arithmetic and status classification over prepaid hour banks,
//! plus the debit orchestration that keeps `consumed_hours` moving forward
//! one committed time entry at a time.

pub mod balance;
pub mod format;
pub mod ports;
pub mod service;

pub use balance::summarize;
pub use service::HourBankService;
