//! Timesheet engine
//!
//! Time-entry lifecycle: timers open at start, close exactly once at
//! stop/pause, and manual entries arrive already closed. Completion
//! triggers the hour-bank debit.

pub mod ports;
pub mod service;

pub use service::TimeEntryService;
