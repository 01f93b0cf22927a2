//! # Helmdesk Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - The SLA engine (business-hours calendar, deadline calculator, status
//!   classifier, report aggregator)
//! - The hour-bank engine (balance arithmetic, status classification, debit
//!   orchestration)
//! - Port/adapter interfaces (traits)
//!
//! ## Architecture Principles
//! - Only depends on `helmdesk-domain`
//! - No database, HTTP, or platform code
//! - All external dependencies via traits
//! - Pure, testable business logic

pub mod hourbank;
pub mod sla;
pub mod timesheet;

// Re-export specific items to avoid ambiguity
pub use hourbank::ports::HourBankRepository;
pub use hourbank::HourBankService;
pub use sla::ports::{SlaAlertRepository, SlaConfigRepository, TicketRepository};
pub use sla::{BusinessCalendar, SlaService};
pub use timesheet::ports::TimeEntryRepository;
pub use timesheet::TimeEntryService;
