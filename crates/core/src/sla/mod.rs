//! SLA engine
//!
//! Deadline and alert computation for ticket SLAs. Everything here is a
//! one-shot, request-scoped calculation over stored records: deadlines are
//! derived from the tenant's business-hours window, deadline states are
//! classified against recorded timestamps and the current instant, and
//! alerts are emitted idempotently through the repository ports.

pub mod business_hours;
pub mod classifier;
pub mod deadlines;
pub mod ports;
pub mod report;
pub mod service;

pub use business_hours::BusinessCalendar;
pub use classifier::classify_deadline;
pub use deadlines::compute_deadlines;
pub use report::ReportAccumulator;
pub use service::SlaService;
