//! Domain types and models

pub mod hourbank;
pub mod sla;
pub mod ticket;
pub mod timesheet;

pub use hourbank::{HourBank, HourBankStatus, HourBankSummary};
pub use sla::{
    DeadlineKind, DeadlineState, SlaAlert, SlaAlertType, SlaConfig, SlaDeadlines, SlaReport,
    TicketSlaStatus,
};
pub use ticket::{Ticket, TicketPriority};
pub use timesheet::TimeEntry;
