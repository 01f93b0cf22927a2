//! SQLite persistence layer
//!
//! One repository per aggregate, each implementing its core port. All
//! blocking rusqlite work runs on the blocking thread pool.

pub mod hour_bank_repository;
pub mod manager;
mod row;
pub mod sla_alert_repository;
pub mod sla_config_repository;
pub mod ticket_repository;
pub mod time_entry_repository;

pub use hour_bank_repository::SqliteHourBankRepository;
pub use manager::{DbConnection, DbManager};
pub use sla_alert_repository::SqliteSlaAlertRepository;
pub use sla_config_repository::SqliteSlaConfigRepository;
pub use ticket_repository::SqliteTicketRepository;
pub use time_entry_repository::SqliteTimeEntryRepository;
