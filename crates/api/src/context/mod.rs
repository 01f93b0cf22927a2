//! Application context - dependency injection container

use std::sync::Arc;

use helmdesk_core::{HourBankService, SlaService, TimeEntryService};
use helmdesk_domain::{Config, Result};
use helmdesk_infra::database::{
    SqliteHourBankRepository, SqliteSlaAlertRepository, SqliteSlaConfigRepository,
    SqliteTicketRepository, SqliteTimeEntryRepository,
};
use helmdesk_infra::DbManager;
use tracing::info;

/// Application context - holds all services and dependencies
#[derive(Clone)]
pub struct AppContext {
    pub db: Arc<DbManager>,
    pub sla: Arc<SlaService>,
    pub hour_banks: Arc<HourBankService>,
    pub time_entries: Arc<TimeEntryService>,
    /// Kept for collaborators that record ticket lifecycle events.
    pub tickets: Arc<SqliteTicketRepository>,
}

impl AppContext {
    /// Wire repositories and services over a migrated database.
    pub fn new(config: &Config) -> Result<Self> {
        let db = Arc::new(DbManager::new(&config.database.path, config.database.pool_size)?);
        db.run_migrations()?;

        Self::with_db(db, config)
    }

    /// Wire services over an existing database manager (tests, embedding).
    pub fn with_db(db: Arc<DbManager>, config: &Config) -> Result<Self> {
        let configs = Arc::new(SqliteSlaConfigRepository::new(db.clone()));
        let tickets = Arc::new(SqliteTicketRepository::new(db.clone()));
        let alerts = Arc::new(SqliteSlaAlertRepository::new(db.clone()));
        let banks = Arc::new(SqliteHourBankRepository::new(db.clone()));
        let entries = Arc::new(SqliteTimeEntryRepository::new(db.clone()));

        let sla = Arc::new(SlaService::new(configs, tickets.clone(), alerts));
        let hour_banks = Arc::new(HourBankService::new(banks, config.debit));
        let time_entries = Arc::new(TimeEntryService::new(entries, hour_banks.clone()));

        info!("application context initialised");

        Ok(Self { db, sla, hour_banks, time_entries, tickets })
    }
}
