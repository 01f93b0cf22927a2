//! Port interfaces for time entries

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use helmdesk_domain::{Result, TimeEntry};
use uuid::Uuid;

/// Trait for persisting time entries
#[async_trait]
pub trait TimeEntryRepository: Send + Sync {
    /// Persist a new entry (open timer or closed manual entry)
    async fn insert(&self, entry: TimeEntry) -> Result<()>;

    /// Fetch an entry by id within a tenant
    async fn find_by_id(&self, tenant_id: Uuid, id: Uuid) -> Result<Option<TimeEntry>>;

    /// Close a running entry, setting `end_time` and the derived duration.
    ///
    /// Returns false when the entry is absent or already closed; entries
    /// are immutable once stopped.
    async fn complete(
        &self,
        tenant_id: Uuid,
        id: Uuid,
        end_time: DateTime<Utc>,
        duration_hours: f64,
    ) -> Result<bool>;

    /// Entries logged against a ticket, oldest first, one page at a time
    async fn list_by_ticket(
        &self,
        tenant_id: Uuid,
        ticket_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<TimeEntry>>;
}
