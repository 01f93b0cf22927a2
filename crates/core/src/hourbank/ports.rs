//! Port interfaces for the hour-bank engine

use async_trait::async_trait;
use helmdesk_domain::{HourBank, Result};
use uuid::Uuid;

/// Trait for persisting hour banks
#[async_trait]
pub trait HourBankRepository: Send + Sync {
    /// Persist a new bank
    async fn insert(&self, bank: HourBank) -> Result<()>;

    /// Fetch a bank by id within a tenant
    async fn find_by_id(&self, tenant_id: Uuid, id: Uuid) -> Result<Option<HourBank>>;

    /// Banks for a tenant, optionally narrowed to one customer, one page
    /// at a time
    async fn list(
        &self,
        tenant_id: Uuid,
        customer_id: Option<Uuid>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<HourBank>>;

    /// Atomically increment `consumed_hours` by `hours`.
    ///
    /// Must be a relative update executed under the storage layer's
    /// row-level atomicity, never an application-side read-modify-write;
    /// concurrent debits to the same bank must both land.
    async fn debit(&self, tenant_id: Uuid, id: Uuid, hours: f64) -> Result<bool>;
}
