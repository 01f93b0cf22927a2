//! Port interfaces for the SLA engine
//!
//! These traits define the boundaries between core business logic
//! and infrastructure implementations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use helmdesk_domain::{Result, SlaAlert, SlaAlertType, SlaConfig, Ticket, TicketPriority};
use uuid::Uuid;

/// Trait for SLA configuration lookup and mutation
#[async_trait]
pub trait SlaConfigRepository: Send + Sync {
    /// Find the active config for a ticket's (priority, category).
    ///
    /// A category-specific config takes precedence over a priority-only
    /// config; `None` means SLA tracking is off for that ticket.
    async fn find_active(
        &self,
        tenant_id: Uuid,
        priority: TicketPriority,
        category_id: Option<Uuid>,
    ) -> Result<Option<SlaConfig>>;

    /// Fetch a config by id within a tenant
    async fn find_by_id(&self, tenant_id: Uuid, id: Uuid) -> Result<Option<SlaConfig>>;

    /// All configs for a tenant, active and inactive
    async fn list(&self, tenant_id: Uuid) -> Result<Vec<SlaConfig>>;

    /// Persist a new config
    async fn insert(&self, config: SlaConfig) -> Result<()>;

    /// Persist changes to an existing config; false when absent
    async fn update(&self, config: SlaConfig) -> Result<bool>;

    /// Deactivate a config (configs are never deleted); false when absent
    async fn deactivate(&self, tenant_id: Uuid, id: Uuid) -> Result<bool>;
}

/// Trait for reading tickets (lifecycle owned by the ticketing layer)
#[async_trait]
pub trait TicketRepository: Send + Sync {
    /// Fetch a ticket by id within a tenant
    async fn find_by_id(&self, tenant_id: Uuid, id: Uuid) -> Result<Option<Ticket>>;

    /// Tickets created inside `[start, end)` for report aggregation
    async fn find_created_between(
        &self,
        tenant_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Ticket>>;
}

/// Trait for persisting SLA alerts
#[async_trait]
pub trait SlaAlertRepository: Send + Sync {
    /// Insert an alert unless one already exists for the same
    /// (ticket, alert type); returns whether a row was written.
    ///
    /// Duplicate inserts racing each other are a success, not an error.
    async fn insert_if_absent(&self, alert: SlaAlert) -> Result<bool>;

    /// Whether an alert is already recorded for this (ticket, type)
    async fn exists(&self, ticket_id: Uuid, alert_type: SlaAlertType) -> Result<bool>;

    /// Unresolved alerts for a tenant, newest first, one page at a time
    async fn list_unresolved(
        &self,
        tenant_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<SlaAlert>>;
}
