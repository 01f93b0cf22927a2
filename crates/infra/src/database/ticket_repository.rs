//! SQLite-backed ticket repository.
//!
//! Tickets are owned by the ticketing layer; the SLA engine only reads
//! them. The inherent `insert` and timestamp setters exist for seeding and
//! for the collaborators that record lifecycle events.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use helmdesk_core::TicketRepository as TicketRepositoryPort;
use helmdesk_domain::{HelmdeskError, Result, Ticket};
use rusqlite::{Row, ToSql};
use tokio::task;
use uuid::Uuid;

use super::manager::DbManager;
use super::row::{
    datetime_from_ts, map_join_error, opt_datetime_from_ts, parse_opt_uuid, parse_priority,
    parse_uuid,
};
use crate::errors::InfraError;

/// Ticket repository backed by SQLite
pub struct SqliteTicketRepository {
    db: Arc<DbManager>,
}

impl SqliteTicketRepository {
    /// Construct a repository backed by the shared database manager.
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }

    /// Persist a ticket row (seeding and ticketing-layer writes).
    pub async fn insert(&self, ticket: Ticket) -> Result<()> {
        let db = Arc::clone(&self.db);
        task::spawn_blocking(move || -> Result<()> {
            let conn = db.get_connection()?;
            let params: [&dyn ToSql; 9] = [
                &ticket.id.to_string(),
                &ticket.tenant_id.to_string(),
                &ticket.subject,
                &ticket.priority.as_str(),
                &ticket.category_id.map(|id| id.to_string()),
                &ticket.created_at.timestamp(),
                &ticket.first_response_at.map(|at| at.timestamp()),
                &ticket.resolved_at.map(|at| at.timestamp()),
                &ticket.closed_at.map(|at| at.timestamp()),
            ];
            conn.execute(INSERT_SQL, params.as_slice()).map_err(map_storage_error)?;
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }

    /// Record the first agent reply timestamp, once.
    pub async fn set_first_response(
        &self,
        tenant_id: Uuid,
        id: Uuid,
        at: DateTime<Utc>,
    ) -> Result<bool> {
        self.set_timestamp(SET_FIRST_RESPONSE_SQL, tenant_id, id, at).await
    }

    /// Record the resolution timestamp, once.
    pub async fn set_resolved(
        &self,
        tenant_id: Uuid,
        id: Uuid,
        at: DateTime<Utc>,
    ) -> Result<bool> {
        self.set_timestamp(SET_RESOLVED_SQL, tenant_id, id, at).await
    }

    async fn set_timestamp(
        &self,
        sql: &'static str,
        tenant_id: Uuid,
        id: Uuid,
        at: DateTime<Utc>,
    ) -> Result<bool> {
        let db = Arc::clone(&self.db);
        task::spawn_blocking(move || -> Result<bool> {
            let conn = db.get_connection()?;
            let params: [&dyn ToSql; 3] =
                [&at.timestamp(), &tenant_id.to_string(), &id.to_string()];
            let changed = conn.execute(sql, params.as_slice()).map_err(map_storage_error)?;
            Ok(changed > 0)
        })
        .await
        .map_err(map_join_error)?
    }
}

#[async_trait]
impl TicketRepositoryPort for SqliteTicketRepository {
    async fn find_by_id(&self, tenant_id: Uuid, id: Uuid) -> Result<Option<Ticket>> {
        let db = Arc::clone(&self.db);
        task::spawn_blocking(move || -> Result<Option<Ticket>> {
            let conn = db.get_connection()?;
            let params: [&dyn ToSql; 2] = [&tenant_id.to_string(), &id.to_string()];
            let mut stmt = conn.prepare(FIND_BY_ID_SQL).map_err(map_storage_error)?;
            let mut rows =
                stmt.query_map(params.as_slice(), map_ticket_row).map_err(map_storage_error)?;
            rows.next().transpose().map_err(map_storage_error)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn find_created_between(
        &self,
        tenant_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Ticket>> {
        if start >= end {
            return Err(HelmdeskError::Validation(
                "start timestamp must be before end timestamp".into(),
            ));
        }

        let db = Arc::clone(&self.db);
        task::spawn_blocking(move || -> Result<Vec<Ticket>> {
            let conn = db.get_connection()?;
            let params: [&dyn ToSql; 3] =
                [&tenant_id.to_string(), &start.timestamp(), &end.timestamp()];
            let mut stmt = conn.prepare(CREATED_BETWEEN_SQL).map_err(map_storage_error)?;
            let rows =
                stmt.query_map(params.as_slice(), map_ticket_row).map_err(map_storage_error)?;
            rows.collect::<rusqlite::Result<Vec<_>>>().map_err(map_storage_error)
        })
        .await
        .map_err(map_join_error)?
    }
}

const INSERT_SQL: &str = "INSERT INTO tickets (
        id, tenant_id, subject, priority, category_id,
        created_at, first_response_at, resolved_at, closed_at
    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)";

const FIND_BY_ID_SQL: &str = "SELECT id, tenant_id, subject, priority, category_id,
        created_at, first_response_at, resolved_at, closed_at
    FROM tickets
    WHERE tenant_id = ?1 AND id = ?2";

const CREATED_BETWEEN_SQL: &str = "SELECT id, tenant_id, subject, priority, category_id,
        created_at, first_response_at, resolved_at, closed_at
    FROM tickets
    WHERE tenant_id = ?1 AND created_at >= ?2 AND created_at < ?3
    ORDER BY created_at";

const SET_FIRST_RESPONSE_SQL: &str = "UPDATE tickets SET first_response_at = ?1
    WHERE tenant_id = ?2 AND id = ?3 AND first_response_at IS NULL";

const SET_RESOLVED_SQL: &str = "UPDATE tickets SET resolved_at = ?1
    WHERE tenant_id = ?2 AND id = ?3 AND resolved_at IS NULL";

fn map_ticket_row(row: &Row<'_>) -> rusqlite::Result<Ticket> {
    let id: String = row.get(0)?;
    let tenant_id: String = row.get(1)?;
    let priority: String = row.get(3)?;
    let category_id: Option<String> = row.get(4)?;

    Ok(Ticket {
        id: parse_uuid(&id)?,
        tenant_id: parse_uuid(&tenant_id)?,
        subject: row.get(2)?,
        priority: parse_priority(&priority)?,
        category_id: parse_opt_uuid(category_id)?,
        created_at: datetime_from_ts(row.get(5)?)?,
        first_response_at: opt_datetime_from_ts(row.get(6)?)?,
        resolved_at: opt_datetime_from_ts(row.get(7)?)?,
        closed_at: opt_datetime_from_ts(row.get(8)?)?,
    })
}

fn map_storage_error(err: rusqlite::Error) -> HelmdeskError {
    HelmdeskError::from(InfraError::from(err))
}
