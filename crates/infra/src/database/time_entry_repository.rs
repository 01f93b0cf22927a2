//! SQLite-backed time-entry repository.
//!
//! Completion is guarded by `end_time IS NULL` so each entry closes at
//! most once; the losing side of a concurrent stop sees zero rows changed.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use helmdesk_core::TimeEntryRepository as TimeEntryRepositoryPort;
use helmdesk_domain::{HelmdeskError, Result, TimeEntry};
use rusqlite::{Row, ToSql};
use tokio::task;
use uuid::Uuid;

use super::manager::DbManager;
use super::row::{datetime_from_ts, map_join_error, opt_datetime_from_ts, parse_opt_uuid, parse_uuid};
use crate::errors::InfraError;

/// Time-entry repository backed by SQLite
pub struct SqliteTimeEntryRepository {
    db: Arc<DbManager>,
}

impl SqliteTimeEntryRepository {
    /// Construct a repository backed by the shared database manager.
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TimeEntryRepositoryPort for SqliteTimeEntryRepository {
    async fn insert(&self, entry: TimeEntry) -> Result<()> {
        let db = Arc::clone(&self.db);
        task::spawn_blocking(move || -> Result<()> {
            let conn = db.get_connection()?;
            let params: [&dyn ToSql; 10] = [
                &entry.id.to_string(),
                &entry.tenant_id.to_string(),
                &entry.ticket_id.to_string(),
                &entry.user_id.to_string(),
                &entry.start_time.timestamp(),
                &entry.end_time.map(|at| at.timestamp()),
                &entry.duration_hours,
                &entry.hour_bank_id.map(|id| id.to_string()),
                &entry.description,
                &entry.created_at.timestamp(),
            ];
            conn.execute(INSERT_SQL, params.as_slice()).map_err(map_storage_error)?;
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }

    async fn find_by_id(&self, tenant_id: Uuid, id: Uuid) -> Result<Option<TimeEntry>> {
        let db = Arc::clone(&self.db);
        task::spawn_blocking(move || -> Result<Option<TimeEntry>> {
            let conn = db.get_connection()?;
            let params: [&dyn ToSql; 2] = [&tenant_id.to_string(), &id.to_string()];
            let mut stmt = conn.prepare(FIND_BY_ID_SQL).map_err(map_storage_error)?;
            let mut rows =
                stmt.query_map(params.as_slice(), map_entry_row).map_err(map_storage_error)?;
            rows.next().transpose().map_err(map_storage_error)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn complete(
        &self,
        tenant_id: Uuid,
        id: Uuid,
        end_time: DateTime<Utc>,
        duration_hours: f64,
    ) -> Result<bool> {
        let db = Arc::clone(&self.db);
        task::spawn_blocking(move || -> Result<bool> {
            let conn = db.get_connection()?;
            let params: [&dyn ToSql; 4] = [
                &end_time.timestamp(),
                &duration_hours,
                &tenant_id.to_string(),
                &id.to_string(),
            ];
            let changed =
                conn.execute(COMPLETE_SQL, params.as_slice()).map_err(map_storage_error)?;
            Ok(changed > 0)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn list_by_ticket(
        &self,
        tenant_id: Uuid,
        ticket_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<TimeEntry>> {
        let db = Arc::clone(&self.db);
        task::spawn_blocking(move || -> Result<Vec<TimeEntry>> {
            let conn = db.get_connection()?;
            let params: [&dyn ToSql; 4] =
                [&tenant_id.to_string(), &ticket_id.to_string(), &limit, &offset];
            let mut stmt = conn.prepare(LIST_BY_TICKET_SQL).map_err(map_storage_error)?;
            let rows =
                stmt.query_map(params.as_slice(), map_entry_row).map_err(map_storage_error)?;
            rows.collect::<rusqlite::Result<Vec<_>>>().map_err(map_storage_error)
        })
        .await
        .map_err(map_join_error)?
    }
}

const INSERT_SQL: &str = "INSERT INTO time_entries (
        id, tenant_id, ticket_id, user_id, start_time, end_time,
        duration_hours, hour_bank_id, description, created_at
    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)";

const FIND_BY_ID_SQL: &str = "SELECT id, tenant_id, ticket_id, user_id, start_time, end_time,
        duration_hours, hour_bank_id, description, created_at
    FROM time_entries
    WHERE tenant_id = ?1 AND id = ?2";

// Entries are immutable once closed; the NULL guard makes completion
// single-shot.
const COMPLETE_SQL: &str = "UPDATE time_entries SET end_time = ?1, duration_hours = ?2
    WHERE tenant_id = ?3 AND id = ?4 AND end_time IS NULL";

const LIST_BY_TICKET_SQL: &str = "SELECT id, tenant_id, ticket_id, user_id, start_time, end_time,
        duration_hours, hour_bank_id, description, created_at
    FROM time_entries
    WHERE tenant_id = ?1 AND ticket_id = ?2
    ORDER BY start_time, id
    LIMIT ?3 OFFSET ?4";

fn map_entry_row(row: &Row<'_>) -> rusqlite::Result<TimeEntry> {
    let id: String = row.get(0)?;
    let tenant_id: String = row.get(1)?;
    let ticket_id: String = row.get(2)?;
    let user_id: String = row.get(3)?;
    let hour_bank_id: Option<String> = row.get(7)?;

    Ok(TimeEntry {
        id: parse_uuid(&id)?,
        tenant_id: parse_uuid(&tenant_id)?,
        ticket_id: parse_uuid(&ticket_id)?,
        user_id: parse_uuid(&user_id)?,
        start_time: datetime_from_ts(row.get(4)?)?,
        end_time: opt_datetime_from_ts(row.get(5)?)?,
        duration_hours: row.get(6)?,
        hour_bank_id: parse_opt_uuid(hour_bank_id)?,
        description: row.get(8)?,
        created_at: datetime_from_ts(row.get(9)?)?,
    })
}

fn map_storage_error(err: rusqlite::Error) -> HelmdeskError {
    HelmdeskError::from(InfraError::from(err))
}
