//! SQLite-backed SLA alert repository.
//!
//! The unique index on (ticket_id, alert_type) carries the idempotence
//! invariant: `INSERT OR IGNORE` turns a duplicate insert, including one
//! racing a concurrent classifier run, into a no-op success.

use std::sync::Arc;

use async_trait::async_trait;
use helmdesk_core::SlaAlertRepository as SlaAlertRepositoryPort;
use helmdesk_domain::{HelmdeskError, Result, SlaAlert, SlaAlertType};
use rusqlite::{Row, ToSql};
use tokio::task;
use uuid::Uuid;

use super::manager::DbManager;
use super::row::{datetime_from_ts, map_join_error, opt_datetime_from_ts, parse_priority, parse_uuid};
use crate::errors::InfraError;

/// Alert repository backed by SQLite
pub struct SqliteSlaAlertRepository {
    db: Arc<DbManager>,
}

impl SqliteSlaAlertRepository {
    /// Construct a repository backed by the shared database manager.
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }

    /// Mark an alert resolved.
    pub async fn resolve(&self, tenant_id: Uuid, id: Uuid, at: chrono::DateTime<chrono::Utc>) -> Result<bool> {
        let db = Arc::clone(&self.db);
        task::spawn_blocking(move || -> Result<bool> {
            let conn = db.get_connection()?;
            let params: [&dyn ToSql; 3] =
                [&at.timestamp(), &tenant_id.to_string(), &id.to_string()];
            let changed = conn.execute(RESOLVE_SQL, params.as_slice()).map_err(map_storage_error)?;
            Ok(changed > 0)
        })
        .await
        .map_err(map_join_error)?
    }
}

#[async_trait]
impl SlaAlertRepositoryPort for SqliteSlaAlertRepository {
    async fn insert_if_absent(&self, alert: SlaAlert) -> Result<bool> {
        let db = Arc::clone(&self.db);
        task::spawn_blocking(move || -> Result<bool> {
            let conn = db.get_connection()?;
            let params: [&dyn ToSql; 8] = [
                &alert.id.to_string(),
                &alert.tenant_id.to_string(),
                &alert.ticket_id.to_string(),
                &alert.alert_type.as_str(),
                &alert.severity.as_str(),
                &alert.message,
                &alert.created_at.timestamp(),
                &alert.resolved_at.map(|at| at.timestamp()),
            ];
            let inserted =
                conn.execute(INSERT_OR_IGNORE_SQL, params.as_slice()).map_err(map_storage_error)?;
            Ok(inserted > 0)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn exists(&self, ticket_id: Uuid, alert_type: SlaAlertType) -> Result<bool> {
        let db = Arc::clone(&self.db);
        task::spawn_blocking(move || -> Result<bool> {
            let conn = db.get_connection()?;
            let params: [&dyn ToSql; 2] = [&ticket_id.to_string(), &alert_type.as_str()];
            let count: i64 = conn
                .query_row(EXISTS_SQL, params.as_slice(), |row| row.get(0))
                .map_err(map_storage_error)?;
            Ok(count > 0)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn list_unresolved(
        &self,
        tenant_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<SlaAlert>> {
        let db = Arc::clone(&self.db);
        task::spawn_blocking(move || -> Result<Vec<SlaAlert>> {
            let conn = db.get_connection()?;
            let params: [&dyn ToSql; 3] = [&tenant_id.to_string(), &limit, &offset];
            let mut stmt = conn.prepare(LIST_UNRESOLVED_SQL).map_err(map_storage_error)?;
            let rows =
                stmt.query_map(params.as_slice(), map_alert_row).map_err(map_storage_error)?;
            rows.collect::<rusqlite::Result<Vec<_>>>().map_err(map_storage_error)
        })
        .await
        .map_err(map_join_error)?
    }
}

const INSERT_OR_IGNORE_SQL: &str = "INSERT OR IGNORE INTO sla_alerts (
        id, tenant_id, ticket_id, alert_type, severity, message,
        created_at, resolved_at
    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)";

const EXISTS_SQL: &str =
    "SELECT COUNT(*) FROM sla_alerts WHERE ticket_id = ?1 AND alert_type = ?2";

const LIST_UNRESOLVED_SQL: &str = "SELECT id, tenant_id, ticket_id, alert_type, severity,
        message, created_at, resolved_at
    FROM sla_alerts
    WHERE tenant_id = ?1 AND resolved_at IS NULL
    ORDER BY created_at DESC
    LIMIT ?2 OFFSET ?3";

const RESOLVE_SQL: &str = "UPDATE sla_alerts SET resolved_at = ?1
    WHERE tenant_id = ?2 AND id = ?3 AND resolved_at IS NULL";

fn map_alert_row(row: &Row<'_>) -> rusqlite::Result<SlaAlert> {
    let id: String = row.get(0)?;
    let tenant_id: String = row.get(1)?;
    let ticket_id: String = row.get(2)?;
    let alert_type: String = row.get(3)?;
    let severity: String = row.get(4)?;

    let alert_type = alert_type.parse().map_err(|message: String| {
        rusqlite::Error::FromSqlConversionFailure(3, rusqlite::types::Type::Text, message.into())
    })?;

    Ok(SlaAlert {
        id: parse_uuid(&id)?,
        tenant_id: parse_uuid(&tenant_id)?,
        ticket_id: parse_uuid(&ticket_id)?,
        alert_type,
        severity: parse_priority(&severity)?,
        message: row.get(5)?,
        created_at: datetime_from_ts(row.get(6)?)?,
        resolved_at: opt_datetime_from_ts(row.get(7)?)?,
    })
}

fn map_storage_error(err: rusqlite::Error) -> HelmdeskError {
    HelmdeskError::from(InfraError::from(err))
}
