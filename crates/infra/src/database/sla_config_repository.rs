//! SQLite-backed SLA configuration repository.
//!
//! Implements the `SlaConfigRepository` port. The partial unique index on
//! (tenant, priority, category) makes a second active config for the same
//! combination a constraint violation, surfaced as a validation error.

use std::sync::Arc;

use async_trait::async_trait;
use helmdesk_core::SlaConfigRepository as SlaConfigRepositoryPort;
use helmdesk_domain::{HelmdeskError, Result, SlaConfig, TicketPriority};
use rusqlite::{Row, ToSql};
use tokio::task;
use uuid::Uuid;

use super::manager::{DbConnection, DbManager};
use super::row::{
    bool_to_int, datetime_from_ts, int_to_bool, map_join_error, parse_opt_uuid, parse_priority,
    parse_time_hm, parse_uuid,
};
use crate::errors::InfraError;

/// SLA config repository backed by SQLite
pub struct SqliteSlaConfigRepository {
    db: Arc<DbManager>,
}

impl SqliteSlaConfigRepository {
    /// Construct a repository backed by the shared database manager.
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SlaConfigRepositoryPort for SqliteSlaConfigRepository {
    async fn find_active(
        &self,
        tenant_id: Uuid,
        priority: TicketPriority,
        category_id: Option<Uuid>,
    ) -> Result<Option<SlaConfig>> {
        let db = Arc::clone(&self.db);
        task::spawn_blocking(move || -> Result<Option<SlaConfig>> {
            let conn = db.get_connection()?;

            // Category-specific config wins over the priority-only
            // fallback.
            if let Some(category) = category_id {
                if let Some(config) =
                    query_active(&conn, tenant_id, priority, Some(category))?
                {
                    return Ok(Some(config));
                }
            }
            query_active(&conn, tenant_id, priority, None)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn find_by_id(&self, tenant_id: Uuid, id: Uuid) -> Result<Option<SlaConfig>> {
        let db = Arc::clone(&self.db);
        task::spawn_blocking(move || -> Result<Option<SlaConfig>> {
            let conn = db.get_connection()?;
            let params: [&dyn ToSql; 2] = [&tenant_id.to_string(), &id.to_string()];
            let mut stmt = conn.prepare(FIND_BY_ID_SQL).map_err(map_storage_error)?;
            let mut rows = stmt
                .query_map(params.as_slice(), map_config_row)
                .map_err(map_storage_error)?;
            rows.next().transpose().map_err(map_storage_error)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn list(&self, tenant_id: Uuid) -> Result<Vec<SlaConfig>> {
        let db = Arc::clone(&self.db);
        task::spawn_blocking(move || -> Result<Vec<SlaConfig>> {
            let conn = db.get_connection()?;
            let params: [&dyn ToSql; 1] = [&tenant_id.to_string()];
            let mut stmt = conn.prepare(LIST_SQL).map_err(map_storage_error)?;
            let rows = stmt
                .query_map(params.as_slice(), map_config_row)
                .map_err(map_storage_error)?;
            rows.collect::<rusqlite::Result<Vec<_>>>().map_err(map_storage_error)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn insert(&self, config: SlaConfig) -> Result<()> {
        let db = Arc::clone(&self.db);
        task::spawn_blocking(move || -> Result<()> {
            let conn = db.get_connection()?;
            insert_config(&conn, &config)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn update(&self, config: SlaConfig) -> Result<bool> {
        let db = Arc::clone(&self.db);
        task::spawn_blocking(move || -> Result<bool> {
            let conn = db.get_connection()?;
            let business_days = serialize_days(&config.business_days)?;
            let params: [&dyn ToSql; 10] = [
                &config.first_response_minutes,
                &config.resolution_minutes,
                &config.business_hours_start.format("%H:%M").to_string(),
                &config.business_hours_end.format("%H:%M").to_string(),
                &business_days,
                &config.timezone,
                &bool_to_int(config.is_active),
                &config.updated_at.timestamp(),
                &config.tenant_id.to_string(),
                &config.id.to_string(),
            ];
            let changed =
                conn.execute(UPDATE_SQL, params.as_slice()).map_err(map_constraint_error)?;
            Ok(changed > 0)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn deactivate(&self, tenant_id: Uuid, id: Uuid) -> Result<bool> {
        let db = Arc::clone(&self.db);
        task::spawn_blocking(move || -> Result<bool> {
            let conn = db.get_connection()?;
            let params: [&dyn ToSql; 2] = [&tenant_id.to_string(), &id.to_string()];
            let changed =
                conn.execute(DEACTIVATE_SQL, params.as_slice()).map_err(map_storage_error)?;
            Ok(changed > 0)
        })
        .await
        .map_err(map_join_error)?
    }
}

const FIND_BY_ID_SQL: &str = "SELECT id, tenant_id, priority, category_id, first_response_minutes,
        resolution_minutes, business_hours_start, business_hours_end,
        business_days, timezone, is_active, created_at, updated_at
    FROM sla_configs
    WHERE tenant_id = ?1 AND id = ?2";

const LIST_SQL: &str = "SELECT id, tenant_id, priority, category_id, first_response_minutes,
        resolution_minutes, business_hours_start, business_hours_end,
        business_days, timezone, is_active, created_at, updated_at
    FROM sla_configs
    WHERE tenant_id = ?1
    ORDER BY created_at";

const ACTIVE_WITH_CATEGORY_SQL: &str =
    "SELECT id, tenant_id, priority, category_id, first_response_minutes,
        resolution_minutes, business_hours_start, business_hours_end,
        business_days, timezone, is_active, created_at, updated_at
    FROM sla_configs
    WHERE tenant_id = ?1 AND priority = ?2 AND category_id = ?3 AND is_active = 1
    LIMIT 1";

const ACTIVE_WITHOUT_CATEGORY_SQL: &str =
    "SELECT id, tenant_id, priority, category_id, first_response_minutes,
        resolution_minutes, business_hours_start, business_hours_end,
        business_days, timezone, is_active, created_at, updated_at
    FROM sla_configs
    WHERE tenant_id = ?1 AND priority = ?2 AND category_id IS NULL AND is_active = 1
    LIMIT 1";

const INSERT_SQL: &str = "INSERT INTO sla_configs (
        id, tenant_id, priority, category_id, first_response_minutes,
        resolution_minutes, business_hours_start, business_hours_end,
        business_days, timezone, is_active, created_at, updated_at
    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)";

const UPDATE_SQL: &str = "UPDATE sla_configs SET
        first_response_minutes = ?1, resolution_minutes = ?2,
        business_hours_start = ?3, business_hours_end = ?4,
        business_days = ?5, timezone = ?6, is_active = ?7, updated_at = ?8
    WHERE tenant_id = ?9 AND id = ?10";

const DEACTIVATE_SQL: &str =
    "UPDATE sla_configs SET is_active = 0 WHERE tenant_id = ?1 AND id = ?2";

fn query_active(
    conn: &DbConnection,
    tenant_id: Uuid,
    priority: TicketPriority,
    category_id: Option<Uuid>,
) -> Result<Option<SlaConfig>> {
    let tenant = tenant_id.to_string();
    let priority = priority.as_str();

    let mut rows = match category_id {
        Some(category) => {
            let category = category.to_string();
            let params: [&dyn ToSql; 3] = [&tenant, &priority, &category];
            let mut stmt =
                conn.prepare(ACTIVE_WITH_CATEGORY_SQL).map_err(map_storage_error)?;
            let collected: rusqlite::Result<Vec<SlaConfig>> =
                stmt.query_map(params.as_slice(), map_config_row).map_err(map_storage_error)?.collect();
            collected.map_err(map_storage_error)?
        }
        None => {
            let params: [&dyn ToSql; 2] = [&tenant, &priority];
            let mut stmt =
                conn.prepare(ACTIVE_WITHOUT_CATEGORY_SQL).map_err(map_storage_error)?;
            let collected: rusqlite::Result<Vec<SlaConfig>> =
                stmt.query_map(params.as_slice(), map_config_row).map_err(map_storage_error)?.collect();
            collected.map_err(map_storage_error)?
        }
    };

    Ok(rows.pop())
}

fn insert_config(conn: &DbConnection, config: &SlaConfig) -> Result<()> {
    let business_days = serialize_days(&config.business_days)?;
    let params: [&dyn ToSql; 13] = [
        &config.id.to_string(),
        &config.tenant_id.to_string(),
        &config.priority.as_str(),
        &config.category_id.map(|id| id.to_string()),
        &config.first_response_minutes,
        &config.resolution_minutes,
        &config.business_hours_start.format("%H:%M").to_string(),
        &config.business_hours_end.format("%H:%M").to_string(),
        &business_days,
        &config.timezone,
        &bool_to_int(config.is_active),
        &config.created_at.timestamp(),
        &config.updated_at.timestamp(),
    ];

    conn.execute(INSERT_SQL, params.as_slice()).map_err(map_constraint_error)?;
    Ok(())
}

fn map_config_row(row: &Row<'_>) -> rusqlite::Result<SlaConfig> {
    let id: String = row.get(0)?;
    let tenant_id: String = row.get(1)?;
    let priority: String = row.get(2)?;
    let category_id: Option<String> = row.get(3)?;
    let start: String = row.get(6)?;
    let end: String = row.get(7)?;
    let business_days_json: String = row.get(8)?;

    let business_days: Vec<u8> = serde_json::from_str(&business_days_json).map_err(|err| {
        rusqlite::Error::FromSqlConversionFailure(
            8,
            rusqlite::types::Type::Text,
            Box::new(err),
        )
    })?;

    Ok(SlaConfig {
        id: parse_uuid(&id)?,
        tenant_id: parse_uuid(&tenant_id)?,
        priority: parse_priority(&priority)?,
        category_id: parse_opt_uuid(category_id)?,
        first_response_minutes: row.get(4)?,
        resolution_minutes: row.get(5)?,
        business_hours_start: parse_time_hm(&start)?,
        business_hours_end: parse_time_hm(&end)?,
        business_days,
        timezone: row.get(9)?,
        is_active: int_to_bool(row.get(10)?),
        created_at: datetime_from_ts(row.get(11)?)?,
        updated_at: datetime_from_ts(row.get(12)?)?,
    })
}

fn serialize_days(days: &[u8]) -> Result<String> {
    serde_json::to_string(days).map_err(|err| HelmdeskError::from(InfraError::from(err)))
}

fn map_storage_error(err: rusqlite::Error) -> HelmdeskError {
    HelmdeskError::from(InfraError::from(err))
}

/// The active-combo unique index makes duplicate active configs a caller
/// error, not a storage failure.
fn map_constraint_error(err: rusqlite::Error) -> HelmdeskError {
    if let rusqlite::Error::SqliteFailure(code, _) = &err {
        if code.code == rusqlite::ErrorCode::ConstraintViolation {
            return HelmdeskError::Validation(
                "an active SLA config already exists for this priority and category".into(),
            );
        }
    }
    map_storage_error(err)
}
