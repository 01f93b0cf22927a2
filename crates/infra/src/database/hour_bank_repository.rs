//! SQLite-backed hour-bank repository.
//!
//! The debit is a relative `consumed_hours = consumed_hours + ?` update:
//! two concurrent timer-stops against the same bank both land, with no
//! application-side read-modify-write window.

use std::sync::Arc;

use async_trait::async_trait;
use helmdesk_core::HourBankRepository as HourBankRepositoryPort;
use helmdesk_domain::{HelmdeskError, HourBank, Result};
use rusqlite::{Row, ToSql};
use tokio::task;
use uuid::Uuid;

use super::manager::DbManager;
use super::row::{bool_to_int, datetime_from_ts, int_to_bool, map_join_error, opt_datetime_from_ts, parse_uuid};
use crate::errors::InfraError;

/// Hour-bank repository backed by SQLite
pub struct SqliteHourBankRepository {
    db: Arc<DbManager>,
}

impl SqliteHourBankRepository {
    /// Construct a repository backed by the shared database manager.
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }

    /// Deactivate a bank.
    pub async fn deactivate(&self, tenant_id: Uuid, id: Uuid) -> Result<bool> {
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

#[async_trait]
impl HourBankRepositoryPort for SqliteHourBankRepository {
    async fn insert(&self, bank: HourBank) -> Result<()> {
        let db = Arc::clone(&self.db);
        task::spawn_blocking(move || -> Result<()> {
            let conn = db.get_connection()?;
            let params: [&dyn ToSql; 9] = [
                &bank.id.to_string(),
                &bank.tenant_id.to_string(),
                &bank.customer_id.to_string(),
                &bank.total_hours,
                &bank.consumed_hours,
                &bank.hourly_rate,
                &bank.expires_at.map(|at| at.timestamp()),
                &bool_to_int(bank.is_active),
                &bank.created_at.timestamp(),
            ];
            conn.execute(INSERT_SQL, params.as_slice()).map_err(map_storage_error)?;
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }

    async fn find_by_id(&self, tenant_id: Uuid, id: Uuid) -> Result<Option<HourBank>> {
        let db = Arc::clone(&self.db);
        task::spawn_blocking(move || -> Result<Option<HourBank>> {
            let conn = db.get_connection()?;
            let params: [&dyn ToSql; 2] = [&tenant_id.to_string(), &id.to_string()];
            let mut stmt = conn.prepare(FIND_BY_ID_SQL).map_err(map_storage_error)?;
            let mut rows =
                stmt.query_map(params.as_slice(), map_bank_row).map_err(map_storage_error)?;
            rows.next().transpose().map_err(map_storage_error)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn list(
        &self,
        tenant_id: Uuid,
        customer_id: Option<Uuid>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<HourBank>> {
        let db = Arc::clone(&self.db);
        task::spawn_blocking(move || -> Result<Vec<HourBank>> {
            let conn = db.get_connection()?;
            let tenant = tenant_id.to_string();

            let collected = match customer_id {
                Some(customer) => {
                    let customer = customer.to_string();
                    let params: [&dyn ToSql; 4] = [&tenant, &customer, &limit, &offset];
                    let mut stmt =
                        conn.prepare(LIST_BY_CUSTOMER_SQL).map_err(map_storage_error)?;
                    let rows = stmt
                        .query_map(params.as_slice(), map_bank_row)
                        .map_err(map_storage_error)?;
                    rows.collect::<rusqlite::Result<Vec<_>>>()
                }
                None => {
                    let params: [&dyn ToSql; 3] = [&tenant, &limit, &offset];
                    let mut stmt = conn.prepare(LIST_SQL).map_err(map_storage_error)?;
                    let rows = stmt
                        .query_map(params.as_slice(), map_bank_row)
                        .map_err(map_storage_error)?;
                    rows.collect::<rusqlite::Result<Vec<_>>>()
                }
            };

            collected.map_err(map_storage_error)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn debit(&self, tenant_id: Uuid, id: Uuid, hours: f64) -> Result<bool> {
        let db = Arc::clone(&self.db);
        task::spawn_blocking(move || -> Result<bool> {
            let conn = db.get_connection()?;
            let params: [&dyn ToSql; 3] = [&hours, &tenant_id.to_string(), &id.to_string()];
            let changed = conn.execute(DEBIT_SQL, params.as_slice()).map_err(map_storage_error)?;
            Ok(changed > 0)
        })
        .await
        .map_err(map_join_error)?
    }
}

const INSERT_SQL: &str = "INSERT INTO hour_banks (
        id, tenant_id, customer_id, total_hours, consumed_hours,
        hourly_rate, expires_at, is_active, created_at
    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)";

const FIND_BY_ID_SQL: &str = "SELECT id, tenant_id, customer_id, total_hours, consumed_hours,
        hourly_rate, expires_at, is_active, created_at
    FROM hour_banks
    WHERE tenant_id = ?1 AND id = ?2";

const LIST_SQL: &str = "SELECT id, tenant_id, customer_id, total_hours, consumed_hours,
        hourly_rate, expires_at, is_active, created_at
    FROM hour_banks
    WHERE tenant_id = ?1
    ORDER BY created_at, id
    LIMIT ?2 OFFSET ?3";

const LIST_BY_CUSTOMER_SQL: &str = "SELECT id, tenant_id, customer_id, total_hours, consumed_hours,
        hourly_rate, expires_at, is_active, created_at
    FROM hour_banks
    WHERE tenant_id = ?1 AND customer_id = ?2
    ORDER BY created_at, id
    LIMIT ?3 OFFSET ?4";

// Relative update under SQLite row atomicity; additive debits commute.
const DEBIT_SQL: &str = "UPDATE hour_banks SET consumed_hours = consumed_hours + ?1
    WHERE tenant_id = ?2 AND id = ?3";

const DEACTIVATE_SQL: &str =
    "UPDATE hour_banks SET is_active = 0 WHERE tenant_id = ?1 AND id = ?2";

fn map_bank_row(row: &Row<'_>) -> rusqlite::Result<HourBank> {
    let id: String = row.get(0)?;
    let tenant_id: String = row.get(1)?;
    let customer_id: String = row.get(2)?;

    Ok(HourBank {
        id: parse_uuid(&id)?,
        tenant_id: parse_uuid(&tenant_id)?,
        customer_id: parse_uuid(&customer_id)?,
        total_hours: row.get(3)?,
        consumed_hours: row.get(4)?,
        hourly_rate: row.get(5)?,
        expires_at: opt_datetime_from_ts(row.get(6)?)?,
        is_active: int_to_bool(row.get(7)?),
        created_at: datetime_from_ts(row.get(8)?)?,
    })
}

fn map_storage_error(err: rusqlite::Error) -> HelmdeskError {
    HelmdeskError::from(InfraError::from(err))
}
