//! Shared fixtures for infra integration tests.

use std::sync::Arc;

use chrono::{DateTime, NaiveTime, Utc};
use helmdesk_domain::{HourBank, SlaConfig, Ticket, TicketPriority, TimeEntry};
use helmdesk_infra::DbManager;
use tempfile::TempDir;
use uuid::Uuid;

/// Current time truncated to whole seconds, matching storage resolution.
pub fn now_secs() -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(Utc::now().timestamp(), 0).expect("valid timestamp")
}

/// Temporary database wrapper that keeps the underlying file alive for the
/// duration of a test run.
pub struct TestDatabase {
    pub manager: Arc<DbManager>,
    _temp_dir: TempDir,
}

impl TestDatabase {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("temp dir created");
        let db_path = temp_dir.path().join("helmdesk.db");

        let manager = Arc::new(DbManager::new(&db_path, 4).expect("db manager created"));
        manager.run_migrations().expect("migrations run");

        Self { manager, _temp_dir: temp_dir }
    }
}

pub fn sample_config(tenant_id: Uuid, priority: TicketPriority) -> SlaConfig {
    let now = Utc::now();
    SlaConfig {
        id: Uuid::new_v4(),
        tenant_id,
        priority,
        category_id: None,
        first_response_minutes: 60,
        resolution_minutes: 480,
        business_hours_start: NaiveTime::from_hms_opt(9, 0, 0).expect("valid time"),
        business_hours_end: NaiveTime::from_hms_opt(18, 0, 0).expect("valid time"),
        business_days: vec![1, 2, 3, 4, 5],
        timezone: "America/Sao_Paulo".to_string(),
        is_active: true,
        created_at: now,
        updated_at: now,
    }
}

pub fn sample_ticket(tenant_id: Uuid, created_at: DateTime<Utc>) -> Ticket {
    Ticket {
        id: Uuid::new_v4(),
        tenant_id,
        subject: "cannot reach VPN".to_string(),
        priority: TicketPriority::High,
        category_id: None,
        created_at,
        first_response_at: None,
        resolved_at: None,
        closed_at: None,
    }
}

pub fn sample_bank(tenant_id: Uuid, total_hours: f64) -> HourBank {
    HourBank {
        id: Uuid::new_v4(),
        tenant_id,
        customer_id: Uuid::new_v4(),
        total_hours,
        consumed_hours: 0.0,
        hourly_rate: Some(110.0),
        expires_at: None,
        is_active: true,
        created_at: Utc::now(),
    }
}

pub fn sample_entry(tenant_id: Uuid, start_time: DateTime<Utc>) -> TimeEntry {
    TimeEntry {
        id: Uuid::new_v4(),
        tenant_id,
        ticket_id: Uuid::new_v4(),
        user_id: Uuid::new_v4(),
        start_time,
        end_time: None,
        duration_hours: None,
        hour_bank_id: None,
        description: "support call".to_string(),
        created_at: start_time,
    }
}
