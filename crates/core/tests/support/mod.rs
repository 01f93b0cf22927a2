//! Shared in-memory fakes for core engine integration tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, NaiveTime, Utc};
use helmdesk_core::{
    HourBankRepository, SlaAlertRepository, SlaConfigRepository, TicketRepository,
    TimeEntryRepository,
};
use helmdesk_domain::{
    HelmdeskError, HourBank, Result, SlaAlert, SlaAlertType, SlaConfig, Ticket, TicketPriority,
    TimeEntry,
};
use uuid::Uuid;

#[derive(Default)]
pub struct InMemorySlaConfigs {
    configs: Mutex<Vec<SlaConfig>>,
}

impl InMemorySlaConfigs {
    pub fn with(configs: Vec<SlaConfig>) -> Self {
        Self { configs: Mutex::new(configs) }
    }
}

#[async_trait]
impl SlaConfigRepository for InMemorySlaConfigs {
    async fn find_active(
        &self,
        tenant_id: Uuid,
        priority: TicketPriority,
        category_id: Option<Uuid>,
    ) -> Result<Option<SlaConfig>> {
        let configs = self.configs.lock().map_err(poisoned)?;
        let matches = |config: &&SlaConfig, category: Option<Uuid>| {
            config.tenant_id == tenant_id
                && config.priority == priority
                && config.is_active
                && config.category_id == category
        };

        // Category-specific config wins over the priority-only fallback.
        if category_id.is_some() {
            if let Some(found) = configs.iter().find(|c| matches(c, category_id)) {
                return Ok(Some(found.clone()));
            }
        }
        Ok(configs.iter().find(|c| matches(c, None)).cloned())
    }

    async fn find_by_id(&self, tenant_id: Uuid, id: Uuid) -> Result<Option<SlaConfig>> {
        let configs = self.configs.lock().map_err(poisoned)?;
        Ok(configs.iter().find(|c| c.tenant_id == tenant_id && c.id == id).cloned())
    }

    async fn list(&self, tenant_id: Uuid) -> Result<Vec<SlaConfig>> {
        let configs = self.configs.lock().map_err(poisoned)?;
        Ok(configs.iter().filter(|c| c.tenant_id == tenant_id).cloned().collect())
    }

    async fn insert(&self, config: SlaConfig) -> Result<()> {
        self.configs.lock().map_err(poisoned)?.push(config);
        Ok(())
    }

    async fn update(&self, config: SlaConfig) -> Result<bool> {
        let mut configs = self.configs.lock().map_err(poisoned)?;
        match configs.iter_mut().find(|c| c.tenant_id == config.tenant_id && c.id == config.id) {
            Some(slot) => {
                *slot = config;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn deactivate(&self, tenant_id: Uuid, id: Uuid) -> Result<bool> {
        let mut configs = self.configs.lock().map_err(poisoned)?;
        match configs.iter_mut().find(|c| c.tenant_id == tenant_id && c.id == id) {
            Some(config) => {
                config.is_active = false;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[derive(Default)]
pub struct InMemoryTickets {
    tickets: Mutex<HashMap<Uuid, Ticket>>,
}

impl InMemoryTickets {
    pub fn with(tickets: Vec<Ticket>) -> Self {
        Self { tickets: Mutex::new(tickets.into_iter().map(|t| (t.id, t)).collect()) }
    }
}

#[async_trait]
impl TicketRepository for InMemoryTickets {
    async fn find_by_id(&self, tenant_id: Uuid, id: Uuid) -> Result<Option<Ticket>> {
        let tickets = self.tickets.lock().map_err(poisoned)?;
        Ok(tickets.get(&id).filter(|t| t.tenant_id == tenant_id).cloned())
    }

    async fn find_created_between(
        &self,
        tenant_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Ticket>> {
        let tickets = self.tickets.lock().map_err(poisoned)?;
        let mut found: Vec<Ticket> = tickets
            .values()
            .filter(|t| t.tenant_id == tenant_id && t.created_at >= start && t.created_at < end)
            .cloned()
            .collect();
        found.sort_by_key(|t| t.created_at);
        Ok(found)
    }
}

#[derive(Default)]
pub struct InMemoryAlerts {
    alerts: Mutex<Vec<SlaAlert>>,
}

impl InMemoryAlerts {
    pub fn count(&self, ticket_id: Uuid, alert_type: SlaAlertType) -> usize {
        self.alerts
            .lock()
            .map(|alerts| {
                alerts
                    .iter()
                    .filter(|a| a.ticket_id == ticket_id && a.alert_type == alert_type)
                    .count()
            })
            .unwrap_or(0)
    }
}

#[async_trait]
impl SlaAlertRepository for InMemoryAlerts {
    async fn insert_if_absent(&self, alert: SlaAlert) -> Result<bool> {
        let mut alerts = self.alerts.lock().map_err(poisoned)?;
        let exists = alerts
            .iter()
            .any(|a| a.ticket_id == alert.ticket_id && a.alert_type == alert.alert_type);
        if exists {
            return Ok(false);
        }
        alerts.push(alert);
        Ok(true)
    }

    async fn exists(&self, ticket_id: Uuid, alert_type: SlaAlertType) -> Result<bool> {
        let alerts = self.alerts.lock().map_err(poisoned)?;
        Ok(alerts.iter().any(|a| a.ticket_id == ticket_id && a.alert_type == alert_type))
    }

    async fn list_unresolved(
        &self,
        tenant_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<SlaAlert>> {
        let alerts = self.alerts.lock().map_err(poisoned)?;
        let mut found: Vec<SlaAlert> = alerts
            .iter()
            .filter(|a| a.tenant_id == tenant_id && a.resolved_at.is_none())
            .cloned()
            .collect();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(found.into_iter().skip(offset as usize).take(limit as usize).collect())
    }
}

#[derive(Default)]
pub struct InMemoryBanks {
    banks: Mutex<HashMap<Uuid, HourBank>>,
}

impl InMemoryBanks {
    pub fn with(banks: Vec<HourBank>) -> Self {
        Self { banks: Mutex::new(banks.into_iter().map(|b| (b.id, b)).collect()) }
    }

    pub fn consumed(&self, id: Uuid) -> f64 {
        self.banks.lock().map(|banks| banks.get(&id).map_or(0.0, |b| b.consumed_hours)).unwrap_or(0.0)
    }
}

#[async_trait]
impl HourBankRepository for InMemoryBanks {
    async fn insert(&self, bank: HourBank) -> Result<()> {
        self.banks.lock().map_err(poisoned)?.insert(bank.id, bank);
        Ok(())
    }

    async fn find_by_id(&self, tenant_id: Uuid, id: Uuid) -> Result<Option<HourBank>> {
        let banks = self.banks.lock().map_err(poisoned)?;
        Ok(banks.get(&id).filter(|b| b.tenant_id == tenant_id).cloned())
    }

    async fn list(
        &self,
        tenant_id: Uuid,
        customer_id: Option<Uuid>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<HourBank>> {
        let banks = self.banks.lock().map_err(poisoned)?;
        let mut found: Vec<HourBank> = banks
            .values()
            .filter(|b| {
                b.tenant_id == tenant_id
                    && customer_id.map_or(true, |customer| b.customer_id == customer)
            })
            .cloned()
            .collect();
        found.sort_by_key(|b| b.created_at);
        Ok(found.into_iter().skip(offset as usize).take(limit as usize).collect())
    }

    async fn debit(&self, tenant_id: Uuid, id: Uuid, hours: f64) -> Result<bool> {
        let mut banks = self.banks.lock().map_err(poisoned)?;
        match banks.get_mut(&id).filter(|b| b.tenant_id == tenant_id) {
            Some(bank) => {
                bank.consumed_hours += hours;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[derive(Default)]
pub struct InMemoryEntries {
    entries: Mutex<HashMap<Uuid, TimeEntry>>,
}

#[async_trait]
impl TimeEntryRepository for InMemoryEntries {
    async fn insert(&self, entry: TimeEntry) -> Result<()> {
        self.entries.lock().map_err(poisoned)?.insert(entry.id, entry);
        Ok(())
    }

    async fn find_by_id(&self, tenant_id: Uuid, id: Uuid) -> Result<Option<TimeEntry>> {
        let entries = self.entries.lock().map_err(poisoned)?;
        Ok(entries.get(&id).filter(|e| e.tenant_id == tenant_id).cloned())
    }

    async fn complete(
        &self,
        tenant_id: Uuid,
        id: Uuid,
        end_time: DateTime<Utc>,
        duration_hours: f64,
    ) -> Result<bool> {
        let mut entries = self.entries.lock().map_err(poisoned)?;
        match entries
            .get_mut(&id)
            .filter(|e| e.tenant_id == tenant_id && e.end_time.is_none())
        {
            Some(entry) => {
                entry.end_time = Some(end_time);
                entry.duration_hours = Some(duration_hours);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn list_by_ticket(
        &self,
        tenant_id: Uuid,
        ticket_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<TimeEntry>> {
        let entries = self.entries.lock().map_err(poisoned)?;
        let mut found: Vec<TimeEntry> = entries
            .values()
            .filter(|e| e.tenant_id == tenant_id && e.ticket_id == ticket_id)
            .cloned()
            .collect();
        found.sort_by_key(|e| e.start_time);
        Ok(found.into_iter().skip(offset as usize).take(limit as usize).collect())
    }
}

fn poisoned<T>(_: std::sync::PoisonError<T>) -> HelmdeskError {
    HelmdeskError::Internal("test repository mutex poisoned".into())
}

// ---------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------

pub fn weekday_config(tenant_id: Uuid, priority: TicketPriority) -> SlaConfig {
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
        timezone: "UTC".to_string(),
        is_active: true,
        created_at: now,
        updated_at: now,
    }
}

pub fn ticket(tenant_id: Uuid, priority: TicketPriority, created_at: DateTime<Utc>) -> Ticket {
    Ticket {
        id: Uuid::new_v4(),
        tenant_id,
        subject: "printer on fire".to_string(),
        priority,
        category_id: None,
        created_at,
        first_response_at: None,
        resolved_at: None,
        closed_at: None,
    }
}

pub fn bank(tenant_id: Uuid, total_hours: f64, consumed_hours: f64) -> HourBank {
    HourBank {
        id: Uuid::new_v4(),
        tenant_id,
        customer_id: Uuid::new_v4(),
        total_hours,
        consumed_hours,
        hourly_rate: Some(120.0),
        expires_at: None,
        is_active: true,
        created_at: Utc::now(),
    }
}
