//! Hour-bank service - core business logic

use std::sync::Arc;

use chrono::{DateTime, Utc};
use helmdesk_domain::constants::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use helmdesk_domain::{
    DebitPolicy, HelmdeskError, HourBank, HourBankSummary, Result,
};
use tracing::{info, warn};
use uuid::Uuid;

use super::balance;
use super::ports::HourBankRepository;

/// Fields required to open a new hour bank
#[derive(Debug, Clone)]
pub struct HourBankDraft {
    pub customer_id: Uuid,
    pub total_hours: f64,
    pub hourly_rate: Option<f64>,
    pub expires_at: Option<DateTime<Utc>>,
}

/// Hour-bank service
pub struct HourBankService {
    banks: Arc<dyn HourBankRepository>,
    policy: DebitPolicy,
}

impl HourBankService {
    /// Create a new hour-bank service with the given debit policy
    pub fn new(banks: Arc<dyn HourBankRepository>, policy: DebitPolicy) -> Self {
        Self { banks, policy }
    }

    /// Open a new bank for a customer
    pub async fn create_bank(&self, tenant_id: Uuid, draft: HourBankDraft) -> Result<HourBank> {
        if !draft.total_hours.is_finite() || draft.total_hours < 0.0 {
            return Err(HelmdeskError::Validation(
                "total_hours must be a non-negative number".into(),
            ));
        }
        if let Some(rate) = draft.hourly_rate {
            if !rate.is_finite() || rate < 0.0 {
                return Err(HelmdeskError::Validation(
                    "hourly_rate must be a non-negative number".into(),
                ));
            }
        }

        let bank = HourBank {
            id: Uuid::now_v7(),
            tenant_id,
            customer_id: draft.customer_id,
            total_hours: draft.total_hours,
            consumed_hours: 0.0,
            hourly_rate: draft.hourly_rate,
            expires_at: draft.expires_at,
            is_active: true,
            created_at: Utc::now(),
        };

        self.banks.insert(bank.clone()).await?;
        info!(tenant_id = %tenant_id, bank_id = %bank.id, total_hours = bank.total_hours, "hour bank created");
        Ok(bank)
    }

    /// One page of the tenant's banks with derived balance fields
    pub async fn list_banks(
        &self,
        tenant_id: Uuid,
        customer_id: Option<Uuid>,
        limit: Option<i64>,
        offset: Option<i64>,
        now: DateTime<Utc>,
    ) -> Result<Vec<HourBankSummary>> {
        let limit = limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
        let offset = offset.unwrap_or(0).max(0);
        let banks = self.banks.list(tenant_id, customer_id, limit, offset).await?;
        Ok(banks.into_iter().map(|bank| balance::summarize(bank, now)).collect())
    }

    /// One bank with derived balance fields
    pub async fn get_bank(
        &self,
        tenant_id: Uuid,
        id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<HourBankSummary> {
        let bank = self
            .banks
            .find_by_id(tenant_id, id)
            .await?
            .ok_or_else(|| HelmdeskError::NotFound(format!("hour bank {id}")))?;
        Ok(balance::summarize(bank, now))
    }

    /// Debit a completed time-entry duration from a bank.
    ///
    /// The increment itself is a relative update under row-level
    /// atomicity; this method only decides whether the debit is allowed
    /// under the configured policy.
    pub async fn debit(
        &self,
        tenant_id: Uuid,
        bank_id: Uuid,
        hours: f64,
        now: DateTime<Utc>,
    ) -> Result<()> {
        if !hours.is_finite() || hours <= 0.0 {
            return Err(HelmdeskError::Validation(
                "debit hours must be a positive number".into(),
            ));
        }

        let bank = self
            .banks
            .find_by_id(tenant_id, bank_id)
            .await?
            .ok_or_else(|| HelmdeskError::NotFound(format!("hour bank {bank_id}")))?;

        let unusable = balance::is_expired(&bank, now) || !bank.is_active;
        if unusable {
            if self.policy.allow_inactive_bank_debit {
                warn!(tenant_id = %tenant_id, bank_id = %bank_id, "debiting an expired or inactive hour bank");
            } else {
                return Err(HelmdeskError::Validation(
                    "hour bank is expired or inactive".into(),
                ));
            }
        }

        let would_overdraw = bank.consumed_hours + hours > bank.total_hours;
        if would_overdraw {
            if self.policy.allow_overdraw {
                warn!(
                    tenant_id = %tenant_id,
                    bank_id = %bank_id,
                    remaining = balance::remaining_hours(&bank),
                    hours,
                    "debit overdraws hour bank"
                );
            } else {
                return Err(HelmdeskError::Validation(format!(
                    "debit of {hours} hours exceeds remaining balance"
                )));
            }
        }

        if !self.banks.debit(tenant_id, bank_id, hours).await? {
            return Err(HelmdeskError::NotFound(format!("hour bank {bank_id}")));
        }

        info!(tenant_id = %tenant_id, bank_id = %bank_id, hours, "hour bank debited");
        Ok(())
    }
}
