//! Integration tests for the SQLite repositories.

mod support;

use chrono::{Duration, Utc};
use helmdesk_core::{
    HourBankRepository, SlaAlertRepository, SlaConfigRepository, TicketRepository,
    TimeEntryRepository,
};
use helmdesk_domain::{HelmdeskError, SlaAlert, SlaAlertType, TicketPriority};
use helmdesk_infra::database::{
    SqliteHourBankRepository, SqliteSlaAlertRepository, SqliteSlaConfigRepository,
    SqliteTicketRepository, SqliteTimeEntryRepository,
};
use support::{now_secs, sample_bank, sample_config, sample_entry, sample_ticket, TestDatabase};
use uuid::Uuid;

#[tokio::test(flavor = "multi_thread")]
async fn sla_config_round_trips_through_storage() {
    let db = TestDatabase::new();
    let repo = SqliteSlaConfigRepository::new(db.manager.clone());
    let tenant_id = Uuid::new_v4();

    let config = sample_config(tenant_id, TicketPriority::High);
    repo.insert(config.clone()).await.expect("config inserted");

    let fetched = repo
        .find_by_id(tenant_id, config.id)
        .await
        .expect("lookup succeeds")
        .expect("config present");

    assert_eq!(fetched.priority, TicketPriority::High);
    assert_eq!(fetched.business_days, vec![1, 2, 3, 4, 5]);
    assert_eq!(fetched.timezone, "America/Sao_Paulo");
    assert_eq!(fetched.business_hours_start, config.business_hours_start);
    assert!(fetched.is_active);
}

#[tokio::test(flavor = "multi_thread")]
async fn second_active_config_for_same_combo_is_rejected() {
    let db = TestDatabase::new();
    let repo = SqliteSlaConfigRepository::new(db.manager.clone());
    let tenant_id = Uuid::new_v4();

    repo.insert(sample_config(tenant_id, TicketPriority::High))
        .await
        .expect("first config inserted");

    let err = repo
        .insert(sample_config(tenant_id, TicketPriority::High))
        .await
        .expect_err("duplicate active combo rejected");
    assert!(matches!(err, HelmdeskError::Validation(_)));

    // A different priority is a different combo.
    repo.insert(sample_config(tenant_id, TicketPriority::Low))
        .await
        .expect("different combo accepted");
}

#[tokio::test(flavor = "multi_thread")]
async fn find_active_prefers_category_specific_config() {
    let db = TestDatabase::new();
    let repo = SqliteSlaConfigRepository::new(db.manager.clone());
    let tenant_id = Uuid::new_v4();
    let category_id = Uuid::new_v4();

    let fallback = sample_config(tenant_id, TicketPriority::High);
    repo.insert(fallback.clone()).await.expect("fallback inserted");

    let mut scoped = sample_config(tenant_id, TicketPriority::High);
    scoped.category_id = Some(category_id);
    scoped.first_response_minutes = 30;
    repo.insert(scoped.clone()).await.expect("scoped inserted");

    let found = repo
        .find_active(tenant_id, TicketPriority::High, Some(category_id))
        .await
        .expect("lookup succeeds")
        .expect("config present");
    assert_eq!(found.id, scoped.id);

    // Unknown category falls back to the priority-only config.
    let found = repo
        .find_active(tenant_id, TicketPriority::High, Some(Uuid::new_v4()))
        .await
        .expect("lookup succeeds")
        .expect("fallback present");
    assert_eq!(found.id, fallback.id);

    // No config at all is a typed empty result.
    let none = repo
        .find_active(tenant_id, TicketPriority::Critical, None)
        .await
        .expect("lookup succeeds");
    assert!(none.is_none());
}

#[tokio::test(flavor = "multi_thread")]
async fn deactivated_config_frees_the_combo() {
    let db = TestDatabase::new();
    let repo = SqliteSlaConfigRepository::new(db.manager.clone());
    let tenant_id = Uuid::new_v4();

    let config = sample_config(tenant_id, TicketPriority::Medium);
    repo.insert(config.clone()).await.expect("config inserted");

    assert!(repo.deactivate(tenant_id, config.id).await.expect("deactivate succeeds"));
    assert!(repo
        .find_active(tenant_id, TicketPriority::Medium, None)
        .await
        .expect("lookup succeeds")
        .is_none());

    // The combo is free again for a replacement config.
    repo.insert(sample_config(tenant_id, TicketPriority::Medium))
        .await
        .expect("replacement inserted");

    // Deactivated rows are still listed.
    let all = repo.list(tenant_id).await.expect("list succeeds");
    assert_eq!(all.len(), 2);
}

#[tokio::test(flavor = "multi_thread")]
async fn duplicate_alert_insert_is_an_idempotent_noop() {
    let db = TestDatabase::new();
    let repo = SqliteSlaAlertRepository::new(db.manager.clone());
    let tenant_id = Uuid::new_v4();
    let ticket_id = Uuid::new_v4();

    let alert = SlaAlert {
        id: Uuid::new_v4(),
        tenant_id,
        ticket_id,
        alert_type: SlaAlertType::FirstResponseBreached,
        severity: TicketPriority::High,
        message: "first response breached".to_string(),
        created_at: Utc::now(),
        resolved_at: None,
    };

    assert!(repo.insert_if_absent(alert.clone()).await.expect("first insert"));

    let duplicate = SlaAlert { id: Uuid::new_v4(), ..alert };
    assert!(
        !repo.insert_if_absent(duplicate).await.expect("duplicate insert is a success"),
        "duplicate insert must be ignored"
    );

    let unresolved = repo.list_unresolved(tenant_id, 50, 0).await.expect("alerts listed");
    assert_eq!(unresolved.len(), 1);
    assert!(repo
        .exists(ticket_id, SlaAlertType::FirstResponseBreached)
        .await
        .expect("exists query"));

    // Resolved alerts drop out of the unresolved listing but stay recorded
    // for dedup purposes.
    assert!(repo
        .resolve(tenant_id, unresolved[0].id, Utc::now())
        .await
        .expect("resolve succeeds"));
    assert!(repo.list_unresolved(tenant_id, 50, 0).await.expect("alerts listed").is_empty());
    assert!(repo
        .exists(ticket_id, SlaAlertType::FirstResponseBreached)
        .await
        .expect("exists query"));
}

#[tokio::test(flavor = "multi_thread")]
async fn debit_is_a_relative_update() {
    let db = TestDatabase::new();
    let repo = SqliteHourBankRepository::new(db.manager.clone());
    let tenant_id = Uuid::new_v4();

    let bank = sample_bank(tenant_id, 10.0);
    repo.insert(bank.clone()).await.expect("bank inserted");

    assert!(repo.debit(tenant_id, bank.id, 1.5).await.expect("first debit"));
    assert!(repo.debit(tenant_id, bank.id, 2.25).await.expect("second debit"));

    let fetched = repo
        .find_by_id(tenant_id, bank.id)
        .await
        .expect("lookup succeeds")
        .expect("bank present");
    assert!((fetched.consumed_hours - 3.75).abs() < 1e-9);
    assert!((fetched.total_hours - 10.0).abs() < 1e-9);

    // Debiting a missing bank reports no row touched.
    assert!(!repo.debit(tenant_id, Uuid::new_v4(), 1.0).await.expect("missing bank debit"));

    // Deactivation flips the flag without touching the ledger.
    assert!(repo.deactivate(tenant_id, bank.id).await.expect("deactivate succeeds"));
    let fetched = repo
        .find_by_id(tenant_id, bank.id)
        .await
        .expect("lookup succeeds")
        .expect("bank present");
    assert!(!fetched.is_active);
    assert!((fetched.consumed_hours - 3.75).abs() < 1e-9);
}

#[tokio::test(flavor = "multi_thread")]
async fn concurrent_debits_both_land() {
    let db = TestDatabase::new();
    let repo = std::sync::Arc::new(SqliteHourBankRepository::new(db.manager.clone()));
    let tenant_id = Uuid::new_v4();

    let bank = sample_bank(tenant_id, 100.0);
    repo.insert(bank.clone()).await.expect("bank inserted");

    let mut handles = Vec::new();
    for _ in 0..8 {
        let repo = repo.clone();
        handles.push(tokio::spawn(async move { repo.debit(tenant_id, bank.id, 0.5).await }));
    }
    for handle in handles {
        assert!(handle.await.expect("task joined").expect("debit succeeded"));
    }

    let fetched = repo
        .find_by_id(tenant_id, bank.id)
        .await
        .expect("lookup succeeds")
        .expect("bank present");
    assert!((fetched.consumed_hours - 4.0).abs() < 1e-9, "all eight half-hour debits landed");
}

#[tokio::test(flavor = "multi_thread")]
async fn time_entry_completes_exactly_once() {
    let db = TestDatabase::new();
    let repo = SqliteTimeEntryRepository::new(db.manager.clone());
    let tenant_id = Uuid::new_v4();

    let start = now_secs() - Duration::hours(2);
    let entry = sample_entry(tenant_id, start);
    repo.insert(entry.clone()).await.expect("entry inserted");

    let end = start + Duration::minutes(90);
    assert!(repo.complete(tenant_id, entry.id, end, 1.5).await.expect("first completion"));
    assert!(
        !repo.complete(tenant_id, entry.id, end + Duration::hours(1), 2.5).await.expect("second completion is a no-op"),
        "closed entries are immutable"
    );

    let fetched = repo
        .find_by_id(tenant_id, entry.id)
        .await
        .expect("lookup succeeds")
        .expect("entry present");
    assert_eq!(fetched.end_time, Some(end));
    assert_eq!(fetched.duration_hours, Some(1.5));
}

#[tokio::test(flavor = "multi_thread")]
async fn tickets_filter_by_half_open_creation_range() {
    let db = TestDatabase::new();
    let repo = SqliteTicketRepository::new(db.manager.clone());
    let tenant_id = Uuid::new_v4();

    let base = Utc::now();
    let inside = sample_ticket(tenant_id, base);
    let after = sample_ticket(tenant_id, base + Duration::days(2));
    repo.insert(inside.clone()).await.expect("inside inserted");
    repo.insert(after).await.expect("after inserted");

    let found = repo
        .find_created_between(tenant_id, base - Duration::hours(1), base + Duration::days(1))
        .await
        .expect("range query");
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, inside.id);

    let err = repo
        .find_created_between(tenant_id, base, base)
        .await
        .expect_err("empty range rejected");
    assert!(matches!(err, HelmdeskError::Validation(_)));
}

#[tokio::test(flavor = "multi_thread")]
async fn first_response_is_recorded_once() {
    let db = TestDatabase::new();
    let repo = SqliteTicketRepository::new(db.manager.clone());
    let tenant_id = Uuid::new_v4();

    let ticket = sample_ticket(tenant_id, Utc::now() - Duration::hours(1));
    repo.insert(ticket.clone()).await.expect("ticket inserted");

    let first = Utc::now();
    assert!(repo.set_first_response(tenant_id, ticket.id, first).await.expect("first write"));
    assert!(
        !repo
            .set_first_response(tenant_id, ticket.id, first + Duration::hours(1))
            .await
            .expect("second write is a no-op"),
        "first response timestamp is write-once"
    );

    assert!(repo.set_resolved(tenant_id, ticket.id, first).await.expect("resolution recorded"));
    assert!(
        !repo.set_resolved(tenant_id, ticket.id, first).await.expect("second write is a no-op"),
        "resolution timestamp is write-once"
    );
}
