/// Integration tests for the user credential check

mod common;

use common::{user_with_password, FailOn, MemoryStore};
use kasir_admin::error::{AdminError, StoreError};
use kasir_admin::probes::ProbeTable;
use kasir_admin::repair::repair_users;
use kasir_admin::seed::default_accounts;
use kasir_admin::verify::{verify_users, ProbeOutcome, EXIT_CREDENTIALS_FAILED};
use kasir_shared::models::user::UserRole;

#[tokio::test]
async fn test_verify_with_no_users() {
    let store = MemoryStore::default();
    let probes = ProbeTable::from_seed(&default_accounts());

    let report = verify_users(&store, &probes).await.unwrap();

    assert!(report.checks.is_empty());
    assert_eq!(report.total_count, 0);
    assert_eq!(report.exit_code(), 0);

    let text = report.to_string();
    assert!(text.starts_with("📊 Found 0 users:"));
    assert!(text.ends_with("✅ Database connected. Total users: 0"));
}

#[tokio::test]
async fn test_verify_after_repair_is_all_valid() {
    let store = MemoryStore::default();
    let accounts = default_accounts();
    repair_users(&store, &accounts, true).await.unwrap();

    let report = verify_users(&store, &ProbeTable::from_seed(&accounts))
        .await
        .unwrap();

    assert_eq!(report.checks.len(), 2);
    assert_eq!(report.valid_count(), 2);
    assert_eq!(report.exit_code(), 0);

    let text = report.to_string();
    assert!(text.contains("Password test (admin123): ✅ VALID"));
    assert!(text.contains("Password test (kasir123): ✅ VALID"));
    assert!(text.contains("Total users: 2"));
}

#[tokio::test]
async fn test_wrong_probe_fails_the_run() {
    let store = MemoryStore::with_users(vec![
        user_with_password(1, "admin@kasir.com", "admin123", UserRole::Admin),
        user_with_password(2, "kasir@kasir.com", "something-else", UserRole::Cashier),
        user_with_password(3, "gudang@kasir.com", "gudang123", UserRole::Cashier),
    ]);

    let report = verify_users(&store, &ProbeTable::from_seed(&default_accounts()))
        .await
        .unwrap();

    let outcomes: Vec<_> = report.checks.iter().map(|c| c.outcome.clone()).collect();
    assert_eq!(
        outcomes,
        vec![ProbeOutcome::Valid, ProbeOutcome::Invalid, ProbeOutcome::NoProbe]
    );
    assert_eq!(report.failed_count(), 1);
    assert_eq!(report.skipped_count(), 1);
    assert_eq!(report.exit_code(), EXIT_CREDENTIALS_FAILED);
}

#[tokio::test]
async fn test_store_failure_aborts() {
    let probes = ProbeTable::default();

    let err = verify_users(&MemoryStore::failing(FailOn::List), &probes)
        .await
        .unwrap_err();
    assert!(matches!(err, AdminError::Store(StoreError::Query(_))));

    let err = verify_users(&MemoryStore::failing(FailOn::Count), &probes)
        .await
        .unwrap_err();
    assert_eq!(err.label(), "StoreError");
}
