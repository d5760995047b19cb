/// Integration tests for the destructive user reset

mod common;

use common::{user_with_password, FailOn, MemoryStore};
use kasir_admin::error::AdminError;
use kasir_admin::repair::repair_users;
use kasir_admin::seed::{default_accounts, SeedAccount};
use kasir_shared::auth::password::verify_password;
use kasir_shared::models::user::UserRole;

fn existing_users() -> MemoryStore {
    MemoryStore::with_users(vec![
        user_with_password(7, "admin@kasir.com", "lupa", UserRole::Admin),
        user_with_password(8, "kasir@kasir.com", "lupa", UserRole::Cashier),
        user_with_password(9, "gudang@kasir.com", "gudang123", UserRole::Cashier),
    ])
}

#[tokio::test]
async fn test_repair_leaves_exactly_the_seed_accounts() {
    let store = existing_users();

    let report = repair_users(&store, &default_accounts(), true)
        .await
        .unwrap();

    assert_eq!(report.deleted, 3);

    let users = store.users();
    assert_eq!(users.len(), 2);

    let admin = &users[0];
    assert_eq!(admin.email, "admin@kasir.com");
    assert_eq!(admin.name, "Administrator");
    assert_eq!(admin.role, UserRole::Admin);
    assert!(verify_password("admin123", &admin.password_hash).unwrap());
    assert!(!verify_password("wrongpassword", &admin.password_hash).unwrap());

    let cashier = &users[1];
    assert_eq!(cashier.email, "kasir@kasir.com");
    assert_eq!(cashier.name, "Kasir 1");
    assert_eq!(cashier.role, UserRole::Cashier);
    assert!(verify_password("kasir123", &cashier.password_hash).unwrap());
    assert!(!verify_password("admin123", &cashier.password_hash).unwrap());

    assert!(report.created.iter().all(|c| c.verified));
}

#[tokio::test]
async fn test_repair_report_lists_credentials() {
    let store = MemoryStore::default();

    let report = repair_users(&store, &default_accounts(), true)
        .await
        .unwrap();
    let text = report.to_string();

    assert!(text.starts_with("🗑️ Deleted 0 existing users"));
    assert!(text.contains("✅ Created admin user: { id: 1, email: admin@kasir.com }"));
    assert!(text.contains("✅ Created cashier user: { id: 2, email: kasir@kasir.com }"));
    assert!(text.contains("🧪 Password test admin@kasir.com: true"));
    assert!(text.contains("👨‍💼 Admin: admin@kasir.com / admin123"));
    assert!(text.contains("👩‍💻 Cashier: kasir@kasir.com / kasir123"));
}

#[tokio::test]
async fn test_repair_is_idempotent() {
    let store = existing_users();

    repair_users(&store, &default_accounts(), true).await.unwrap();
    let second = repair_users(&store, &default_accounts(), true).await.unwrap();

    assert_eq!(second.deleted, 2);
    assert_eq!(store.users().len(), 2);
}

#[tokio::test]
async fn test_unconfirmed_repair_touches_nothing() {
    let store = existing_users();
    let before = store.users();

    let err = repair_users(&store, &default_accounts(), false)
        .await
        .unwrap_err();

    assert!(matches!(err, AdminError::NotConfirmed));
    assert_eq!(store.users(), before);
}

#[tokio::test]
async fn test_invalid_seed_is_rejected_before_writing() {
    let store = existing_users();
    let before = store.users();
    let accounts = vec![SeedAccount::new(
        "Administrator",
        "admin-at-kasir",
        "admin123",
        UserRole::Admin,
    )];

    let err = repair_users(&store, &accounts, true).await.unwrap_err();

    assert!(matches!(err, AdminError::Validation(_)));
    assert_eq!(store.users(), before);
}

#[tokio::test]
async fn test_failed_replace_surfaces_store_error() {
    let store = MemoryStore::failing(FailOn::Replace);

    let err = repair_users(&store, &default_accounts(), true)
        .await
        .unwrap_err();

    assert_eq!(err.label(), "StoreError");
}

#[tokio::test]
async fn test_missing_created_row_fails_self_check() {
    let store = MemoryStore::failing(FailOn::ReplaceShort);
    let accounts = default_accounts();

    let err = repair_users(&store, &accounts, true).await.unwrap_err();

    match err {
        AdminError::SelfCheckFailed { email } => assert_eq!(email, accounts[1].email),
        other => panic!("Expected SelfCheckFailed, got {:?}", other),
    }
}
