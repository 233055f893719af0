//! Integration tests for the user repository.
//!
//! Require a PostgreSQL instance at `DATABASE_URL`; run with `--ignored`.

mod common;

use thbfx_core::auth::Role;
use thbfx_core::transaction::TransactionDraft;
use thbfx_db::entities::sea_orm_active_enums::UserRole;
use thbfx_db::{TransactionRepository, UserError, UserRepository, UserUpdate};
use uuid::Uuid;

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_user_create_and_find() {
    let db = common::setup().await;
    let user = common::create_user(&db, Role::StandardUser).await;
    let repo = UserRepository::new(db);

    assert_eq!(user.role, UserRole::User);

    let by_id = repo.find_by_id(user.id).await.unwrap().expect("User should exist");
    assert_eq!(by_id.email, user.email);

    let by_email = repo.find_by_email(&user.email).await.unwrap().expect("User should exist");
    assert_eq!(by_email.id, user.id);
    assert!(repo.email_exists(&user.email).await.unwrap());
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_duplicate_email_is_rejected() {
    let db = common::setup().await;
    let user = common::create_user(&db, Role::StandardUser).await;
    let repo = UserRepository::new(db);

    let result = repo.create("Other", &user.email, "$argon2id$x", Role::Admin).await;
    assert!(matches!(result, Err(UserError::EmailTaken)));
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_update_role_and_name() {
    let db = common::setup().await;
    let user = common::create_user(&db, Role::StandardUser).await;
    let repo = UserRepository::new(db);

    let updated = repo
        .update(
            user.id,
            UserUpdate {
                name: Some("Renamed".into()),
                role: Some(Role::Admin),
                ..UserUpdate::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.name, "Renamed");
    assert_eq!(updated.role, UserRole::Admin);
    assert_eq!(updated.email, user.email);

    let missing = repo.update(Uuid::new_v4(), UserUpdate::default()).await;
    assert!(matches!(missing, Err(UserError::NotFound)));
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_delete_refuses_owner_of_transactions() {
    let db = common::setup().await;
    let owner = common::create_user(&db, Role::StandardUser).await;
    let idle = common::create_user(&db, Role::StandardUser).await;
    let users = UserRepository::new(db.clone());

    let record = TransactionDraft {
        declaration_number: "D-1".into(),
        declaration_date: "2025-01-15".into(),
        invoice_number: "I-1".into(),
        invoice_date: "2025-01-15".into(),
        currency_code: "USD".into(),
        foreign_amount: "1".into(),
        exchange_rate: "35".into(),
        rate_date: "2025-01-15".into(),
        ..TransactionDraft::default()
    }
    .normalize(|_| true)
    .unwrap();
    TransactionRepository::new(db)
        .create(&record, owner.id)
        .await
        .unwrap();

    assert!(matches!(
        users.delete(owner.id).await,
        Err(UserError::HasTransactions(1))
    ));
    users.delete(idle.id).await.unwrap();
    assert!(matches!(users.delete(idle.id).await, Err(UserError::NotFound)));

    let listed = users.list_with_transaction_counts().await.unwrap();
    let entry = listed.iter().find(|u| u.user.id == owner.id).unwrap();
    assert_eq!(entry.transaction_count, 1);
}
