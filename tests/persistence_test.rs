//! Persistence tests against an in-memory SQLite database.

mod common;

use insurance_signup::domain::{Activation, NewEnrollment};
use insurance_signup::errors::AppError;
use insurance_signup::infra::{
    BlacklistRepository, BlacklistStore, CustomerRepository, CustomerStore, Persistence, UnitOfWork,
};
use insurance_signup::with_transaction;

use common::{count, database};

fn enrollment(email: &str, plan: &str) -> NewEnrollment {
    NewEnrollment {
        customer_name: "Jane Doe".into(),
        email_address: email.into(),
        password_hash: "$argon2id$placeholder".into(),
        insurance_plan_name: plan.into(),
        insured_amount: 300000,
    }
}

#[tokio::test]
async fn test_enrollment_writes_all_rows() {
    let db = database().await;
    let uow = Persistence::new(db.clone());

    let new = enrollment("jane@example.com", "Family");
    let created = with_transaction!(uow, |ctx| {
        ctx.customers().create_enrollment(new, true).await
    })
    .unwrap();

    assert_eq!(created.email_address, "jane@example.com");
    assert_eq!(created.insurance_plan, "Family");
    assert_eq!(count(&db, "customers").await, 1);
    assert_eq!(count(&db, "profiles").await, 1);
    assert_eq!(count(&db, "insurance_plans").await, 1);
    assert_eq!(count(&db, "insurances").await, 1);
}

#[tokio::test]
async fn test_failed_transaction_leaves_nothing() {
    let db = database().await;
    let uow = Persistence::new(db.clone());

    let new = enrollment("jane@example.com", "Family");
    let result: Result<(), AppError> = with_transaction!(uow, |ctx| {
        ctx.customers().create_enrollment(new, true).await?;
        Err(AppError::internal("mail relay exploded"))
    });

    assert!(result.is_err());
    assert_eq!(count(&db, "customers").await, 0);
    assert_eq!(count(&db, "profiles").await, 0);
    assert_eq!(count(&db, "insurances").await, 0);
    assert!(CustomerStore::new(db.clone())
        .find_by_email("jane@example.com")
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_unique_email_enforced_by_store() {
    let db = database().await;
    let uow = Persistence::new(db.clone());

    let first = enrollment("jane@example.com", "Family");
    with_transaction!(uow, |ctx| {
        ctx.customers().create_enrollment(first, true).await
    })
    .unwrap();

    let second = enrollment("jane@example.com", "Solo");
    let err = with_transaction!(uow, |ctx| {
        ctx.customers().create_enrollment(second, true).await
    })
    .unwrap_err();

    assert!(matches!(err, AppError::AlreadyRegistered(ref email) if email == "jane@example.com"));
    assert_eq!(count(&db, "customers").await, 1);
    assert_eq!(count(&db, "insurances").await, 1);
}

#[tokio::test]
async fn test_plan_reuse() {
    let db = database().await;
    let uow = Persistence::new(db.clone());

    for email in ["a@example.com", "b@example.com"] {
        let new = enrollment(email, "Family");
        with_transaction!(uow, |ctx| {
            ctx.customers().create_enrollment(new, true).await
        })
        .unwrap();
    }
    assert_eq!(count(&db, "insurance_plans").await, 1);

    let new = enrollment("c@example.com", "Family");
    with_transaction!(uow, |ctx| {
        ctx.customers().create_enrollment(new, false).await
    })
    .unwrap();
    assert_eq!(count(&db, "insurance_plans").await, 2);
    assert_eq!(count(&db, "insurances").await, 3);
}

#[tokio::test]
async fn test_activation_is_conditional() {
    let db = database().await;
    let uow = Persistence::new(db.clone());

    let new = enrollment("jane@example.com", "Family");
    with_transaction!(uow, |ctx| {
        ctx.customers().create_enrollment(new, true).await
    })
    .unwrap();

    let customers = CustomerStore::new(db.clone());
    let customer = customers
        .find_by_email("jane@example.com")
        .await
        .unwrap()
        .unwrap();

    assert_eq!(
        customers.activate_profile(customer.id).await.unwrap(),
        Activation::Activated
    );
    assert_eq!(
        customers.activate_profile(customer.id).await.unwrap(),
        Activation::AlreadyActive
    );
    assert!(customers.find_profile(customer.id).await.unwrap().unwrap().activated);
}

#[tokio::test]
async fn test_blacklist_add_is_idempotent() {
    let db = database().await;
    let blacklist = BlacklistStore::new(db.clone());

    assert!(blacklist.find_by_email("bad@example.com").await.unwrap().is_none());

    let first = blacklist
        .add("bad@example.com".into(), Some("chargeback".into()))
        .await
        .unwrap();
    let second = blacklist.add("bad@example.com".into(), None).await.unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(second.reason.as_deref(), Some("chargeback"));
    assert_eq!(count(&db, "blacklist").await, 1);

    let found = blacklist.find_by_email("bad@example.com").await.unwrap();
    assert_eq!(found.map(|entry| entry.id), Some(first.id));
}
