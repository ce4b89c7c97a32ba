//! Store tests against a real database. Run with `DATABASE_URL` set and `--ignored`.

use chrono::Utc;
use dotenv::dotenv;
use pretty_assertions::assert_eq;
use sqlx::PgPool;
use tasklist::models::{Account, NewTask, Task, TaskChanges};
use tasklist::store::{AccountStore, PgStore, StoreError, TaskStore};
use uuid::Uuid;

async fn store() -> PgStore {
    dotenv().ok();
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for tests");
    let pool = PgPool::connect(&database_url)
        .await
        .expect("Failed to connect to test DB");
    let store = PgStore::new(pool);
    store.ensure_schema().await.expect("Failed to create schema");
    store
}

fn unique_email(prefix: &str) -> String {
    format!("{}-{}@example.com", prefix, Uuid::new_v4().simple())
}

#[ignore]
#[actix_rt::test]
async fn test_account_uniqueness_and_cascade() {
    let store = store().await;
    let email = unique_email("owner");

    let account = store
        .insert_account(&Account::new(email.clone(), "hash".to_string()))
        .await
        .unwrap();
    assert!(matches!(
        store
            .insert_account(&Account::new(email.clone(), "hash".to_string()))
            .await,
        Err(StoreError::UniqueViolation(_))
    ));

    let task = store
        .insert_task(&Task::new(NewTask::titled("Persisted"), account.id))
        .await
        .unwrap();
    assert_eq!(
        store.find_task(account.id, task.id).await.unwrap().map(|t| t.title),
        Some("Persisted".to_string())
    );

    assert!(store.delete_account(account.id).await.unwrap());
    assert!(store.find_account_by_email(&email).await.unwrap().is_none());
    assert!(store.list_tasks(account.id).await.unwrap().is_empty());
}

#[ignore]
#[actix_rt::test]
async fn test_task_queries_are_owner_scoped() {
    let store = store().await;
    let alice = store
        .insert_account(&Account::new(unique_email("alice"), "hash".to_string()))
        .await
        .unwrap();
    let bob = store
        .insert_account(&Account::new(unique_email("bob"), "hash".to_string()))
        .await
        .unwrap();

    let task = store
        .insert_task(&Task::new(NewTask::titled("Alice only"), alice.id))
        .await
        .unwrap();

    assert!(store.find_task(bob.id, task.id).await.unwrap().is_none());
    assert!(store
        .update_task(bob.id, task.id, &TaskChanges::completion(true), Utc::now())
        .await
        .unwrap()
        .is_none());
    assert!(!store.delete_task(bob.id, task.id).await.unwrap());

    let updated = store
        .update_task(alice.id, task.id, &TaskChanges::completion(true), Utc::now())
        .await
        .unwrap()
        .unwrap();
    assert!(updated.completed);
    assert_eq!(updated.title, "Alice only");

    let described = store
        .update_task(
            alice.id,
            task.id,
            &TaskChanges {
                description: Some(Some("details".to_string())),
                ..TaskChanges::default()
            },
            Utc::now(),
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(described.description.as_deref(), Some("details"));
    assert!(described.completed);

    let cleared = store
        .update_task(
            alice.id,
            task.id,
            &TaskChanges {
                description: Some(None),
                ..TaskChanges::default()
            },
            Utc::now(),
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(cleared.description, None);

    assert!(matches!(
        store
            .insert_task(&Task::new(NewTask::titled("Orphan"), Uuid::new_v4()))
            .await,
        Err(StoreError::MissingOwner)
    ));

    store.delete_account(alice.id).await.unwrap();
    store.delete_account(bob.id).await.unwrap();
}
