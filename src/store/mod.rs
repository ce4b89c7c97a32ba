//! Storage port consumed by the account and task services.
//!
//! Every task method takes the owner id and must filter by it inside the query itself,
//! so a handler that skipped the ownership check still could not reach another
//! account's rows.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::fmt;
use uuid::Uuid;

use crate::models::{Account, Task, TaskChanges};

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Failures reported by a store implementation.
#[derive(Debug)]
pub enum StoreError {
    /// A unique constraint rejected the write.
    UniqueViolation(String),
    /// A task was written for an account that does not exist.
    MissingOwner,
    /// Any other backend failure (connection, query, decoding).
    Backend(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            StoreError::UniqueViolation(msg) => write!(f, "Unique constraint violated: {}", msg),
            StoreError::MissingOwner => write!(f, "Owning account does not exist"),
            StoreError::Backend(msg) => write!(f, "Store backend error: {}", msg),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<sqlx::Error> for StoreError {
    fn from(error: sqlx::Error) -> StoreError {
        match &error {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                StoreError::UniqueViolation(db.message().to_string())
            }
            sqlx::Error::Database(db) if db.is_foreign_key_violation() => StoreError::MissingOwner,
            _ => StoreError::Backend(error.to_string()),
        }
    }
}

#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Inserts a new account. Fails with `UniqueViolation` if the email is taken.
    async fn insert_account(&self, account: &Account) -> Result<Account, StoreError>;

    /// Looks up an account by its normalized email.
    async fn find_account_by_email(&self, email: &str) -> Result<Option<Account>, StoreError>;

    async fn find_account_by_id(&self, id: Uuid) -> Result<Option<Account>, StoreError>;

    /// Removes an account together with all of its tasks. Returns whether it existed.
    async fn delete_account(&self, id: Uuid) -> Result<bool, StoreError>;
}

#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Inserts a task and returns the stored row. Fails with `MissingOwner` if
    /// `task.user_id` does not reference an existing account.
    async fn insert_task(&self, task: &Task) -> Result<Task, StoreError>;

    /// All tasks owned by `owner_id`, oldest first.
    async fn list_tasks(&self, owner_id: Uuid) -> Result<Vec<Task>, StoreError>;

    async fn find_task(&self, owner_id: Uuid, task_id: Uuid) -> Result<Option<Task>, StoreError>;

    /// Applies `changes` in place and returns the updated row, or `None` when no task
    /// with that id belongs to `owner_id`.
    async fn update_task(
        &self,
        owner_id: Uuid,
        task_id: Uuid,
        changes: &TaskChanges,
        now: DateTime<Utc>,
    ) -> Result<Option<Task>, StoreError>;

    async fn delete_task(&self, owner_id: Uuid, task_id: Uuid) -> Result<bool, StoreError>;
}
