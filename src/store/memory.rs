use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::{mapref::entry::Entry, DashMap};
use uuid::Uuid;

use super::{AccountStore, StoreError, TaskStore};
use crate::models::{Account, Task, TaskChanges};

/// In-process store with the same constraints as the PostgreSQL schema:
/// unique emails, tasks must reference an existing account, and deleting an
/// account removes its tasks.
#[derive(Debug, Default)]
pub struct MemoryStore {
    accounts: DashMap<Uuid, Account>,
    emails: DashMap<String, Uuid>,
    tasks: DashMap<Uuid, Task>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of tasks across all owners.
    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }
}

#[async_trait]
impl AccountStore for MemoryStore {
    async fn insert_account(&self, account: &Account) -> Result<Account, StoreError> {
        match self.emails.entry(account.email.clone()) {
            Entry::Occupied(_) => Err(StoreError::UniqueViolation(
                "users_email_key".to_string(),
            )),
            Entry::Vacant(slot) => {
                self.accounts.insert(account.id, account.clone());
                slot.insert(account.id);
                Ok(account.clone())
            }
        }
    }

    async fn find_account_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
        let id = match self.emails.get(email) {
            Some(id) => *id,
            None => return Ok(None),
        };
        Ok(self.accounts.get(&id).map(|account| account.value().clone()))
    }

    async fn find_account_by_id(&self, id: Uuid) -> Result<Option<Account>, StoreError> {
        Ok(self.accounts.get(&id).map(|account| account.value().clone()))
    }

    async fn delete_account(&self, id: Uuid) -> Result<bool, StoreError> {
        match self.accounts.remove(&id) {
            Some((_, account)) => {
                self.emails.remove(&account.email);
                self.tasks.retain(|_, task| task.user_id != id);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl TaskStore for MemoryStore {
    async fn insert_task(&self, task: &Task) -> Result<Task, StoreError> {
        // held until the task is in, so `delete_account` cannot sweep tasks in between
        let Some(_owner) = self.accounts.get(&task.user_id) else {
            return Err(StoreError::MissingOwner);
        };
        match self.tasks.entry(task.id) {
            Entry::Occupied(_) => Err(StoreError::UniqueViolation("tasks_pkey".to_string())),
            Entry::Vacant(slot) => {
                slot.insert(task.clone());
                Ok(task.clone())
            }
        }
    }

    async fn list_tasks(&self, owner_id: Uuid) -> Result<Vec<Task>, StoreError> {
        let mut tasks: Vec<Task> = self
            .tasks
            .iter()
            .filter(|entry| entry.user_id == owner_id)
            .map(|entry| entry.value().clone())
            .collect();
        tasks.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(tasks)
    }

    async fn find_task(&self, owner_id: Uuid, task_id: Uuid) -> Result<Option<Task>, StoreError> {
        Ok(self
            .tasks
            .get(&task_id)
            .filter(|task| task.user_id == owner_id)
            .map(|task| task.value().clone()))
    }

    async fn update_task(
        &self,
        owner_id: Uuid,
        task_id: Uuid,
        changes: &TaskChanges,
        now: DateTime<Utc>,
    ) -> Result<Option<Task>, StoreError> {
        let Some(mut task) = self.tasks.get_mut(&task_id) else {
            return Ok(None);
        };
        if task.user_id != owner_id {
            return Ok(None);
        }
        changes.apply(task.value_mut(), now);
        Ok(Some(task.value().clone()))
    }

    async fn delete_task(&self, owner_id: Uuid, task_id: Uuid) -> Result<bool, StoreError> {
        Ok(self
            .tasks
            .remove_if(&task_id, |_, task| task.user_id == owner_id)
            .is_some())
    }
}
