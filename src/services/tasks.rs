use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::error::AppError;
use crate::models::{NewTask, Task, TaskChanges};
use crate::store::TaskStore;

/// Owner-scoped task CRUD. Callers pass an owner id that has already passed the
/// ownership guard; the store filters by it again in every query.
#[derive(Clone)]
pub struct TaskService {
    store: Arc<dyn TaskStore>,
}

impl TaskService {
    pub fn new(store: Arc<dyn TaskStore>) -> Self {
        Self { store }
    }

    pub async fn create(&self, owner_id: Uuid, input: NewTask) -> Result<Task, AppError> {
        input.validate()?;
        let task = self.store.insert_task(&Task::new(input, owner_id)).await?;
        log::debug!("Created task {} for account {}", task.id, owner_id);
        Ok(task)
    }

    pub async fn list(&self, owner_id: Uuid) -> Result<Vec<Task>, AppError> {
        Ok(self.store.list_tasks(owner_id).await?)
    }

    /// `None` both when the task does not exist and when it belongs to someone else.
    pub async fn get(&self, owner_id: Uuid, task_id: Uuid) -> Result<Option<Task>, AppError> {
        Ok(self.store.find_task(owner_id, task_id).await?)
    }

    /// Applies the provided fields and touches `updated_at`.
    pub async fn update(
        &self,
        owner_id: Uuid,
        task_id: Uuid,
        changes: TaskChanges,
    ) -> Result<Option<Task>, AppError> {
        changes.validate()?;
        Ok(self
            .store
            .update_task(owner_id, task_id, &changes, Utc::now())
            .await?)
    }

    /// Sets the completion flag. Repeating the call with the same value is harmless.
    pub async fn set_completion(
        &self,
        owner_id: Uuid,
        task_id: Uuid,
        completed: bool,
    ) -> Result<Option<Task>, AppError> {
        self.update(owner_id, task_id, TaskChanges::completion(completed))
            .await
    }

    pub async fn delete(&self, owner_id: Uuid, task_id: Uuid) -> Result<bool, AppError> {
        let removed = self.store.delete_task(owner_id, task_id).await?;
        if removed {
            log::debug!("Deleted task {} for account {}", task_id, owner_id);
        }
        Ok(removed)
    }
}
