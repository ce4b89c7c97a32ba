use crate::{
    auth::VerifiedOwner,
    error::AppError,
    models::{NewTask, Task, TaskChanges},
    services::TaskService,
};
use actix_web::{delete, get, patch, post, put, web, HttpResponse, Responder};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

/// The task part of an owner-scoped path. The owner id is read by the ownership guard.
#[derive(Debug, Deserialize)]
pub struct TaskPath {
    pub task_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct CompletionQuery {
    pub completed: bool,
}

fn found(task: Option<Task>) -> Result<Task, AppError> {
    task.ok_or_else(|| AppError::NotFound("Task not found".into()))
}

/// Lists the owner's tasks, oldest first.
///
/// ## Responses:
/// - `200 OK`: a JSON array of `Task` objects.
/// - `401 Unauthorized`: missing or invalid token.
/// - `403 Forbidden`: the path owner is not the caller.
#[get("")]
pub async fn list_tasks(
    owner: VerifiedOwner,
    tasks: web::Data<TaskService>,
) -> Result<impl Responder, AppError> {
    let tasks = tasks.list(owner.0).await?;
    Ok(HttpResponse::Ok().json(tasks))
}

/// Creates a task for the owner. `title` is required (1 to 200 characters); `description`
/// and `completed` are optional.
#[post("")]
pub async fn create_task(
    owner: VerifiedOwner,
    tasks: web::Data<TaskService>,
    task_data: web::Json<NewTask>,
) -> Result<impl Responder, AppError> {
    let task = tasks.create(owner.0, task_data.into_inner()).await?;
    Ok(HttpResponse::Ok().json(task))
}

#[get("/{task_id}")]
pub async fn get_task(
    owner: VerifiedOwner,
    tasks: web::Data<TaskService>,
    path: web::Path<TaskPath>,
) -> Result<impl Responder, AppError> {
    let task = found(tasks.get(owner.0, path.task_id).await?)?;
    Ok(HttpResponse::Ok().json(task))
}

/// Applies a partial update. Omitted fields keep their current value.
#[put("/{task_id}")]
pub async fn update_task(
    owner: VerifiedOwner,
    tasks: web::Data<TaskService>,
    path: web::Path<TaskPath>,
    changes: web::Json<TaskChanges>,
) -> Result<impl Responder, AppError> {
    let task = found(
        tasks
            .update(owner.0, path.task_id, changes.into_inner())
            .await?,
    )?;
    Ok(HttpResponse::Ok().json(task))
}

#[delete("/{task_id}")]
pub async fn delete_task(
    owner: VerifiedOwner,
    tasks: web::Data<TaskService>,
    path: web::Path<TaskPath>,
) -> Result<impl Responder, AppError> {
    if !tasks.delete(owner.0, path.task_id).await? {
        return Err(AppError::NotFound("Task not found".into()));
    }
    Ok(HttpResponse::Ok().json(json!({ "success": true })))
}

/// Sets the completion flag from `?completed=true|false`.
#[patch("/{task_id}/complete")]
pub async fn set_completion(
    owner: VerifiedOwner,
    tasks: web::Data<TaskService>,
    path: web::Path<TaskPath>,
    query: web::Query<CompletionQuery>,
) -> Result<impl Responder, AppError> {
    let task = found(
        tasks
            .set_completion(owner.0, path.task_id, query.completed)
            .await?,
    )?;
    Ok(HttpResponse::Ok().json(task))
}
