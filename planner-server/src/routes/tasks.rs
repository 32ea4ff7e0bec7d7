//! Task endpoints

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    routing::{get, post},
};
use planner_core::error::PlannerError;
use planner_core::protocol::{Message, NewTask, TASK_DELETED, TaskPatch, TaskRecord};
use planner_core::task;

use crate::db::TaskFields;
use crate::routes::{AppError, json_body, parse_date};
use crate::state::AppState;

/// `GET` reads the segment as a date key, `PUT`/`DELETE` as a task id.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/tasks", post(create_task))
        .route(
            "/api/tasks/{key}",
            get(list_tasks).put(update_task).delete(delete_task),
        )
}

/// GET /api/tasks/:date - Tasks for one date, in insertion order
async fn list_tasks(
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> Result<Json<Vec<TaskRecord>>, AppError> {
    let date = parse_date(&date)?;
    let db = state.db.read().await;

    let tasks = db
        .tasks
        .find(|t| t.date == date)
        .into_iter()
        .map(TaskRecord::from)
        .collect();

    Ok(Json(tasks))
}

/// POST /api/tasks - Create a task
async fn create_task(
    State(state): State<AppState>,
    body: Result<Json<NewTask>, JsonRejection>,
) -> Result<Json<TaskRecord>, AppError> {
    let req = json_body(body)?;
    let text = task::validate_text(&req.text)?;

    let mut db = state.db.write().await;
    let doc = db.tasks.insert(TaskFields {
        date: req.date,
        text,
        completed: req.completed,
    })?;

    tracing::info!(id = %doc.id, date = %doc.fields.date, "created task");
    Ok(Json(doc.into()))
}

/// PUT /api/tasks/:id - Update some fields of a task (e.g. toggle `completed`)
async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<TaskPatch>, JsonRejection>,
) -> Result<Json<TaskRecord>, AppError> {
    let patch = json_body(body)?;
    let text = patch.text.as_deref().map(task::validate_text).transpose()?;

    let mut db = state.db.write().await;
    let doc = db
        .tasks
        .update_by_id(&id, |t| {
            if let Some(date) = patch.date {
                t.date = date;
            }
            if let Some(text) = text {
                t.text = text;
            }
            if let Some(completed) = patch.completed {
                t.completed = completed;
            }
        })?
        .ok_or_else(|| PlannerError::not_found(format!("task {}", id)))?;

    Ok(Json(doc.into()))
}

/// DELETE /api/tasks/:id - Delete a task
async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Message>, AppError> {
    let mut db = state.db.write().await;

    if !db.tasks.delete_by_id(&id)? {
        return Err(PlannerError::not_found(format!("task {}", id)).into());
    }

    tracing::info!(id = %id, "deleted task");
    Ok(Json(Message::new(TASK_DELETED)))
}
