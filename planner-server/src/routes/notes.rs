//! General note endpoints

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    routing::{get, put},
};
use planner_core::error::PlannerError;
use planner_core::note::GeneralNote;
use planner_core::protocol::{Message, NOTE_DELETED, NewNote, NotePatch, NoteRecord};

use crate::db::NoteFields;
use crate::routes::{AppError, json_body};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/notes", get(list_notes).post(create_note))
        .route("/api/notes/{id}", put(update_note).delete(delete_note))
}

/// GET /api/notes - All general notes
async fn list_notes(State(state): State<AppState>) -> Result<Json<Vec<NoteRecord>>, AppError> {
    let db = state.db.read().await;
    let notes = db.notes.all().iter().cloned().map(NoteRecord::from).collect();
    Ok(Json(notes))
}

/// POST /api/notes - Create a note; title and body are both required
async fn create_note(
    State(state): State<AppState>,
    body: Result<Json<NewNote>, JsonRejection>,
) -> Result<Json<NoteRecord>, AppError> {
    let req = json_body(body)?;
    let note = GeneralNote::new(&req.title, &req.body)?;

    let mut db = state.db.write().await;
    let doc = db.notes.insert(NoteFields {
        title: note.title,
        body: note.body,
    })?;

    tracing::info!(id = %doc.id, "created note");
    Ok(Json(doc.into()))
}

/// PUT /api/notes/:id - Update title and/or body
async fn update_note(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<NotePatch>, JsonRejection>,
) -> Result<Json<NoteRecord>, AppError> {
    let patch = json_body(body)?;
    if patch.title.as_deref() == Some("") {
        return Err(PlannerError::validation("Note title is required").into());
    }

    let mut db = state.db.write().await;
    let doc = db
        .notes
        .update_by_id(&id, |n| {
            if let Some(title) = patch.title {
                n.title = title;
            }
            if let Some(body) = patch.body {
                n.body = body;
            }
        })?
        .ok_or_else(|| PlannerError::not_found(format!("note {}", id)))?;

    Ok(Json(doc.into()))
}

/// DELETE /api/notes/:id - Delete a note
async fn delete_note(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Message>, AppError> {
    let mut db = state.db.write().await;

    if !db.notes.delete_by_id(&id)? {
        return Err(PlannerError::not_found(format!("note {}", id)).into());
    }

    tracing::info!(id = %id, "deleted note");
    Ok(Json(Message::new(NOTE_DELETED)))
}
