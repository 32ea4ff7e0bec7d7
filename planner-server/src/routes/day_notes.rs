//! Per-date note endpoints

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    routing::get,
};
use planner_core::protocol::{DayNoteBody, DayNoteRecord};

use crate::db::DayNoteFields;
use crate::routes::{AppError, json_body, parse_date};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/day-notes/{date}", get(get_day_note).put(set_day_note))
}

/// GET /api/day-notes/:date - The note for a date (empty body if unset)
async fn get_day_note(
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> Result<Json<DayNoteRecord>, AppError> {
    let date = parse_date(&date)?;
    let db = state.db.read().await;

    let record = db
        .day_notes
        .find_one(|n| n.date == date)
        .cloned()
        .map(DayNoteRecord::from)
        .unwrap_or(DayNoteRecord {
            date,
            body: String::new(),
        });

    Ok(Json(record))
}

/// PUT /api/day-notes/:date - Overwrite the note for a date
async fn set_day_note(
    State(state): State<AppState>,
    Path(date): Path<String>,
    body: Result<Json<DayNoteBody>, JsonRejection>,
) -> Result<Json<DayNoteRecord>, AppError> {
    let date = parse_date(&date)?;
    let req = json_body(body)?;

    let mut db = state.db.write().await;
    let doc = db.day_notes.upsert(
        |n| n.date == date,
        DayNoteFields {
            date,
            body: req.body,
        },
    )?;

    Ok(Json(doc.into()))
}
