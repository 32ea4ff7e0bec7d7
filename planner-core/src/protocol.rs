//! REST wire types.
//!
//! Shared between `planner-server` and the remote store client so both
//! sides agree on the JSON shape of every request and response.

use serde::{Deserialize, Serialize};

use crate::date_key::DateKey;
use crate::note::GeneralNote;
use crate::task::Task;

/// A task document as returned by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRecord {
    #[serde(rename = "_id")]
    pub id: String,
    pub date: DateKey,
    pub text: String,
    pub completed: bool,
}

impl TaskRecord {
    pub fn task(&self) -> Task {
        Task {
            text: self.text.clone(),
            completed: self.completed,
        }
    }
}

/// Body of `POST /api/tasks`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTask {
    pub date: DateKey,
    pub text: String,
    #[serde(default)]
    pub completed: bool,
}

/// Body of `PUT /api/tasks/{id}`. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<DateKey>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

/// A general note document as returned by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteRecord {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub body: String,
}

impl NoteRecord {
    pub fn note(&self) -> GeneralNote {
        GeneralNote {
            title: self.title.clone(),
            body: self.body.clone(),
        }
    }
}

/// Body of `POST /api/notes`. Missing fields fail validation, not parsing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewNote {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body: String,
}

/// Body of `PUT /api/notes/{id}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

/// Body and response of the day-note routes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayNoteRecord {
    pub date: DateKey,
    pub body: String,
}

/// Body of `PUT /api/day-notes/{date}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayNoteBody {
    #[serde(default)]
    pub body: String,
}

/// `{ "message": ... }` used for delete acknowledgements and errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub message: String,
}

impl Message {
    pub fn new(message: impl Into<String>) -> Self {
        Message {
            message: message.into(),
        }
    }
}

pub const TASK_DELETED: &str = "Task deleted";
pub const NOTE_DELETED: &str = "Note deleted";
pub const UNAUTHORIZED: &str = "Unauthorized";
