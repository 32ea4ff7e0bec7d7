//! General notes (title + body) and per-date notes.

use serde::{Deserialize, Serialize};

use crate::error::{PlannerError, PlannerResult};

/// Local storage key prefix for per-date notes.
pub const DAY_NOTE_PREFIX: &str = "notes_";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneralNote {
    pub title: String,
    #[serde(default)]
    pub body: String,
}

impl GeneralNote {
    /// Both fields are required on creation.
    pub fn new(title: &str, body: &str) -> PlannerResult<Self> {
        if title.is_empty() {
            return Err(PlannerError::validation("Note title is required"));
        }
        if body.is_empty() {
            return Err(PlannerError::validation("Note content is required"));
        }
        Ok(GeneralNote {
            title: title.to_string(),
            body: body.to_string(),
        })
    }
}
