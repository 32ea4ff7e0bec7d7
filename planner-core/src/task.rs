//! Tasks scheduled on a calendar date.

use serde::{Deserialize, Serialize};

use crate::error::{PlannerError, PlannerResult};

/// A task as it is stored in a date bucket.
///
/// The owning date is not part of the record: in the local variant it is
/// the key of the bucket, in the remote variant it travels on the wire type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub text: String,
    #[serde(default)]
    pub completed: bool,
}

impl Task {
    /// A new, incomplete task. `text` is trimmed and must not be empty.
    pub fn new(text: &str) -> PlannerResult<Self> {
        Ok(Task {
            text: validate_text(text)?,
            completed: false,
        })
    }

    pub fn toggle(&mut self) {
        self.completed = !self.completed;
    }
}

/// Trim task text, rejecting blank input.
pub fn validate_text(text: &str) -> PlannerResult<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(PlannerError::validation("Enter a task!"));
    }
    Ok(trimmed.to_string())
}
