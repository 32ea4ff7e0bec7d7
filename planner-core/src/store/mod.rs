//! Store interfaces shared by the local and remote variants.
//!
//! Record identity differs between backends (a position in the local
//! variant, a server-assigned id in the remote one), so each trait carries
//! an associated reference type. Both variants implement every trait, which
//! lets the controller stay generic over the backend.

mod local;

pub use local::{GENERAL_NOTES_KEY, LocalPlanner, TASKS_KEY};

use std::fmt;
use std::str::FromStr;

use crate::date_key::DateKey;
use crate::error::PlannerResult;
use crate::note::GeneralNote;
use crate::task::Task;

/// A record together with the reference used to address it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry<R, T> {
    pub id: R,
    pub item: T,
}

impl<R, T> Entry<R, T> {
    pub fn new(id: R, item: T) -> Self {
        Entry { id, item }
    }
}

/// Bounds for a record reference: printable for the UI, parseable back.
pub trait RecordRef: Clone + PartialEq + fmt::Debug + fmt::Display + FromStr {}

impl<T> RecordRef for T where T: Clone + PartialEq + fmt::Debug + fmt::Display + FromStr {}

#[allow(async_fn_in_trait)]
pub trait TaskStore {
    type TaskRef: RecordRef;

    /// Tasks for `date` in insertion order. Unknown dates yield an empty list.
    async fn list_tasks(&self, date: DateKey) -> PlannerResult<Vec<Entry<Self::TaskRef, Task>>>;

    /// Append an incomplete task. Blank text is a validation error.
    async fn add_task(&mut self, date: DateKey, text: &str) -> PlannerResult<Entry<Self::TaskRef, Task>>;

    /// Flip `completed` and return the updated task.
    async fn toggle_task(&mut self, date: DateKey, task: &Self::TaskRef) -> PlannerResult<Task>;

    async fn delete_task(&mut self, date: DateKey, task: &Self::TaskRef) -> PlannerResult<()>;
}

#[allow(async_fn_in_trait)]
pub trait DateNoteStore {
    /// The note for `date`, or an empty string if none was written.
    async fn day_note(&self, date: DateKey) -> PlannerResult<String>;

    /// Overwrite the note for `date`.
    async fn set_day_note(&mut self, date: DateKey, body: &str) -> PlannerResult<()>;
}

#[allow(async_fn_in_trait)]
pub trait GeneralNoteStore {
    type NoteRef: RecordRef;

    async fn list_notes(&self) -> PlannerResult<Vec<Entry<Self::NoteRef, GeneralNote>>>;

    /// Both `title` and `body` are required.
    async fn create_note(&mut self, title: &str, body: &str) -> PlannerResult<Entry<Self::NoteRef, GeneralNote>>;

    /// Replace the body of an existing note.
    async fn update_note(&mut self, note: &Self::NoteRef, body: &str) -> PlannerResult<GeneralNote>;

    /// Remove a note. Asking the user for confirmation is the caller's job.
    async fn delete_note(&mut self, note: &Self::NoteRef) -> PlannerResult<()>;
}

/// Everything the controller needs from a backend.
pub trait PlannerBackend: TaskStore + DateNoteStore + GeneralNoteStore {}

impl<T> PlannerBackend for T where T: TaskStore + DateNoteStore + GeneralNoteStore {}
