//! Intent dispatch between a UI and a backend.
//!
//! The UI emits [`Intent`]s; the controller applies them to the backend and
//! refreshes its [`View`] snapshot once the backend has confirmed the change.
//! The UI re-renders from the view and never touches the stores directly.
//!
//! `dispatch` takes `&mut self`, so intents run one at a time and a backend
//! answer always belongs to the current selection. Changing the selection
//! commits the date, month, tasks and day note together, after both reads
//! have succeeded.

use chrono::{Local, NaiveDate};

use crate::date_key::DateKey;
use crate::error::{PlannerError, PlannerResult};
use crate::grid::{MonthGrid, WeekStart, YearMonth};
use crate::note::GeneralNote;
use crate::store::{Entry, GeneralNoteStore, PlannerBackend, TaskStore};
use crate::task::Task;

pub type TaskEntry<B> = Entry<<B as TaskStore>::TaskRef, Task>;
pub type NoteEntry<B> = Entry<<B as GeneralNoteStore>::NoteRef, GeneralNote>;

/// User intent, independent of how it was triggered.
#[derive(Debug, Clone)]
pub enum Intent<T, N> {
    SelectDate(NaiveDate),
    PrevMonth,
    NextMonth,
    ShowMonth(YearMonth),
    AddTask(String),
    ToggleTask(T),
    DeleteTask(T),
    SetDayNote(String),
    AddNote { title: String, body: String },
    EditNote { note: N, body: String },
    DeleteNote(N),
}

pub type BackendIntent<B> = Intent<<B as TaskStore>::TaskRef, <B as GeneralNoteStore>::NoteRef>;

/// What the UI should currently show.
pub struct View<B: PlannerBackend> {
    pub month: YearMonth,
    pub selected: Option<DateKey>,
    pub tasks: Vec<TaskEntry<B>>,
    pub day_note: String,
    pub notes: Vec<NoteEntry<B>>,
}

pub struct Controller<B: PlannerBackend> {
    backend: B,
    week_start: WeekStart,
    view: View<B>,
}

impl<B: PlannerBackend> Controller<B> {
    pub fn new(backend: B, week_start: WeekStart) -> Self {
        let today = Local::now().date_naive();
        Controller {
            backend,
            week_start,
            view: View {
                month: YearMonth::of(today),
                selected: None,
                tasks: Vec::new(),
                day_note: String::new(),
                notes: Vec::new(),
            },
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn view(&self) -> &View<B> {
        &self.view
    }

    /// Month grid for the current view, with today and the selection marked.
    pub fn grid(&self) -> MonthGrid {
        self.grid_for(Local::now().date_naive())
    }

    pub fn grid_for(&self, today: NaiveDate) -> MonthGrid {
        MonthGrid::build(
            self.view.month,
            self.week_start,
            today,
            self.view.selected.map(|key| key.date()),
        )
    }

    /// Initial load of the general notes.
    pub async fn start(&mut self) -> PlannerResult<()> {
        self.refresh_notes().await
    }

    pub async fn dispatch(&mut self, intent: BackendIntent<B>) -> PlannerResult<()> {
        match intent {
            Intent::SelectDate(date) => {
                let key = DateKey::new(date);
                let (tasks, day_note) = self.load_day(key).await?;

                self.view.selected = Some(key);
                self.view.month = YearMonth::of(date);
                self.view.tasks = tasks;
                self.view.day_note = day_note;
                Ok(())
            }
            Intent::PrevMonth => {
                self.view.month = self
                    .view
                    .month
                    .pred()
                    .ok_or_else(|| PlannerError::validation("No earlier month to show"))?;
                Ok(())
            }
            Intent::NextMonth => {
                self.view.month = self
                    .view
                    .month
                    .succ()
                    .ok_or_else(|| PlannerError::validation("No later month to show"))?;
                Ok(())
            }
            Intent::ShowMonth(month) => {
                self.view.month = month;
                Ok(())
            }
            Intent::AddTask(text) => {
                let key = self.require_selection()?;
                self.backend.add_task(key, &text).await?;
                self.refresh_day(key).await
            }
            Intent::ToggleTask(task) => {
                let key = self.require_selection()?;
                self.backend.toggle_task(key, &task).await?;
                self.refresh_day(key).await
            }
            Intent::DeleteTask(task) => {
                let key = self.require_selection()?;
                self.backend.delete_task(key, &task).await?;
                self.refresh_day(key).await
            }
            Intent::SetDayNote(body) => {
                let key = self.require_selection()?;
                self.backend.set_day_note(key, &body).await?;
                self.view.day_note = body;
                Ok(())
            }
            Intent::AddNote { title, body } => {
                self.backend.create_note(&title, &body).await?;
                self.refresh_notes().await
            }
            Intent::EditNote { note, body } => {
                self.backend.update_note(&note, &body).await?;
                self.refresh_notes().await
            }
            Intent::DeleteNote(note) => {
                self.backend.delete_note(&note).await?;
                self.refresh_notes().await
            }
        }
    }

    fn require_selection(&self) -> PlannerResult<DateKey> {
        self.view
            .selected
            .ok_or_else(|| PlannerError::validation("Select a date first!"))
    }

    async fn load_day(&self, key: DateKey) -> PlannerResult<(Vec<TaskEntry<B>>, String)> {
        let tasks = self.backend.list_tasks(key).await?;
        let day_note = self.backend.day_note(key).await?;
        Ok((tasks, day_note))
    }

    /// Reload tasks and the day note for the selected `key`. On failure the
    /// view keeps its previous contents.
    async fn refresh_day(&mut self, key: DateKey) -> PlannerResult<()> {
        let (tasks, day_note) = self.load_day(key).await?;
        tracing::debug!(date = %key, tasks = tasks.len(), "refreshed day");

        self.view.tasks = tasks;
        self.view.day_note = day_note;
        Ok(())
    }

    async fn refresh_notes(&mut self) -> PlannerResult<()> {
        self.view.notes = self.backend.list_notes().await?;
        Ok(())
    }
}
