//! Local variant: everything lives in a [`KeyValueStorage`].
//!
//! Layout:
//! - `tasks`: JSON object mapping `DD-MM-YYYY` to a list of `{text, completed}`
//! - `generalNotes`: JSON list of `{title, body}`
//! - `notes_DD-MM-YYYY`: plain-text body of that day's note
//!
//! The tasks mapping and the general notes are mirrored in memory. Every
//! mutation builds the next state, persists it, and only then replaces the
//! mirror, so a failed write leaves both the mirror and storage untouched.

use std::collections::BTreeMap;

use super::{DateNoteStore, Entry, GeneralNoteStore, TaskStore};
use crate::date_key::DateKey;
use crate::error::{PlannerError, PlannerResult};
use crate::note::{DAY_NOTE_PREFIX, GeneralNote};
use crate::storage::{KeyValueStorage, read_or_default};
use crate::task::Task;

pub const TASKS_KEY: &str = "tasks";
pub const GENERAL_NOTES_KEY: &str = "generalNotes";

type TaskBuckets = BTreeMap<String, Vec<Task>>;

pub struct LocalPlanner<S> {
    storage: S,
    tasks: TaskBuckets,
    notes: Vec<GeneralNote>,
}

impl<S: KeyValueStorage> LocalPlanner<S> {
    /// Load the mirrors from storage. Malformed content loads as empty.
    pub fn load(storage: S) -> Self {
        let mut tasks: TaskBuckets = read_or_default(&storage, TASKS_KEY);
        tasks.retain(|_, bucket| !bucket.is_empty());

        let notes: Vec<GeneralNote> = read_or_default(&storage, GENERAL_NOTES_KEY);

        tracing::debug!(buckets = tasks.len(), notes = notes.len(), "loaded local planner");

        LocalPlanner {
            storage,
            tasks,
            notes,
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Whether a bucket exists for `date`. Buckets never exist empty.
    pub fn has_bucket(&self, date: DateKey) -> bool {
        self.tasks.contains_key(&date.encode())
    }

    /// Dates that have at least one task, in chronological order.
    pub fn task_dates(&self) -> Vec<DateKey> {
        let mut dates: Vec<DateKey> = self
            .tasks
            .keys()
            .filter_map(|key| DateKey::decode(key).ok())
            .collect();
        dates.sort();
        dates
    }

    fn commit_tasks(&mut self, next: TaskBuckets) -> PlannerResult<()> {
        let json = serde_json::to_string(&next)?;
        self.storage.set(TASKS_KEY, &json)?;
        self.tasks = next;
        Ok(())
    }

    fn commit_notes(&mut self, next: Vec<GeneralNote>) -> PlannerResult<()> {
        let json = serde_json::to_string(&next)?;
        self.storage.set(GENERAL_NOTES_KEY, &json)?;
        self.notes = next;
        Ok(())
    }

    fn bucket_index(&self, date: DateKey, index: usize) -> PlannerResult<(String, usize)> {
        let key = date.encode();
        let bucket = self
            .tasks
            .get(&key)
            .ok_or_else(|| PlannerError::not_found(format!("no tasks on {}", key)))?;
        if index >= bucket.len() {
            return Err(PlannerError::not_found(format!("task {} on {}", index, key)));
        }
        Ok((key, index))
    }

    fn note_index(&self, index: usize) -> PlannerResult<usize> {
        if index >= self.notes.len() {
            return Err(PlannerError::not_found(format!("note {}", index)));
        }
        Ok(index)
    }
}

fn day_note_key(date: DateKey) -> String {
    format!("{}{}", DAY_NOTE_PREFIX, date.encode())
}

impl<S: KeyValueStorage> TaskStore for LocalPlanner<S> {
    type TaskRef = usize;

    async fn list_tasks(&self, date: DateKey) -> PlannerResult<Vec<Entry<usize, Task>>> {
        let tasks = self
            .tasks
            .get(&date.encode())
            .map(|bucket| {
                bucket
                    .iter()
                    .cloned()
                    .enumerate()
                    .map(|(i, task)| Entry::new(i, task))
                    .collect()
            })
            .unwrap_or_default();
        Ok(tasks)
    }

    async fn add_task(&mut self, date: DateKey, text: &str) -> PlannerResult<Entry<usize, Task>> {
        let task = Task::new(text)?;

        let mut next = self.tasks.clone();
        let bucket = next.entry(date.encode()).or_default();
        bucket.push(task.clone());
        let index = bucket.len() - 1;

        self.commit_tasks(next)?;
        Ok(Entry::new(index, task))
    }

    async fn toggle_task(&mut self, date: DateKey, task: &usize) -> PlannerResult<Task> {
        let (key, index) = self.bucket_index(date, *task)?;

        let mut next = self.tasks.clone();
        let updated = match next.get_mut(&key).and_then(|bucket| bucket.get_mut(index)) {
            Some(task) => {
                task.toggle();
                task.clone()
            }
            None => return Err(PlannerError::not_found(format!("task {} on {}", index, key))),
        };

        self.commit_tasks(next)?;
        Ok(updated)
    }

    async fn delete_task(&mut self, date: DateKey, task: &usize) -> PlannerResult<()> {
        let (key, index) = self.bucket_index(date, *task)?;

        let mut next = self.tasks.clone();
        if let Some(bucket) = next.get_mut(&key) {
            bucket.remove(index);
            if bucket.is_empty() {
                next.remove(&key);
            }
        }

        self.commit_tasks(next)
    }
}

impl<S: KeyValueStorage> DateNoteStore for LocalPlanner<S> {
    async fn day_note(&self, date: DateKey) -> PlannerResult<String> {
        let key = day_note_key(date);
        match self.storage.get(&key) {
            Ok(body) => Ok(body.unwrap_or_default()),
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "unreadable day note, treating as empty");
                Ok(String::new())
            }
        }
    }

    async fn set_day_note(&mut self, date: DateKey, body: &str) -> PlannerResult<()> {
        self.storage.set(&day_note_key(date), body)
    }
}

impl<S: KeyValueStorage> GeneralNoteStore for LocalPlanner<S> {
    type NoteRef = usize;

    async fn list_notes(&self) -> PlannerResult<Vec<Entry<usize, GeneralNote>>> {
        Ok(self
            .notes
            .iter()
            .cloned()
            .enumerate()
            .map(|(i, note)| Entry::new(i, note))
            .collect())
    }

    async fn create_note(&mut self, title: &str, body: &str) -> PlannerResult<Entry<usize, GeneralNote>> {
        let note = GeneralNote::new(title, body)?;

        let mut next = self.notes.clone();
        next.push(note.clone());
        let index = next.len() - 1;

        self.commit_notes(next)?;
        Ok(Entry::new(index, note))
    }

    async fn update_note(&mut self, note: &usize, body: &str) -> PlannerResult<GeneralNote> {
        let index = self.note_index(*note)?;

        let mut next = self.notes.clone();
        next[index].body = body.to_string();
        let updated = next[index].clone();

        self.commit_notes(next)?;
        Ok(updated)
    }

    async fn delete_note(&mut self, note: &usize) -> PlannerResult<()> {
        let index = self.note_index(*note)?;

        let mut next = self.notes.clone();
        next.remove(index);

        self.commit_notes(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use chrono::NaiveDate;
    use serde_json::Value;

    fn key(s: &str) -> DateKey {
        DateKey::decode(s).unwrap()
    }

    fn planner() -> LocalPlanner<MemoryStorage> {
        LocalPlanner::load(MemoryStorage::new())
    }

    fn stored_tasks(planner: &LocalPlanner<MemoryStorage>) -> Value {
        let raw = planner.storage().get(TASKS_KEY).unwrap().unwrap();
        serde_json::from_str(&raw).unwrap()
    }

    /// Storage whose writes always fail.
    #[derive(Default)]
    struct ReadOnlyStorage(MemoryStorage);

    impl KeyValueStorage for ReadOnlyStorage {
        fn get(&self, key: &str) -> PlannerResult<Option<String>> {
            self.0.get(key)
        }
        fn set(&mut self, _key: &str, _value: &str) -> PlannerResult<()> {
            Err(PlannerError::Storage("quota exceeded".into()))
        }
        fn remove(&mut self, _key: &str) -> PlannerResult<()> {
            Err(PlannerError::Storage("quota exceeded".into()))
        }
        fn keys(&self) -> PlannerResult<Vec<String>> {
            self.0.keys()
        }
    }

    #[tokio::test]
    async fn test_buy_milk_scenario() {
        let mut planner = planner();
        let date = key("05-03-2025");

        planner.add_task(date, "Buy milk").await.unwrap();
        let tasks = planner.list_tasks(date).await.unwrap();
        assert_eq!(tasks, vec![Entry::new(0, Task { text: "Buy milk".into(), completed: false })]);
        assert_eq!(
            stored_tasks(&planner),
            serde_json::json!({"05-03-2025": [{"text": "Buy milk", "completed": false}]})
        );

        planner.toggle_task(date, &0).await.unwrap();
        let tasks = planner.list_tasks(date).await.unwrap();
        assert!(tasks[0].item.completed);

        planner.delete_task(date, &0).await.unwrap();
        assert!(planner.list_tasks(date).await.unwrap().is_empty());
        assert!(!planner.has_bucket(date));
        assert_eq!(stored_tasks(&planner), serde_json::json!({}));
    }

    #[tokio::test]
    async fn test_add_appends_in_insertion_order() {
        let mut planner = planner();
        let date = key("01-01-2025");
        planner.add_task(date, "first").await.unwrap();
        let added = planner.add_task(date, "  second ").await.unwrap();

        assert_eq!(added.id, 1);
        let texts: Vec<_> = planner
            .list_tasks(date)
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.item.text)
            .collect();
        assert_eq!(texts, vec!["first", "second"]);
    }

    #[tokio::test]
    async fn test_add_rejects_blank_text_without_creating_bucket() {
        let mut planner = planner();
        let date = key("01-01-2025");
        let err = planner.add_task(date, "   ").await.unwrap_err();
        assert!(matches!(err, PlannerError::Validation(_)));
        assert!(!planner.has_bucket(date));
        assert_eq!(planner.storage().get(TASKS_KEY).unwrap(), None);
    }

    #[tokio::test]
    async fn test_toggle_twice_restores_state() {
        let mut planner = planner();
        let date = key("02-02-2024");
        planner.add_task(date, "a").await.unwrap();

        assert!(planner.toggle_task(date, &0).await.unwrap().completed);
        assert!(!planner.toggle_task(date, &0).await.unwrap().completed);
    }

    #[tokio::test]
    async fn test_toggle_unknown_is_not_found() {
        let mut planner = planner();
        let date = key("02-02-2024");
        assert!(matches!(planner.toggle_task(date, &0).await, Err(PlannerError::NotFound(_))));

        planner.add_task(date, "a").await.unwrap();
        assert!(matches!(planner.toggle_task(date, &3).await, Err(PlannerError::NotFound(_))));
        assert!(matches!(planner.delete_task(date, &1).await, Err(PlannerError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_removes_exactly_one() {
        let mut planner = planner();
        let date = key("10-10-2025");
        for text in ["a", "b", "c"] {
            planner.add_task(date, text).await.unwrap();
        }
        planner.delete_task(date, &1).await.unwrap();

        let texts: Vec<_> = planner
            .list_tasks(date)
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.item.text)
            .collect();
        assert_eq!(texts, vec!["a", "c"]);
        assert!(planner.has_bucket(date));
    }

    #[tokio::test]
    async fn test_failed_write_leaves_state_untouched() {
        let mut planner = LocalPlanner::load(ReadOnlyStorage::default());
        let date = key("10-10-2025");

        let err = planner.add_task(date, "a").await.unwrap_err();
        assert!(matches!(err, PlannerError::Storage(_)));
        assert!(planner.list_tasks(date).await.unwrap().is_empty());
        assert!(planner.create_note("t", "b").await.is_err());
        assert!(planner.list_notes().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_malformed_storage_loads_empty() {
        let mut storage = MemoryStorage::new();
        storage.set(TASKS_KEY, "undefined").unwrap();
        storage.set(GENERAL_NOTES_KEY, "{{{").unwrap();

        let planner = LocalPlanner::load(storage);
        assert!(planner.list_tasks(key("05-03-2025")).await.unwrap().is_empty());
        assert!(planner.list_notes().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_loads_existing_layout_and_drops_empty_buckets() {
        let mut storage = MemoryStorage::new();
        storage
            .set(
                TASKS_KEY,
                r#"{"05-03-2025":[{"text":"Buy milk","completed":true}],"06-03-2025":[]}"#,
            )
            .unwrap();

        let planner = LocalPlanner::load(storage);
        assert!(planner.has_bucket(key("05-03-2025")));
        assert!(!planner.has_bucket(key("06-03-2025")));
        assert!(planner.list_tasks(key("05-03-2025")).await.unwrap()[0].item.completed);
    }

    #[tokio::test]
    async fn test_task_dates_are_chronological() {
        let mut planner = planner();
        for k in ["01-02-2025", "31-12-2024", "15-01-2025"] {
            planner.add_task(key(k), "x").await.unwrap();
        }
        let dates: Vec<_> = planner.task_dates().into_iter().map(|d| d.date()).collect();
        assert_eq!(
            dates,
            vec![
                NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
                NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
                NaiveDate::from_ymd_opt(2025, 2, 1).unwrap(),
            ]
        );
    }

    #[tokio::test]
    async fn test_day_note_round_trip() {
        let mut planner = planner();
        let date = key("05-03-2025");

        assert_eq!(planner.day_note(date).await.unwrap(), "");
        planner.set_day_note(date, "dentist at 3").await.unwrap();
        assert_eq!(planner.day_note(date).await.unwrap(), "dentist at 3");
        assert_eq!(
            planner.storage().get("notes_05-03-2025").unwrap().as_deref(),
            Some("dentist at 3")
        );

        planner.set_day_note(date, "").await.unwrap();
        assert_eq!(planner.day_note(date).await.unwrap(), "");
    }

    #[tokio::test]
    async fn test_general_notes_crud() {
        let mut planner = planner();

        assert!(matches!(planner.create_note("", "body").await, Err(PlannerError::Validation(_))));
        planner.create_note("Groceries", "eggs").await.unwrap();
        planner.create_note("Ideas", "rust").await.unwrap();

        let updated = planner.update_note(&0, "eggs, flour").await.unwrap();
        assert_eq!(updated.body, "eggs, flour");
        assert!(matches!(planner.update_note(&7, "x").await, Err(PlannerError::NotFound(_))));

        planner.delete_note(&0).await.unwrap();
        let notes = planner.list_notes().await.unwrap();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0], Entry::new(0, GeneralNote { title: "Ideas".into(), body: "rust".into() }));

        let raw = planner.storage().get(GENERAL_NOTES_KEY).unwrap().unwrap();
        assert_eq!(raw, r#"[{"title":"Ideas","body":"rust"}]"#);
    }
}
