//! JSON-file document store.
//!
//! Each collection is a list of documents with a server-assigned `_id`,
//! kept in memory and rewritten in full (temp file + rename) on every
//! mutation. A mutation is applied to a copy first, so a failed write leaves
//! the in-memory collection unchanged. Concurrent writers are serialized by
//! the lock around [`Database`]; the last write to a record wins.

use std::path::{Path, PathBuf};

use planner_core::date_key::DateKey;
use planner_core::error::{PlannerError, PlannerResult};
use planner_core::protocol::{DayNoteRecord, NoteRecord, TaskRecord};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document<T> {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(flatten)]
    pub fields: T,
}

pub struct Collection<T> {
    path: Option<PathBuf>,
    docs: Vec<Document<T>>,
}

impl<T> Collection<T>
where
    T: Serialize + DeserializeOwned + Clone,
{
    /// Collection that is never written to disk.
    pub fn in_memory() -> Self {
        Collection {
            path: None,
            docs: Vec::new(),
        }
    }

    /// Load a collection file. A missing file is an empty collection; an
    /// unparseable one is an error so that nothing overwrites it.
    pub fn open(path: PathBuf) -> PlannerResult<Self> {
        let docs = match std::fs::read_to_string(&path) {
            Ok(content) if content.trim().is_empty() => Vec::new(),
            Ok(content) => serde_json::from_str(&content).map_err(|e| {
                PlannerError::Storage(format!("Could not parse {}: {e}", path.display()))
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e.into()),
        };

        tracing::info!(path = %path.display(), documents = docs.len(), "loaded collection");

        Ok(Collection {
            path: Some(path),
            docs,
        })
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    pub fn all(&self) -> &[Document<T>] {
        &self.docs
    }

    /// Documents matching `filter`, in insertion order.
    pub fn find(&self, filter: impl Fn(&T) -> bool) -> Vec<Document<T>> {
        self.docs
            .iter()
            .filter(|doc| filter(&doc.fields))
            .cloned()
            .collect()
    }

    pub fn find_one(&self, filter: impl Fn(&T) -> bool) -> Option<&Document<T>> {
        self.docs.iter().find(|doc| filter(&doc.fields))
    }

    pub fn find_by_id(&self, id: &str) -> Option<&Document<T>> {
        self.docs.iter().find(|doc| doc.id == id)
    }

    pub fn insert(&mut self, fields: T) -> PlannerResult<Document<T>> {
        let doc = Document {
            id: uuid::Uuid::new_v4().simple().to_string(),
            fields,
        };

        let mut next = self.docs.clone();
        next.push(doc.clone());
        self.commit(next)?;

        Ok(doc)
    }

    /// Apply `update` to the document with `id`. Returns the updated
    /// document, or `None` if there is no such document.
    pub fn update_by_id(
        &mut self,
        id: &str,
        update: impl FnOnce(&mut T),
    ) -> PlannerResult<Option<Document<T>>> {
        let Some(index) = self.docs.iter().position(|doc| doc.id == id) else {
            return Ok(None);
        };

        let mut next = self.docs.clone();
        update(&mut next[index].fields);
        let updated = next[index].clone();
        self.commit(next)?;

        Ok(Some(updated))
    }

    /// Update the first document matching `filter`, or insert `fields` if
    /// none matches.
    pub fn upsert(
        &mut self,
        filter: impl Fn(&T) -> bool,
        fields: T,
    ) -> PlannerResult<Document<T>> {
        match self.docs.iter().position(|doc| filter(&doc.fields)) {
            Some(index) => {
                let mut next = self.docs.clone();
                next[index].fields = fields;
                let updated = next[index].clone();
                self.commit(next)?;
                Ok(updated)
            }
            None => self.insert(fields),
        }
    }

    /// Returns false if there was no document with `id`.
    pub fn delete_by_id(&mut self, id: &str) -> PlannerResult<bool> {
        let Some(index) = self.docs.iter().position(|doc| doc.id == id) else {
            return Ok(false);
        };

        let mut next = self.docs.clone();
        next.remove(index);
        self.commit(next)?;

        Ok(true)
    }

    fn commit(&mut self, next: Vec<Document<T>>) -> PlannerResult<()> {
        if let Some(path) = &self.path {
            write_atomic(path, &serde_json::to_string_pretty(&next)?)?;
        }
        self.docs = next;
        Ok(())
    }
}

fn write_atomic(path: &Path, content: &str) -> PlannerResult<()> {
    let temp = path.with_extension("json.tmp");

    std::fs::write(&temp, content)
        .and_then(|_| std::fs::rename(&temp, path))
        .map_err(|e| PlannerError::Storage(format!("Could not write {}: {e}", path.display())))?;

    tracing::debug!(path = %path.display(), "persisted collection");
    Ok(())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskFields {
    pub date: DateKey,
    pub text: String,
    pub completed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoteFields {
    pub title: String,
    pub body: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayNoteFields {
    pub date: DateKey,
    pub body: String,
}

impl From<Document<TaskFields>> for TaskRecord {
    fn from(doc: Document<TaskFields>) -> Self {
        TaskRecord {
            id: doc.id,
            date: doc.fields.date,
            text: doc.fields.text,
            completed: doc.fields.completed,
        }
    }
}

impl From<Document<NoteFields>> for NoteRecord {
    fn from(doc: Document<NoteFields>) -> Self {
        NoteRecord {
            id: doc.id,
            title: doc.fields.title,
            body: doc.fields.body,
        }
    }
}

impl From<Document<DayNoteFields>> for DayNoteRecord {
    fn from(doc: Document<DayNoteFields>) -> Self {
        DayNoteRecord {
            date: doc.fields.date,
            body: doc.fields.body,
        }
    }
}

/// All collections served by the API.
pub struct Database {
    pub tasks: Collection<TaskFields>,
    pub notes: Collection<NoteFields>,
    pub day_notes: Collection<DayNoteFields>,
}

impl Database {
    pub fn open(data_dir: &Path) -> PlannerResult<Self> {
        std::fs::create_dir_all(data_dir)?;

        Ok(Database {
            tasks: Collection::open(data_dir.join("tasks.json"))?,
            notes: Collection::open(data_dir.join("notes.json"))?,
            day_notes: Collection::open(data_dir.join("day_notes.json"))?,
        })
    }

    pub fn in_memory() -> Self {
        Database {
            tasks: Collection::in_memory(),
            notes: Collection::in_memory(),
            day_notes: Collection::in_memory(),
        }
    }
}
