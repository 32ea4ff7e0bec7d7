//! Remote variant: the store traits over the planner REST API.
//!
//! Each store operation maps onto one HTTP call (toggle needs a read first to
//! learn the current state). Requests carry an optional bearer token and a
//! per-request timeout; failures are surfaced, never retried.

use std::time::Duration;

use reqwest::{RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;

use crate::date_key::DateKey;
use crate::error::{PlannerError, PlannerResult};
use crate::note::GeneralNote;
use crate::protocol::{
    DayNoteBody, DayNoteRecord, Message, NewNote, NewTask, NotePatch, NoteRecord, TaskPatch, TaskRecord,
};
use crate::store::{DateNoteStore, Entry, GeneralNoteStore, TaskStore};
use crate::task::{self, Task};

/// HTTP client for planner-server
#[derive(Clone)]
pub struct RemoteClient {
    http: reqwest::Client,
    base_url: Url,
    token: Option<String>,
}

impl RemoteClient {
    pub fn new(base_url: &str, token: Option<String>, timeout: Duration) -> PlannerResult<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| PlannerError::Config(format!("Invalid server URL '{}': {e}", base_url)))?;
        if base_url.cannot_be_a_base() {
            return Err(PlannerError::Config(format!("Invalid server URL '{}'", base_url)));
        }

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PlannerError::Network(e.to_string()))?;

        Ok(RemoteClient {
            http,
            base_url,
            token,
        })
    }

    /// Base URL with `segments` appended. Each segment is percent-encoded,
    /// so a `/` inside a record id never reaches another route.
    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> PlannerResult<T> {
        let resp = self
            .authorize(request)
            .send()
            .await
            .map_err(|e| PlannerError::Network(e.to_string()))?;

        tracing::debug!(url = %resp.url(), status = %resp.status(), "remote call");

        if !resp.status().is_success() {
            return Err(error_from_response(resp).await);
        }

        resp.json()
            .await
            .map_err(|e| PlannerError::Serialization(e.to_string()))
    }

    /// GET /health
    pub async fn health_check(&self) -> PlannerResult<()> {
        let _: serde_json::Value = self.send(self.http.get(self.url(&["health"]))).await?;
        Ok(())
    }

    /// GET /api/tasks/:date
    pub async fn fetch_tasks(&self, date: DateKey) -> PlannerResult<Vec<TaskRecord>> {
        self.send(self.http.get(self.url(&["api", "tasks", date.encode().as_str()])))
            .await
    }

    /// POST /api/tasks
    pub async fn create_task(&self, req: &NewTask) -> PlannerResult<TaskRecord> {
        self.send(self.http.post(self.url(&["api", "tasks"])).json(req))
            .await
    }

    /// PUT /api/tasks/:id
    pub async fn update_task(&self, id: &str, patch: &TaskPatch) -> PlannerResult<TaskRecord> {
        self.send(self.http.put(self.url(&["api", "tasks", record_id(id)?])).json(patch))
            .await
    }

    /// DELETE /api/tasks/:id
    pub async fn remove_task(&self, id: &str) -> PlannerResult<Message> {
        self.send(self.http.delete(self.url(&["api", "tasks", record_id(id)?])))
            .await
    }

    /// GET /api/notes
    pub async fn fetch_notes(&self) -> PlannerResult<Vec<NoteRecord>> {
        self.send(self.http.get(self.url(&["api", "notes"]))).await
    }

    /// POST /api/notes
    pub async fn post_note(&self, req: &NewNote) -> PlannerResult<NoteRecord> {
        self.send(self.http.post(self.url(&["api", "notes"])).json(req))
            .await
    }

    /// PUT /api/notes/:id
    pub async fn patch_note(&self, id: &str, patch: &NotePatch) -> PlannerResult<NoteRecord> {
        self.send(self.http.put(self.url(&["api", "notes", record_id(id)?])).json(patch))
            .await
    }

    /// DELETE /api/notes/:id
    pub async fn remove_note(&self, id: &str) -> PlannerResult<Message> {
        self.send(self.http.delete(self.url(&["api", "notes", record_id(id)?])))
            .await
    }

    /// GET /api/day-notes/:date
    pub async fn fetch_day_note(&self, date: DateKey) -> PlannerResult<DayNoteRecord> {
        self.send(self.http.get(self.url(&["api", "day-notes", date.encode().as_str()])))
            .await
    }

    /// PUT /api/day-notes/:date
    pub async fn put_day_note(&self, date: DateKey, body: &str) -> PlannerResult<DayNoteRecord> {
        let req = DayNoteBody {
            body: body.to_string(),
        };
        self.send(self.http.put(self.url(&["api", "day-notes", date.encode().as_str()])).json(&req))
            .await
    }
}

/// Server ids are never empty or dot segments.
fn record_id(id: &str) -> PlannerResult<&str> {
    match id {
        "" | "." | ".." => Err(PlannerError::not_found(format!("record '{}'", id))),
        _ => Ok(id),
    }
}

/// Map a non-success response onto the error taxonomy.
async fn error_from_response(resp: Response) -> PlannerError {
    let status = resp.status();
    let message = match resp.json::<Message>().await {
        Ok(body) => body.message,
        Err(_) => status.canonical_reason().unwrap_or("request failed").to_string(),
    };

    match status {
        StatusCode::UNAUTHORIZED => PlannerError::Authentication,
        StatusCode::NOT_FOUND => PlannerError::NotFound(message),
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => PlannerError::Validation(message),
        _ => PlannerError::Storage(format!("{} ({})", message, status)),
    }
}

impl TaskStore for RemoteClient {
    type TaskRef = String;

    async fn list_tasks(&self, date: DateKey) -> PlannerResult<Vec<Entry<String, Task>>> {
        let records = self.fetch_tasks(date).await?;
        Ok(records
            .into_iter()
            .map(|record| {
                let task = record.task();
                Entry::new(record.id, task)
            })
            .collect())
    }

    async fn add_task(&mut self, date: DateKey, text: &str) -> PlannerResult<Entry<String, Task>> {
        let text = task::validate_text(text)?;
        let record = self
            .create_task(&NewTask {
                date,
                text,
                completed: false,
            })
            .await?;
        let task = record.task();
        Ok(Entry::new(record.id, task))
    }

    async fn toggle_task(&mut self, date: DateKey, task: &String) -> PlannerResult<Task> {
        let current = self.find_task(date, task).await?;

        let patch = TaskPatch {
            completed: Some(!current.completed),
            ..TaskPatch::default()
        };
        let updated = self.update_task(task, &patch).await?;
        Ok(updated.task())
    }

    async fn delete_task(&mut self, date: DateKey, task: &String) -> PlannerResult<()> {
        self.find_task(date, task).await?;
        self.remove_task(task).await?;
        Ok(())
    }
}

impl RemoteClient {
    /// The task `id` as listed under `date`. Ids of other dates are not found.
    async fn find_task(&self, date: DateKey, id: &str) -> PlannerResult<TaskRecord> {
        self.fetch_tasks(date)
            .await?
            .into_iter()
            .find(|record| record.id == id)
            .ok_or_else(|| PlannerError::not_found(format!("task {} on {}", id, date)))
    }
}

impl DateNoteStore for RemoteClient {
    async fn day_note(&self, date: DateKey) -> PlannerResult<String> {
        Ok(self.fetch_day_note(date).await?.body)
    }

    async fn set_day_note(&mut self, date: DateKey, body: &str) -> PlannerResult<()> {
        self.put_day_note(date, body).await?;
        Ok(())
    }
}

impl GeneralNoteStore for RemoteClient {
    type NoteRef = String;

    async fn list_notes(&self) -> PlannerResult<Vec<Entry<String, GeneralNote>>> {
        let records = self.fetch_notes().await?;
        Ok(records
            .into_iter()
            .map(|record| {
                let note = record.note();
                Entry::new(record.id, note)
            })
            .collect())
    }

    async fn create_note(&mut self, title: &str, body: &str) -> PlannerResult<Entry<String, GeneralNote>> {
        let note = GeneralNote::new(title, body)?;
        let record = self
            .post_note(&NewNote {
                title: note.title,
                body: note.body,
            })
            .await?;
        let note = record.note();
        Ok(Entry::new(record.id, note))
    }

    async fn update_note(&mut self, note: &String, body: &str) -> PlannerResult<GeneralNote> {
        let patch = NotePatch {
            body: Some(body.to_string()),
            ..NotePatch::default()
        };
        Ok(self.patch_note(note, &patch).await?.note())
    }

    async fn delete_note(&mut self, note: &String) -> PlannerResult<()> {
        self.remove_note(note).await?;
        Ok(())
    }
}
