//! String-keyed value storage for the local variant.
//!
//! Mirrors the browser `localStorage` contract: values are opaque strings,
//! reads and writes are synchronous, and a missing key reads as `None`.

mod file;
mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use serde::de::DeserializeOwned;

use crate::error::PlannerResult;

pub trait KeyValueStorage {
    fn get(&self, key: &str) -> PlannerResult<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> PlannerResult<()>;
    fn remove(&mut self, key: &str) -> PlannerResult<()>;
    fn keys(&self) -> PlannerResult<Vec<String>>;
}

/// Read and parse a structured value, falling back to `T::default()` when
/// the key is missing, holds `"undefined"`/`"null"`, fails to parse, or the
/// storage itself cannot be read.
pub fn read_or_default<T, S>(storage: &S, key: &str) -> T
where
    T: DeserializeOwned + Default,
    S: KeyValueStorage + ?Sized,
{
    let raw = match storage.get(key) {
        Ok(raw) => raw,
        Err(e) => {
            tracing::warn!(key, error = %e, "unreadable stored value, using default");
            return T::default();
        }
    };

    safe_parse(key, raw.as_deref())
}

fn safe_parse<T: DeserializeOwned + Default>(key: &str, raw: Option<&str>) -> T {
    let Some(raw) = raw else {
        return T::default();
    };

    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "undefined" || trimmed == "null" {
        return T::default();
    }

    match serde_json::from_str(trimmed) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(key, error = %e, "malformed stored value, using default");
            T::default()
        }
    }
}
