use std::collections::BTreeMap;

use super::KeyValueStorage;
use crate::error::PlannerResult;

/// In-process storage, mainly for tests.
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    values: BTreeMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> PlannerResult<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> PlannerResult<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> PlannerResult<()> {
        self.values.remove(key);
        Ok(())
    }

    fn keys(&self) -> PlannerResult<Vec<String>> {
        Ok(self.values.keys().cloned().collect())
    }
}
