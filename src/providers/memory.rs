use serde_json::Value;
use std::sync::Arc;

use super::ModelFinder;
use crate::pipeline::ExecutionError;

/// In-memory record store
///
/// Holds a fixed list of JSON records, looked up by an id field
/// (`"id"` by default). Cloning is cheap; clones share the records.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    records: Arc<Vec<Value>>,
    id_field: String,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl MemoryStore {
    pub fn new(records: Vec<Value>) -> Self {
        Self {
            records: Arc::new(records),
            id_field: "id".to_string(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Helper: Compare a stored id with a requested one
    ///
    /// Request ids usually arrive as strings, so a number matches its
    /// decimal string form.
    fn ids_match(stored: &Value, requested: &Value) -> bool {
        match (stored, requested) {
            (Value::Number(n), Value::String(s)) | (Value::String(s), Value::Number(n)) => {
                n.to_string() == s.trim()
            }
            (a, b) => a == b,
        }
    }
}

impl ModelFinder for MemoryStore {
    fn find_by_id(&self, id: &Value) -> Result<Option<Value>, ExecutionError> {
        Ok(self
            .records
            .iter()
            .find(|record| {
                record
                    .get(&self.id_field)
                    .is_some_and(|stored| Self::ids_match(stored, id))
            })
            .cloned())
    }

    fn all(&self) -> Result<Vec<Value>, ExecutionError> {
        Ok(self.records.as_ref().clone())
    }
}
