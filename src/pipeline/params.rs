use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Raw request parameters
///
/// Values are untrusted: query strings and path segments arrive as
/// strings, JSON bodies may carry integers or anything else. Nothing is
/// coerced on the way in; steps decide how to read each key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Params(Map<String, Value>);

impl Params {
    /// Create an empty parameter set
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Return a copy with `key` set to `value`
    ///
    /// # Example
    /// ```
    /// use opsteps::pipeline::Params;
    /// use serde_json::json;
    ///
    /// let params = Params::new()
    ///     .with("page", json!("2"))
    ///     .with("per_page", json!(10));
    ///
    /// assert_eq!(params.get("page"), Some(&json!("2")));
    /// ```
    pub fn with(mut self, key: impl Into<String>, value: Value) -> Self {
        self.0.insert(key.into(), value);
        self
    }

    /// Get a parameter by key
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Copy every entry of `other` over this set
    pub fn merge(mut self, other: Params) -> Self {
        self.0.extend(other.0);
        self
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Query strings and path parameters arrive as plain strings
impl From<HashMap<String, String>> for Params {
    fn from(map: HashMap<String, String>) -> Self {
        Self(
            map.into_iter()
                .map(|(key, value)| (key, Value::String(value)))
                .collect(),
        )
    }
}
