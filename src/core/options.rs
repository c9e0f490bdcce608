// src/core/options.rs

//! Transport options passed through to `Transport::connect`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// An ordered bag of transport options.
///
/// The hooks never interpret individual keys; they only merge the base options
/// given at construction with the per-activation overrides.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConnectOptions(Map<String, Value>);

impl ConnectOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Inserts an option, returning the previous value for `key`.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Shallow merge: every top-level key in `overrides` replaces the base
    /// value wholesale. Nested objects are not merged.
    pub fn merged(&self, overrides: Option<&ConnectOptions>) -> ConnectOptions {
        let mut merged = self.0.clone();
        if let Some(overrides) = overrides {
            for (key, value) in &overrides.0 {
                merged.insert(key.clone(), value.clone());
            }
        }
        ConnectOptions(merged)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl From<Map<String, Value>> for ConnectOptions {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl From<ConnectOptions> for Value {
    fn from(options: ConnectOptions) -> Self {
        Value::Object(options.0)
    }
}
