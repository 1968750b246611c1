//! JSON object wrapper used for node parameters and trigger payloads.
//!
//! `Vars` is a thin layer over a `serde_json` map with typed accessors.
//! Parameter payloads are opaque to the build; they pass through to the
//! produced graph untouched unless a compatibility shim rewrites them.

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};

/// An ordered string-to-JSON mapping.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Vars(Map<String, Value>);

impl Vars {
    /// Creates an empty mapping.
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Sets a key to any serializable value. Values that fail to serialize
    /// are stored as null.
    pub fn set<T: Serialize>(
        &mut self,
        key: &str,
        value: T,
    ) {
        let value = serde_json::to_value(value).unwrap_or(Value::Null);
        self.0.insert(key.to_string(), value);
    }

    /// Builder-style `set`.
    pub fn with<T: Serialize>(
        mut self,
        key: &str,
        value: T,
    ) -> Self {
        self.set(key, value);
        self
    }

    /// Reads a key, deserializing it into the requested type.
    pub fn get<T: DeserializeOwned>(
        &self,
        key: &str,
    ) -> Option<T> {
        self.0.get(key).and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    /// Whether a key is present.
    pub fn contains_key(
        &self,
        key: &str,
    ) -> bool {
        self.0.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl From<Value> for Vars {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => Self(map),
            _ => Self::new(),
        }
    }
}

impl From<Vars> for Value {
    fn from(vars: Vars) -> Self {
        Value::Object(vars.0)
    }
}
