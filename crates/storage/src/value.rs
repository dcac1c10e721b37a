//! Stored values and load results.

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

/// A unit of data held by either backend.
///
/// No type tag is written to disk; on load the structure is re-inferred
/// (see [`StoredValue::infer`]), so opaque scalars come back as text.
#[derive(Debug, Clone, PartialEq)]
pub enum StoredValue {
    /// A JSON object or array.
    Structured(Value),
    /// Anything else, kept as its textual representation.
    Opaque(String),
}

impl StoredValue {
    /// Convert any serializable value, classifying it by its JSON shape.
    pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> Result<Self, serde_json::Error> {
        Ok(serde_json::to_value(value)?.into())
    }

    /// Text written to a file: compact JSON for containers, plain text otherwise.
    pub fn encode(&self) -> Result<String, serde_json::Error> {
        match self {
            StoredValue::Structured(v) => serde_json::to_string(v),
            StoredValue::Opaque(s) => Ok(s.clone()),
        }
    }

    /// Recover a value from file content.
    ///
    /// Decoded JSON is classified like any other value: containers are
    /// structured, scalars become their text (a JSON string loses its quotes).
    /// Undecodable content falls back to the whitespace-trimmed raw text.
    pub fn infer(raw: &str) -> Self {
        match serde_json::from_str::<Value>(raw) {
            Ok(v) => v.into(),
            Err(_) => StoredValue::Opaque(raw.trim().to_string()),
        }
    }

    pub fn is_structured(&self) -> bool { matches!(self, StoredValue::Structured(_)) }

    pub fn as_structured(&self) -> Option<&Value> {
        match self {
            StoredValue::Structured(v) => Some(v),
            StoredValue::Opaque(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            StoredValue::Opaque(s) => Some(s),
            StoredValue::Structured(_) => None,
        }
    }
}

impl From<Value> for StoredValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(_) | Value::Array(_) => StoredValue::Structured(value),
            Value::String(s) => StoredValue::Opaque(s),
            other => StoredValue::Opaque(other.to_string()),
        }
    }
}

impl From<String> for StoredValue {
    fn from(value: String) -> Self { StoredValue::Opaque(value) }
}

impl From<&str> for StoredValue {
    fn from(value: &str) -> Self { StoredValue::Opaque(value.to_string()) }
}

macro_rules! opaque_from_display {
    ($($t:ty),*) => {
        $(impl From<$t> for StoredValue {
            fn from(value: $t) -> Self { StoredValue::Opaque(value.to_string()) }
        })*
    };
}

opaque_from_display!(i32, i64, u32, u64, usize, f64, bool);

/// Result of a load: either a value or an explicit absence. Never an error.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    Found(StoredValue),
    Absent,
}

impl LoadOutcome {
    pub fn is_absent(&self) -> bool { matches!(self, LoadOutcome::Absent) }

    pub fn into_option(self) -> Option<StoredValue> {
        match self {
            LoadOutcome::Found(v) => Some(v),
            LoadOutcome::Absent => None,
        }
    }

    pub fn as_value(&self) -> Option<&StoredValue> {
        match self {
            LoadOutcome::Found(v) => Some(v),
            LoadOutcome::Absent => None,
        }
    }

    /// Deserialize the loaded value into `T`.
    ///
    /// Opaque text is tried first as JSON (so `"42"` decodes to a number) and
    /// then as a plain string.
    pub fn decode<T: DeserializeOwned>(&self) -> Option<T> {
        match self.as_value()? {
            StoredValue::Structured(v) => serde_json::from_value(v.clone()).ok(),
            StoredValue::Opaque(s) => serde_json::from_str(s)
                .ok()
                .or_else(|| serde_json::from_value(Value::String(s.clone())).ok()),
        }
    }
}

impl From<Option<StoredValue>> for LoadOutcome {
    fn from(value: Option<StoredValue>) -> Self {
        value.map_or(LoadOutcome::Absent, LoadOutcome::Found)
    }
}
