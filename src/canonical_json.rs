//! Canonical JSON, the byte representation that gets hashed and signed.
//!
//! Every object has its keys sorted, recursively, arrays keep their order
//! and scalars pass through untouched. The result is compact with no
//! insignificant whitespace.
use serde::Serialize;
use serde_json::{to_string, to_value, Map, Value};
use std::fmt;

#[derive(Debug)]
pub enum CanonicalJsonError {
    SerializeError(serde_json::Error),
}

impl fmt::Display for CanonicalJsonError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CanonicalJsonError::SerializeError(val) => {
                write!(f, "Could not produce canonical json {}", val)
            }
        }
    }
}

impl std::error::Error for CanonicalJsonError {}

impl From<serde_json::Error> for CanonicalJsonError {
    fn from(error: serde_json::Error) -> Self {
        CanonicalJsonError::SerializeError(error)
    }
}

/// Returns a copy of `value` with the keys of every object sorted.
pub fn canonicalize(value: &Value) -> Value {
    match value {
        Value::Array(items) => Value::Array(items.iter().map(canonicalize).collect()),
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            let mut sorted = Map::new();
            for key in keys {
                sorted.insert(key.clone(), canonicalize(&map[key]));
            }
            Value::Object(sorted)
        }
        other => other.clone(),
    }
}

/// Creates a canonical JSON representation of any serializable objects.
pub fn to_canonical_json(s: impl Serialize) -> Result<Vec<u8>, CanonicalJsonError> {
    let v = to_value(&s)?;
    let s = to_string(&canonicalize(&v))?;
    Ok(s.into_bytes())
}
