use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A tagged value tree for open-ended caller metadata (Design Note 9): a
/// scalar, a sequence, or a map — rather than heterogeneous records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Scalar(Scalar),
    Sequence(Vec<Value>),
    Map(BTreeMap<String, Value>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
}

impl Default for Value {
    fn default() -> Self {
        Value::Map(BTreeMap::new())
    }
}

impl Value {
    pub fn map() -> Self {
        Value::Map(BTreeMap::new())
    }

    pub fn from_str(s: impl Into<String>) -> Self {
        Value::Scalar(Scalar::String(s.into()))
    }

    pub fn from_f64(n: f64) -> Self {
        Value::Scalar(Scalar::Number(n))
    }

    pub fn from_bool(b: bool) -> Self {
        Value::Scalar(Scalar::Bool(b))
    }

    /// Insert a key into a `Map` variant, turning non-maps into an empty map first.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        if !matches!(self, Value::Map(_)) {
            *self = Value::map();
        }
        if let Value::Map(m) = self {
            m.insert(key.into(), value);
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Map(m) => m.get(key),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Scalar(Scalar::String(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Scalar(Scalar::Number(n)) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Scalar(Scalar::Bool(b)) => Some(*b),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[Value]> {
        match self {
            Value::Sequence(s) => Some(s.as_slice()),
            _ => None,
        }
    }

    /// Look up a string field by key, treating this value as a map.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_get_roundtrip() {
        let mut v = Value::map();
        v.insert("focus", Value::from_str("stars"));
        v.insert("priority", Value::from_f64(0.5));
        assert_eq!(v.get_str("focus"), Some("stars"));
        assert_eq!(v.get("priority").and_then(Value::as_f64), Some(0.5));
    }

    #[test]
    fn non_map_insert_converts_to_map() {
        let mut v = Value::from_str("scalar");
        v.insert("k", Value::from_bool(true));
        assert_eq!(v.get("k").and_then(Value::as_bool), Some(true));
    }
}
