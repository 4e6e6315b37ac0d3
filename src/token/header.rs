use serde::Serialize;
use serde_json::{Map, Value};

use crate::algorithm::AlgorithmId;

/// JOSE header of a signed token
///
/// Kept as the full JSON object so extension parameters stay available to
/// callers through [`Header::get`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Header(Map<String, Value>);

impl Header {
    /// Header with `typ: JWT` and the given algorithm
    pub fn new(algorithm: AlgorithmId) -> Self {
        let mut map = Map::new();
        map.insert("typ".into(), Value::from("JWT"));
        map.insert("alg".into(), Value::from(algorithm.as_str()));
        Self(map)
    }

    pub(crate) fn from_map(map: Map<String, Value>) -> Self {
        Self(map)
    }

    /// Algorithm name as declared, unvalidated
    pub fn alg(&self) -> Option<&str> {
        self.0.get("alg").and_then(Value::as_str)
    }

    /// Token type (typically "JWT")
    pub fn typ(&self) -> Option<&str> {
        self.0.get("typ").and_then(Value::as_str)
    }

    /// Key ID
    pub fn kid(&self) -> Option<&str> {
        self.0.get("kid").and_then(Value::as_str)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub(crate) fn insert(&mut self, name: impl Into<String>, value: Value) {
        self.0.insert(name.into(), value);
    }
}
