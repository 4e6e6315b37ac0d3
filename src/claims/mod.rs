//! Claim set carried in the second token segment
//!
//! Registered claims per [RFC 7519 Section 4.1](https://datatracker.ietf.org/doc/html/rfc7519#section-4.1)
//! are exposed through typed accessors; everything else stays reachable as
//! raw JSON through [`ClaimSet::get`].

use serde::Serialize;
use serde_json::{Map, Value};

/// Issuer (`iss`)
pub const ISSUER: &str = "iss";
/// Subject (`sub`)
pub const SUBJECT: &str = "sub";
/// Audience (`aud`)
pub const AUDIENCE: &str = "aud";
/// Expiration time (`exp`)
pub const EXPIRATION_TIME: &str = "exp";
/// Not before (`nbf`)
pub const NOT_BEFORE: &str = "nbf";
/// Issued at (`iat`)
pub const ISSUED_AT: &str = "iat";
/// Token identifier (`jti`)
pub const ID: &str = "jti";

/// Every registered claim name
pub const REGISTERED: [&str; 7] = [
    ISSUER,
    SUBJECT,
    AUDIENCE,
    EXPIRATION_TIME,
    NOT_BEFORE,
    ISSUED_AT,
    ID,
];

const STRING_CLAIMS: [&str; 3] = [ISSUER, SUBJECT, ID];
const DATE_CLAIMS: [&str; 3] = [EXPIRATION_TIME, NOT_BEFORE, ISSUED_AT];

/// Registered and custom claims of a token
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ClaimSet(Map<String, Value>);

impl ClaimSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap a JSON object after checking registered claim shapes
    ///
    /// `iss`, `sub` and `jti` must be strings, `aud` a string or array of
    /// strings, and `exp`, `nbf`, `iat` numbers.
    pub fn from_map(map: Map<String, Value>) -> Result<Self, String> {
        for name in STRING_CLAIMS {
            if map.get(name).is_some_and(|v| !v.is_string()) {
                return Err(format!("claim '{name}' must be a string"));
            }
        }

        for name in DATE_CLAIMS {
            if map.get(name).is_some_and(|v| !v.is_number()) {
                return Err(format!("claim '{name}' must be a numeric date"));
            }
        }

        match map.get(AUDIENCE) {
            None | Some(Value::String(_)) => {}
            Some(Value::Array(items)) if items.iter().all(Value::is_string) => {}
            Some(_) => return Err("claim 'aud' must be a string or array of strings".into()),
        }

        Ok(Self(map))
    }

    pub fn issuer(&self) -> Option<&str> {
        self.string(ISSUER)
    }

    pub fn subject(&self) -> Option<&str> {
        self.string(SUBJECT)
    }

    /// Token identifier (`jti`)
    pub fn id(&self) -> Option<&str> {
        self.string(ID)
    }

    /// Audience values; a single-string `aud` yields one element
    pub fn audience(&self) -> Vec<&str> {
        match self.0.get(AUDIENCE) {
            Some(Value::String(aud)) => vec![aud.as_str()],
            Some(Value::Array(items)) => items.iter().filter_map(Value::as_str).collect(),
            _ => Vec::new(),
        }
    }

    /// Expiration in whole seconds, rounded down
    pub fn expires_at(&self) -> Option<i64> {
        self.date(EXPIRATION_TIME, f64::floor)
    }

    /// Start of validity in whole seconds, rounded up
    pub fn not_before(&self) -> Option<i64> {
        self.date(NOT_BEFORE, f64::ceil)
    }

    /// Issue time in whole seconds, rounded up
    pub fn issued_at(&self) -> Option<i64> {
        self.date(ISSUED_AT, f64::ceil)
    }

    /// Raw value of any claim
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub(crate) fn insert(&mut self, name: impl Into<String>, value: Value) {
        self.0.insert(name.into(), value);
    }

    fn string(&self, name: &str) -> Option<&str> {
        self.0.get(name).and_then(Value::as_str)
    }

    /// Numeric date in whole seconds
    ///
    /// Fractional values are rounded towards the stricter bound, so a
    /// window never widens by truncation.
    fn date(&self, name: &str, round: fn(f64) -> f64) -> Option<i64> {
        let value = self.0.get(name)?;
        value
            .as_i64()
            .or_else(|| value.as_f64().map(|secs| round(secs) as i64))
    }
}
