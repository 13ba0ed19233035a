//! Common types used throughout the paginator
//!
//! This module contains the record abstraction, the opaque page cursor and
//! the page shape returned by a fetch.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::Hash;

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

// ============================================================================
// Cursor
// ============================================================================

/// Opaque "next page" token handed out by the remote source
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cursor(String);

impl Cursor {
    /// Wrap a raw token
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Raw token value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Cursor {
    fn from(token: &str) -> Self {
        Self::new(token)
    }
}

impl From<String> for Cursor {
    fn from(token: String) -> Self {
        Self(token)
    }
}

// ============================================================================
// Record
// ============================================================================

/// Unit of paginated data
///
/// Two records are the same entity iff their ids match, whatever the rest of
/// their attributes say.
pub trait Record: Clone + Send + Sync + 'static {
    /// Stable unique identifier
    type Id: Eq + Hash + Clone + fmt::Debug + Send + Sync + 'static;

    /// Identity of this record
    fn id(&self) -> &Self::Id;
}

/// A record lifted out of a JSON response
///
/// `id` is the stringified value of the configured id field; `value` keeps the
/// whole object for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRecord {
    /// Identity extracted from the object
    pub id: String,
    /// The full JSON object
    pub value: JsonValue,
}

impl JsonRecord {
    /// Create a record from an id and its object
    pub fn new(id: impl Into<String>, value: JsonValue) -> Self {
        Self {
            id: id.into(),
            value,
        }
    }

    /// Build a record from a JSON object using `id_field` as identity
    ///
    /// Returns `None` if the value is not an object or the id is missing or
    /// not a string/number.
    pub fn from_value(value: JsonValue, id_field: &str) -> Option<Self> {
        let id = match value.as_object()?.get(id_field)? {
            JsonValue::String(s) => s.clone(),
            JsonValue::Number(n) => n.to_string(),
            _ => return None,
        };
        Some(Self { id, value })
    }

    /// Short human readable label: the first string field among common names
    pub fn label(&self) -> String {
        ["name", "full_name", "fullName", "title"]
            .iter()
            .find_map(|key| self.value.get(*key).and_then(JsonValue::as_str))
            .map_or_else(|| self.id.clone(), String::from)
    }
}

impl Record for JsonRecord {
    type Id = String;

    fn id(&self) -> &String {
        &self.id
    }
}

// ============================================================================
// Page
// ============================================================================

/// One successful response from the remote source
#[derive(Debug, Clone, PartialEq)]
pub struct Page<R> {
    /// Records in server order
    pub records: Vec<R>,
    /// Cursor for the page after this one, `None` when the server offers none
    pub next: Option<Cursor>,
}

impl<R> Page<R> {
    /// Create a page
    pub fn new(records: Vec<R>, next: Option<Cursor>) -> Self {
        Self { records, next }
    }

    /// A final page with no next cursor
    pub fn last(records: Vec<R>) -> Self {
        Self {
            records,
            next: None,
        }
    }

    /// Whether the server returned no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
