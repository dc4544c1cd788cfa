//! List response normalizer
//!
//! The `/list` endpoint has no fixed response shape. Depending on the
//! backend it answers with `{items: Entry[]}`, `{keys: string[]}`, a bare
//! `Entry[]` or a bare `string[]`. [`ListResponse`] resolves the shape once
//! at the boundary so the rest of the client only sees
//! `Vec<RemoteListingEntry>`.

use serde_json::Value;

use super::image::RemoteListingEntry;

/// The recognised shapes of a `/list` response
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListResponse {
    /// `{ "items": [ {key, size?, lastModified?}, ... ] }`
    Items(Vec<RemoteListingEntry>),
    /// `{ "keys": [ "a", "b" ] }`
    Keys(Vec<String>),
    /// `[ {key, ...}, ... ]`
    Entries(Vec<RemoteListingEntry>),
    /// `[ "a", "b" ]`
    Strings(Vec<String>),
    /// Anything else; normalizes to an empty listing
    Unrecognized,
}

impl ListResponse {
    /// Classifies a JSON body, in strict precedence order:
    /// `items` object, `keys` object, array of strings, array of entries.
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Object(map) => {
                if let Some(Value::Array(items)) = map.get("items") {
                    return ListResponse::Items(parse_entries(items));
                }
                if let Some(Value::Array(keys)) = map.get("keys") {
                    return ListResponse::Keys(string_elements(keys));
                }
                ListResponse::Unrecognized
            }
            Value::Array(elements) => match elements.first() {
                Some(Value::String(_)) => ListResponse::Strings(string_elements(elements)),
                _ => ListResponse::Entries(parse_entries(elements)),
            },
            _ => ListResponse::Unrecognized,
        }
    }

    /// Returns the canonical entry sequence; never fails
    pub fn into_entries(self) -> Vec<RemoteListingEntry> {
        match self {
            ListResponse::Items(entries) | ListResponse::Entries(entries) => entries,
            ListResponse::Keys(keys) | ListResponse::Strings(keys) => {
                keys.into_iter().map(RemoteListingEntry::from_key).collect()
            }
            ListResponse::Unrecognized => Vec::new(),
        }
    }

    /// Short name of the detected shape, for logging
    pub fn shape(&self) -> &'static str {
        match self {
            ListResponse::Items(_) => "items",
            ListResponse::Keys(_) => "keys",
            ListResponse::Entries(_) => "entries",
            ListResponse::Strings(_) => "strings",
            ListResponse::Unrecognized => "unrecognized",
        }
    }
}

/// Normalizes a raw `/list` body in one step
pub fn normalize_listing(value: &Value) -> Vec<RemoteListingEntry> {
    ListResponse::from_json(value).into_entries()
}

// Elements that are not entry objects are dropped rather than failing the
// whole listing.
fn parse_entries(elements: &[Value]) -> Vec<RemoteListingEntry> {
    elements
        .iter()
        .filter(|v| v.is_object())
        .filter_map(|v| serde_json::from_value(v.clone()).ok())
        .collect()
}

fn string_elements(elements: &[Value]) -> Vec<String> {
    elements
        .iter()
        .filter_map(|v| v.as_str().map(str::to_string))
        .collect()
}
