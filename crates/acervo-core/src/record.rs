//! Open item records.
//!
//! Items have no fixed schema. Beyond the server-assigned `id` and the
//! mandatory caller-supplied `rm`, callers may attach any JSON fields they
//! like and get them back verbatim, in the order they sent them.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Field map of an open record: string keys to arbitrary JSON values.
///
/// Backed by an order-preserving map (serde_json's `preserve_order`), so
/// iteration and serialization follow insertion order.
pub type Fields = Map<String, Value>;

/// A stored item: an open record carrying a server-assigned `id`, an owner
/// identifier `rm`, and any number of caller-supplied fields.
///
/// Serializes transparently as the underlying JSON object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Item(Fields);

impl Item {
    /// Builds an item from an assigned id and the caller's fields.
    ///
    /// The id becomes the first key; the caller's fields follow in their
    /// original order. A caller-supplied `id` field overwrites the assigned
    /// one, matching spread-merge semantics (`{id, ...fields}`).
    #[must_use]
    pub fn from_fields(id: impl Into<String>, fields: Fields) -> Self {
        let mut map = Fields::new();
        map.insert("id".to_string(), Value::String(id.into()));
        map.extend(fields);
        Self(map)
    }

    /// Returns the item's id, if present and a string.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.0.get("id").and_then(Value::as_str)
    }

    /// Returns the item's owner identifier, if present and a string.
    #[must_use]
    pub fn rm(&self) -> Option<&str> {
        self.0.get("rm").and_then(Value::as_str)
    }

    /// Returns an arbitrary field by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Returns the underlying field map.
    #[must_use]
    pub fn fields(&self) -> &Fields {
        &self.0
    }

    /// Strict owner match: the `rm` field must be a JSON string equal to the
    /// given value. A numeric `rm` never matches.
    #[must_use]
    pub fn matches_owner(&self, rm: &str) -> bool {
        self.rm() == Some(rm)
    }

    /// Strict owner-and-id match, both compared as strings.
    #[must_use]
    pub fn matches_owner_and_id(&self, rm: &str, id: &str) -> bool {
        self.matches_owner(rm) && self.id() == Some(id)
    }
}

impl From<Fields> for Item {
    fn from(fields: Fields) -> Self {
        Self(fields)
    }
}
