//! In-memory collection store.
//!
//! Process-wide mapping from collection name to an ordered list of open
//! records. Collections are created implicitly on first insert and live only
//! for the lifetime of the process; there is no persistence layer.

use crate::error::{AcervoError, AcervoResult};
use crate::record::{Fields, Item};
use chrono::Utc;
use parking_lot::RwLock;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// Shared, in-memory store of named item collections.
///
/// The handle is cheap to clone; all clones see the same data. Every
/// mutation takes the single write lock for its whole read-modify-write, so
/// inserts and deletes are serialized and the post-removal length comparison
/// in [`delete_by_owner_and_id`](Self::delete_by_owner_and_id) cannot race.
/// Reads share the lock.
///
/// Collection names are used verbatim. Any string is a valid name, including
/// ones that collide with fixed routes; dispatch order decides those, never
/// the store.
///
/// # Example
///
/// ```
/// use acervo_core::CollectionStore;
/// use serde_json::json;
///
/// let store = CollectionStore::new();
/// let item = store
///     .insert("livros", json!({"rm": "2023001", "titulo": "X"}).as_object().cloned().unwrap())
///     .unwrap();
/// assert_eq!(item.rm(), Some("2023001"));
/// assert_eq!(store.list_by_owner("livros", "2023001").len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct CollectionStore {
    collections: Arc<RwLock<HashMap<String, Vec<Item>>>>,
}

impl CollectionStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a record into the named collection, creating the collection
    /// if absent.
    ///
    /// Requires `fields.rm` to be a non-empty JSON string; fails with a
    /// validation error otherwise, without touching any collection. Assigns
    /// a fresh id (stringified epoch milliseconds) as the record's first
    /// field and returns the stored item.
    ///
    /// # Errors
    ///
    /// Returns [`AcervoError::Validation`] when `rm` is absent, empty, or
    /// not a string.
    pub fn insert(&self, collection: &str, fields: Fields) -> AcervoResult<Item> {
        let has_rm = fields
            .get("rm")
            .and_then(Value::as_str)
            .is_some_and(|rm| !rm.is_empty());
        if !has_rm {
            return Err(AcervoError::validation("O campo 'rm' é obrigatório"));
        }

        let mut collections = self.collections.write();
        // Id assignment happens inside the critical section so two inserts
        // cannot interleave between stamping and appending. Ids are still
        // epoch-millisecond strings and may collide within one millisecond;
        // that is inherited, accepted behavior.
        let item = Item::from_fields(next_item_id(), fields);
        collections
            .entry(collection.to_string())
            .or_default()
            .push(item.clone());
        Ok(item)
    }

    /// Returns the full ordered contents of a collection.
    ///
    /// An unknown collection yields an empty list, never an error.
    #[must_use]
    pub fn list_all(&self, collection: &str) -> Vec<Item> {
        self.collections
            .read()
            .get(collection)
            .cloned()
            .unwrap_or_default()
    }

    /// Returns the items of a collection whose `rm` equals the given owner,
    /// preserving relative order.
    #[must_use]
    pub fn list_by_owner(&self, collection: &str, rm: &str) -> Vec<Item> {
        self.collections
            .read()
            .get(collection)
            .map(|items| {
                items
                    .iter()
                    .filter(|item| item.matches_owner(rm))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Removes every item of the collection whose `rm` AND `id` both match.
    ///
    /// "Nothing matched" is detected after the fact, by comparing the
    /// collection length before and after the removal pass. If several items
    /// matched (possible when a caller overwrote the assigned id), all are
    /// removed and the operation still reports a single success.
    ///
    /// # Errors
    ///
    /// Returns [`AcervoError::NotFound`] when the collection does not exist
    /// or no item matched both fields.
    pub fn delete_by_owner_and_id(&self, collection: &str, rm: &str, id: &str) -> AcervoResult<()> {
        let mut collections = self.collections.write();
        let Some(items) = collections.get_mut(collection) else {
            return Err(AcervoError::not_found("Item não encontrado"));
        };

        let original_len = items.len();
        items.retain(|item| !item.matches_owner_and_id(rm, id));
        if items.len() == original_len {
            return Err(AcervoError::not_found("Item não encontrado"));
        }
        Ok(())
    }
}

/// Stringified epoch milliseconds, the item id format.
fn next_item_id() -> String {
    Utc::now().timestamp_millis().to_string()
}
