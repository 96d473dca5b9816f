//! In-memory description store.
//!
//! # Responsibility
//! - Own the `entity id -> description` mapping for one session.
//! - Provide the load/save hooks consumed by the host persistence slot.
//!
//! # Invariants
//! - No stored value is ever empty; setting empty text deletes the key.
//! - `merge_all` never deletes; empty incoming values are skipped.
//! - Overwrites are last-write-wins with no history.

use crate::model::entity::is_blank_text;
use std::collections::HashMap;

/// Mapping shape exchanged with the persistence slot and the codec.
pub type DescriptionMap = HashMap<String, String>;

/// Key-value store of player-authored descriptions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnnotationStore {
    descriptions: DescriptionMap,
}

impl AnnotationStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the description for `entity_id`, if any.
    pub fn get(&self, entity_id: &str) -> Option<&str> {
        self.descriptions.get(entity_id).map(String::as_str)
    }

    pub fn has(&self, entity_id: &str) -> bool {
        self.descriptions.contains_key(entity_id)
    }

    /// Inserts or overwrites a description.
    ///
    /// Empty or absent `text` is treated as `remove(entity_id)`.
    pub fn set(&mut self, entity_id: &str, text: Option<&str>) {
        match text {
            Some(value) if !value.is_empty() => {
                self.descriptions
                    .insert(entity_id.to_string(), value.to_string());
            }
            _ => {
                self.descriptions.remove(entity_id);
            }
        }
    }

    /// Removes a description and returns the previous text. No-op when absent.
    pub fn remove(&mut self, entity_id: &str) -> Option<String> {
        self.descriptions.remove(entity_id)
    }

    /// Returns an independent copy of every description.
    pub fn get_all(&self) -> DescriptionMap {
        self.descriptions.clone()
    }

    pub fn count(&self) -> usize {
        self.descriptions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptions.is_empty()
    }

    /// Merges `incoming` into the store, overwriting on conflict.
    ///
    /// Returns the number of entries actually written. Entries with empty text
    /// are skipped and never delete an existing description.
    pub fn merge_all<K, V>(&mut self, incoming: impl IntoIterator<Item = (K, V)>) -> usize
    where
        K: Into<String>,
        V: AsRef<str>,
    {
        let mut written = 0;
        for (entity_id, text) in incoming {
            let text = text.as_ref();
            if is_blank_text(Some(text)) {
                continue;
            }
            self.descriptions.insert(entity_id.into(), text.to_string());
            written += 1;
        }
        written
    }

    /// Load hook: adopts the map previously written by the host.
    ///
    /// `None` (first run, missing field) resets to an empty store. Values are
    /// adopted verbatim.
    pub fn restore(&mut self, persisted: Option<DescriptionMap>) {
        self.descriptions = persisted.unwrap_or_default();
    }

    /// Save hook: hands the host a copy of the current map to persist verbatim.
    pub fn snapshot(&self) -> DescriptionMap {
        self.get_all()
    }
}
