//! In-process save slot for embedding hosts and tests.

use super::{SaveSlot, SlotResult};
use crate::store::DescriptionMap;
use std::collections::HashMap;

/// Save slot that keeps every field in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySaveSlot {
    fields: HashMap<String, DescriptionMap>,
}

impl MemorySaveSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains_field(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }
}

impl SaveSlot for MemorySaveSlot {
    fn read_field(&self, key: &str) -> SlotResult<Option<DescriptionMap>> {
        Ok(self.fields.get(key).cloned())
    }

    fn write_field(&mut self, key: &str, value: &DescriptionMap) -> SlotResult<()> {
        self.fields.insert(key.to_string(), value.clone());
        Ok(())
    }
}
