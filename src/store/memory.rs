use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use super::{KeyValueStore, StoreError};

#[derive(Debug, Default)]
struct Slots {
    values: HashMap<String, String>,
    writes: usize,
}

/// In-memory store. Clones share the same slots, so a test can keep a
/// handle while the session owns another.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slots: Rc<RefCell<Slots>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful `set` calls so far.
    pub fn writes(&self) -> usize {
        self.slots.borrow().writes
    }

    /// Current value of a slot.
    pub fn value(&self, key: &str) -> Option<String> {
        self.slots.borrow().values.get(key).cloned()
    }

    /// Seed a slot without counting it as a write.
    pub fn preload(&self, key: &str, value: &str) {
        self.slots
            .borrow_mut()
            .values
            .insert(key.to_string(), value.to_string());
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.value(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut slots = self.slots.borrow_mut();
        slots.values.insert(key.to_string(), value.to_string());
        slots.writes += 1;
        Ok(())
    }
}
