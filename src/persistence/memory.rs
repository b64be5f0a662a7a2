//! In-memory store; clones share the same records

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use super::{PersistError, Store, validate_key};

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStore {
    /// Number of stored records
    pub fn len(&self) -> usize {
        self.records.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.borrow().is_empty()
    }
}

impl Store for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<String>, PersistError> {
        validate_key(key)?;
        Ok(self.records.borrow().get(key).cloned())
    }

    fn save(&mut self, key: &str, data: &str) -> Result<(), PersistError> {
        validate_key(key)?;
        self.records
            .borrow_mut()
            .insert(key.to_string(), data.to_string());
        Ok(())
    }
}
