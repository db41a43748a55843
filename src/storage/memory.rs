use std::cell::{Cell, RefCell};

use crate::{
    models::store::Store,
    storage::{Storage, StorageError},
};

/// Keeps the store in memory and counts writes. Can be told to fail saves.
#[derive(Default)]
pub struct MemoryStorage {
    store: RefCell<Store>,
    saves: Cell<usize>,
    fail_saves: Cell<bool>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn save_count(&self) -> usize {
        self.saves.get()
    }

    pub fn fail_saves(&self, fail: bool) {
        self.fail_saves.set(fail);
    }

    pub fn snapshot(&self) -> Store {
        self.store.borrow().clone()
    }
}

impl Storage for MemoryStorage {
    fn load(&self) -> Result<Store, StorageError> {
        Ok(self.store.borrow().clone())
    }

    fn save(&self, store: &Store) -> Result<(), StorageError> {
        if self.fail_saves.get() {
            return Err(StorageError::SaveFailed {
                path: "<memory>".into(),
                source: std::io::Error::other("simulated write failure"),
            });
        }
        self.saves.set(self.saves.get() + 1);
        *self.store.borrow_mut() = store.clone();
        Ok(())
    }
}
