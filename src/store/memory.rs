use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;

use super::{CounterStore, StoreError};

/// In-memory namespace used by tests and the in-process session.
///
/// `set_unavailable(true)` makes every read and write fail with
/// [`StoreError::Unavailable`], which is how tests simulate storage I/O loss.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, i64>>,
    unavailable: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a raw value, bypassing validation (used to plant corrupt data).
    pub fn with_entry(key: &str, raw: i64) -> Self {
        let store = Self::new();
        store.entries.lock().insert(key.to_string(), raw);
        store
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Raw value without going through the service, for assertions.
    pub fn peek(&self, key: &str) -> Option<i64> {
        self.entries.lock().get(key).copied()
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable {
                reason: "memory store marked unavailable".to_string(),
            });
        }
        Ok(())
    }
}

impl CounterStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<i64>, StoreError> {
        self.check_available()?;
        Ok(self.entries.lock().get(key).copied())
    }

    fn write(&self, key: &str, value: i64) -> Result<(), StoreError> {
        self.check_available()?;
        self.entries.lock().insert(key.to_string(), value);
        Ok(())
    }
}
