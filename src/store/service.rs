use std::sync::Arc;

use super::{CounterStore, CounterValue, StoreError};

/// Process-wide handle to the shared counter record.
///
/// Built once at process start and cloned into every consumer. Reads and
/// writes run the backend on the blocking pool so callers never stall their
/// dispatch loop.
#[derive(Clone)]
pub struct StoreService {
    backend: Arc<dyn CounterStore>,
    key: Arc<str>,
}

impl StoreService {
    pub fn new(backend: Arc<dyn CounterStore>, key: &str) -> Self {
        Self {
            backend,
            key: Arc::from(key),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Current authoritative value. Absent ⇒ 0.
    ///
    /// A stored value outside the counter range is clamped and logged as a
    /// data-integrity fault instead of failing the read.
    pub async fn get(&self) -> Result<CounterValue, StoreError> {
        let backend = Arc::clone(&self.backend);
        let key = Arc::clone(&self.key);
        let raw = run_blocking(move || backend.read(&key)).await?;

        let Some(raw) = raw else {
            return Ok(CounterValue::ZERO);
        };

        let (value, fault) = CounterValue::from_stored(raw);
        if let Some(fault) = fault {
            tracing::warn!(key = %self.key, raw, clamped = %value, "Data integrity fault: {}", fault);
        }
        Ok(value)
    }

    /// Replace the authoritative value. Last write wins.
    pub async fn set(&self, value: CounterValue) -> Result<(), StoreError> {
        let backend = Arc::clone(&self.backend);
        let key = Arc::clone(&self.key);
        run_blocking(move || backend.write(&key, value.to_stored())).await?;
        tracing::trace!(key = %self.key, %value, "Store updated");
        Ok(())
    }
}

async fn run_blocking<T, F>(op: F) -> Result<T, StoreError>
where
    F: FnOnce() -> Result<T, StoreError> + Send + 'static,
    T: Send + 'static,
{
    match tokio::task::spawn_blocking(op).await {
        Ok(result) => result,
        Err(e) => Err(StoreError::Interrupted {
            reason: e.to_string(),
        }),
    }
}
