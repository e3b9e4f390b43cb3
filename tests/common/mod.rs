//! Shared test utilities: in-memory store, bridge and widget host.

#![allow(dead_code, unused_imports)]

use std::collections::HashSet;
use std::sync::Arc;

use countersync::bridge::{BridgeClient, BridgeLayer};
use countersync::channel::BroadcastBus;
use countersync::config::ForegroundConfig;
use countersync::store::{CounterValue, MemoryStore, StoreService};
use countersync::widget::{RenderError, WidgetHost, WidgetInstanceId, WidgetView};
use parking_lot::Mutex;
use tokio::task::JoinHandle;

pub const KEY: &str = "saved_count";

/// Everything the three replicas share: one record and one bus.
pub struct Harness {
    pub backend: Arc<MemoryStore>,
    pub store: StoreService,
    pub bus: BroadcastBus,
    pub bridge: BridgeClient,
    pub server: JoinHandle<()>,
}

impl Harness {
    /// Empty store (absent record).
    pub fn new() -> Self {
        Self::with_backend(MemoryStore::new())
    }

    /// Store pre-seeded with `value`.
    pub fn seeded(value: u32) -> Self {
        Self::with_backend(MemoryStore::with_entry(KEY, i64::from(value)))
    }

    pub fn with_backend(backend: MemoryStore) -> Self {
        let backend = Arc::new(backend);
        let store = StoreService::new(backend.clone(), KEY);
        let bus = BroadcastBus::new(16);
        let (bridge, server) = BridgeLayer::new();
        let server = tokio::spawn(server.run(store.clone(), bus.clone()));
        Self {
            backend,
            store,
            bus,
            bridge,
            server,
        }
    }

    /// Raw persisted value, bypassing the service.
    pub fn stored(&self) -> Option<i64> {
        self.backend.peek(KEY)
    }

    /// Write straight to the store, like another process would.
    pub async fn external_set(&self, value: u32) {
        self.store
            .set(CounterValue::new(value))
            .await
            .expect("external write failed");
    }
}

impl Drop for Harness {
    fn drop(&mut self) {
        self.server.abort();
    }
}

pub fn foreground_config() -> ForegroundConfig {
    ForegroundConfig {
        reconcile_on_broadcast: true,
    }
}

pub fn resume_only_config() -> ForegroundConfig {
    ForegroundConfig {
        reconcile_on_broadcast: false,
    }
}

pub fn value(n: u32) -> CounterValue {
    CounterValue::new(n)
}

/// Widget host that records every successful render and can be told to fail
/// specific instances.
#[derive(Clone, Default)]
pub struct RecordingHost {
    instances: Vec<WidgetInstanceId>,
    failing: Arc<Mutex<HashSet<WidgetInstanceId>>>,
    rendered: Arc<Mutex<Vec<(WidgetInstanceId, String)>>>,
}

impl RecordingHost {
    pub fn new(ids: &[u32]) -> Self {
        Self {
            instances: ids.iter().copied().map(WidgetInstanceId).collect(),
            ..Self::default()
        }
    }

    pub fn fail(&self, id: u32) {
        self.failing.lock().insert(WidgetInstanceId(id));
    }

    pub fn renders(&self) -> Vec<(WidgetInstanceId, String)> {
        self.rendered.lock().clone()
    }

    /// Text last shown by `id`, if it was ever drawn.
    pub fn last_text(&self, id: u32) -> Option<String> {
        self.rendered
            .lock()
            .iter()
            .rev()
            .find(|(instance, _)| *instance == WidgetInstanceId(id))
            .map(|(_, text)| text.clone())
    }
}

impl WidgetHost for RecordingHost {
    fn instance_ids(&self) -> Vec<WidgetInstanceId> {
        self.instances.clone()
    }

    fn render(&mut self, view: &WidgetView) -> Result<(), RenderError> {
        if self.failing.lock().contains(&view.instance) {
            return Err(RenderError::Failed {
                instance: view.instance,
                reason: "host refused".to_string(),
            });
        }
        self.rendered.lock().push((view.instance, view.text()));
        Ok(())
    }
}

/// Deterministic pseudo-random sequence for interleaving tests.
pub struct Lcg(u64);

impl Lcg {
    pub fn new(seed: u64) -> Self {
        Self(seed)
    }

    pub fn next(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0 >> 33
    }
}
