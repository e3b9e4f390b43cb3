//! Scripted interactive sessions on an in-memory store.

mod common;

use std::sync::Arc;

use common::*;
use countersync::config::Config;
use countersync::session::run_session;
use countersync::store::{MemoryStore, StoreService};

async fn run_script(store: StoreService, script: &str) -> String {
    let mut config = Config::default();
    config.widget.refresh_interval_seconds = 0;

    let mut out = Vec::new();
    run_session(&config, store, script.as_bytes(), RecordingHost::new(&[1]), &mut out)
        .await
        .expect("session failed");
    String::from_utf8(out).unwrap()
}

#[tokio::test]
async fn presses_external_write_and_resume() {
    let backend = Arc::new(MemoryStore::new());
    let store = StoreService::new(backend.clone(), KEY);

    let output = run_script(store, "+\n+\n-\nset 5\nbg\nfg\nq\n").await;

    assert_eq!(
        output,
        "app: count 0\n\
         app: count 1\n\
         app: count 2\n\
         app: count 1\n\
         store: 5\n\
         app: background\n\
         app: reconciled 1 -> 5 (4 commands)\n\
         app: unmounted at 5\n"
    );
    assert_eq!(backend.peek(KEY), Some(5));
}

#[tokio::test]
async fn decrease_at_zero_and_unknown_input() {
    let store = StoreService::new(Arc::new(MemoryStore::new()), KEY);

    let output = run_script(store, "-\nfrobnicate\n\nfg\n").await;

    assert_eq!(
        output,
        "app: count 0\n\
         app: count 0 (unchanged)\n\
         error: unknown command 'frobnicate'\n\
         app: in sync at 0\n\
         app: unmounted at 0\n"
    );
}

#[tokio::test]
async fn unavailable_store_fails_the_mount() {
    let backend = Arc::new(MemoryStore::new());
    backend.set_unavailable(true);
    let store = StoreService::new(backend, KEY);

    let mut out = Vec::new();
    let result = run_session(
        &Config::default(),
        store,
        "q\n".as_bytes(),
        RecordingHost::new(&[1]),
        &mut out,
    )
    .await;

    assert!(result.is_err());
    assert!(out.is_empty());
}
