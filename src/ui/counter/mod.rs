//! Embedded counter view.
//!
//! A stateful view living inside the foreground container. It owns its own
//! in-memory count and only understands two relative commands; there is no
//! way to set an absolute value from outside.
//!
//! # Architecture
//!
//! - `state.rs` - count + attach lifecycle
//! - `intent.rs` - commands and lifecycle transitions
//! - `reducer.rs` - pure state transitions
//! - `view.rs` - effectful wrapper that emits change events

mod intent;
mod reducer;
mod state;
mod view;

pub use intent::{CounterCommand, CounterIntent};
pub use reducer::CounterReducer;
pub use state::{EmbeddedCounterState, ViewLifecycle};
pub use view::{ChangeEvent, ChangeEvents, CommandOutcome, EmbeddedCounter};
