//! Model-View-Intent (MVI) primitives.
//!
//! Stateful views in this crate keep their state transitions in a pure
//! reducer and do side effects (event emission, store writes) around the
//! dispatch call.
//!
//! ```text
//! Intent ──→ Reducer ──→ State ──→ View
//!    ↑                              │
//!    └──────────────────────────────┘
//! ```

mod intent;
mod reducer;
mod state;

pub use intent::Intent;
pub use reducer::Reducer;
pub use state::UiState;
