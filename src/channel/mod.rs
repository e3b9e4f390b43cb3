//! Broadcast channel between the app, the embedded view and the
//! home-screen widget.
//!
//! Delivery is at-most-once and unordered relative to store writes. Nothing
//! in the crate relies on a message arriving; the resume-time reconciliation
//! pass is what makes replicas converge.

mod bus;
mod message;

pub use bus::{BroadcastBus, Subscription, MAX_CAPACITY};
pub use message::{
    BroadcastMessage, SyncBroadcast, ACTION_APPWIDGET_UPDATE, ACTION_DECREMENT, ACTION_INCREMENT,
    ACTION_VALUE_CHANGED,
};
