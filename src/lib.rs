//! Keeps one non-negative counter consistent between a foreground app, the
//! counter view embedded in it, and an out-of-process home-screen widget.
//!
//! The replicas share no memory. They meet only at the persisted record
//! ([`store`]) and on a best-effort broadcast bus ([`channel`]). The
//! foreground container converges its embedded view by replaying
//! single-step commands ([`reconcile`]) whenever it mounts or resumes.

pub mod bridge;
pub mod channel;
pub mod config;
pub mod logging;
pub mod reconcile;
pub mod session;
pub mod store;
pub mod ui;
pub mod widget;
