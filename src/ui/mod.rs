//! Foreground side: the host container and the embedded counter view.

pub mod app;
pub mod counter;
pub mod events;
pub mod mvi;
