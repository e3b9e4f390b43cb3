//! Base trait for intents.

/// Marker trait for intent objects: commands dispatched to a view or
/// lifecycle transitions reported by its host.
pub trait Intent: Send + 'static {}
