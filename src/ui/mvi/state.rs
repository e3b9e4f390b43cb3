//! Base trait for view state.

/// Marker trait for view state objects.
///
/// States are plain values (Clone to derive the next one) and comparable so
/// the host can tell whether a dispatch changed anything.
pub trait UiState: Clone + PartialEq + Default + Send + 'static {}
