//! State for the embedded counter.

use crate::store::CounterValue;
use crate::ui::mvi::UiState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewLifecycle {
    /// Constructed, not yet on screen.
    #[default]
    Created,
    Attached,
    Detached,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct EmbeddedCounterState {
    pub count: CounterValue,
    pub lifecycle: ViewLifecycle,
}

impl UiState for EmbeddedCounterState {}

impl EmbeddedCounterState {
    pub fn new(count: CounterValue) -> Self {
        Self {
            count,
            lifecycle: ViewLifecycle::Created,
        }
    }

    pub fn is_attached(&self) -> bool {
        self.lifecycle == ViewLifecycle::Attached
    }

    /// The host greys out its decrease button at zero.
    pub fn can_decrease(&self) -> bool {
        self.is_attached() && !self.count.is_zero()
    }
}
