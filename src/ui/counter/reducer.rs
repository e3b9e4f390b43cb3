//! Reducer for the embedded counter.

use crate::ui::mvi::Reducer;

use super::intent::CounterIntent;
use super::state::{EmbeddedCounterState, ViewLifecycle};

/// Pure transitions. Event emission happens in `EmbeddedCounter`.
pub struct CounterReducer;

impl Reducer for CounterReducer {
    type State = EmbeddedCounterState;
    type Intent = CounterIntent;

    fn reduce(state: Self::State, intent: Self::Intent) -> Self::State {
        match intent {
            CounterIntent::Attach => EmbeddedCounterState {
                lifecycle: ViewLifecycle::Attached,
                ..state
            },
            CounterIntent::Detach => EmbeddedCounterState {
                lifecycle: ViewLifecycle::Detached,
                ..state
            },
            CounterIntent::Increase if state.is_attached() => EmbeddedCounterState {
                count: state.count.incremented(),
                ..state
            },
            // Floors at zero: decrease on 0 is a no-op.
            CounterIntent::Decrease if state.is_attached() => EmbeddedCounterState {
                count: state.count.decremented(),
                ..state
            },
            CounterIntent::Increase | CounterIntent::Decrease => state,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::CounterValue;

    fn attached(count: u32) -> EmbeddedCounterState {
        EmbeddedCounterState {
            count: CounterValue::new(count),
            lifecycle: ViewLifecycle::Attached,
        }
    }

    #[test]
    fn increase_adds_one() {
        let state = CounterReducer::reduce(attached(2), CounterIntent::Increase);
        assert_eq!(state.count, CounterValue::new(3));
    }

    #[test]
    fn decrease_subtracts_one() {
        let state = CounterReducer::reduce(attached(2), CounterIntent::Decrease);
        assert_eq!(state.count, CounterValue::new(1));
    }

    #[test]
    fn decrease_at_zero_is_noop() {
        let state = CounterReducer::reduce(attached(0), CounterIntent::Decrease);
        assert_eq!(state, attached(0));
    }

    #[test]
    fn commands_before_attach_are_ignored() {
        let created = EmbeddedCounterState::new(CounterValue::new(4));
        let state = CounterReducer::reduce(created.clone(), CounterIntent::Increase);
        assert_eq!(state, created);
    }

    #[test]
    fn commands_after_detach_are_ignored() {
        let state = CounterReducer::reduce(attached(4), CounterIntent::Detach);
        let state = CounterReducer::reduce(state, CounterIntent::Decrease);
        assert_eq!(state.count, CounterValue::new(4));
        assert_eq!(state.lifecycle, ViewLifecycle::Detached);
    }

    #[test]
    fn reattach_keeps_count() {
        let state = CounterReducer::reduce(attached(4), CounterIntent::Detach);
        let state = CounterReducer::reduce(state, CounterIntent::Attach);
        assert_eq!(state, attached(4));
    }

    #[test]
    fn can_decrease_tracks_floor() {
        assert!(attached(1).can_decrease());
        assert!(!attached(0).can_decrease());
        assert!(!EmbeddedCounterState::new(CounterValue::new(1)).can_decrease());
    }
}
