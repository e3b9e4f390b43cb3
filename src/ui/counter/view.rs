//! Effectful wrapper around the counter reducer.

use tokio::sync::mpsc;

use crate::store::CounterValue;
use crate::ui::mvi::Reducer;

use super::intent::{CounterCommand, CounterIntent};
use super::reducer::CounterReducer;
use super::state::EmbeddedCounterState;

/// Change notification: the count after an accepted mutation, or the
/// current count right after attach.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeEvent {
    pub value: CounterValue,
}

/// Receiving end of the view's event stream, owned by the host container.
pub type ChangeEvents = mpsc::UnboundedReceiver<ChangeEvent>;

/// Result of one command as seen by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    /// Count changed and a change event was emitted.
    Applied(CounterValue),
    /// Accepted but nothing changed (decrease at zero). No event.
    Unchanged,
    /// View is not attached.
    Rejected,
}

pub struct EmbeddedCounter {
    state: EmbeddedCounterState,
    events: mpsc::UnboundedSender<ChangeEvent>,
}

impl EmbeddedCounter {
    /// Create the view with the count read from the store.
    pub fn create(initial: CounterValue) -> (Self, ChangeEvents) {
        let (events, receiver) = mpsc::unbounded_channel();
        let view = Self {
            state: EmbeddedCounterState::new(initial),
            events,
        };
        (view, receiver)
    }

    pub fn state(&self) -> &EmbeddedCounterState {
        &self.state
    }

    pub fn count(&self) -> CounterValue {
        self.state.count
    }

    pub fn is_attached(&self) -> bool {
        self.state.is_attached()
    }

    /// Attach to the window and announce the current count once.
    pub fn attach(&mut self) {
        if self.state.is_attached() {
            return;
        }
        self.dispatch(CounterIntent::Attach);
        self.emit();
    }

    pub fn detach(&mut self) {
        self.dispatch(CounterIntent::Detach);
    }

    pub fn receive_command(&mut self, command: CounterCommand) -> CommandOutcome {
        if !self.state.is_attached() {
            tracing::debug!(command = command.name(), "Command ignored: view not attached");
            return CommandOutcome::Rejected;
        }

        let before = self.state.count;
        self.dispatch(command.into());
        if self.state.count == before {
            return CommandOutcome::Unchanged;
        }

        self.emit();
        CommandOutcome::Applied(self.state.count)
    }

    fn dispatch(&mut self, intent: CounterIntent) {
        let state = std::mem::take(&mut self.state);
        self.state = CounterReducer::reduce(state, intent);
    }

    fn emit(&self) {
        let event = ChangeEvent {
            value: self.state.count,
        };
        if self.events.send(event).is_err() {
            tracing::trace!("Change event dropped (host gone)");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(events: &mut ChangeEvents) -> Vec<u32> {
        let mut values = Vec::new();
        while let Ok(event) = events.try_recv() {
            values.push(event.value.get());
        }
        values
    }

    #[test]
    fn attach_announces_current_count_once() {
        let (mut view, mut events) = EmbeddedCounter::create(CounterValue::new(5));
        assert!(drain(&mut events).is_empty());

        view.attach();
        view.attach();
        assert_eq!(drain(&mut events), vec![5]);
    }

    #[test]
    fn every_mutation_emits_event() {
        let (mut view, mut events) = EmbeddedCounter::create(CounterValue::ZERO);
        view.attach();
        drain(&mut events);

        assert_eq!(
            view.receive_command(CounterCommand::Increase),
            CommandOutcome::Applied(CounterValue::new(1))
        );
        view.receive_command(CounterCommand::Increase);
        view.receive_command(CounterCommand::Decrease);
        assert_eq!(drain(&mut events), vec![1, 2, 1]);
    }

    #[test]
    fn decrease_at_zero_emits_nothing() {
        let (mut view, mut events) = EmbeddedCounter::create(CounterValue::ZERO);
        view.attach();
        drain(&mut events);

        assert_eq!(
            view.receive_command(CounterCommand::Decrease),
            CommandOutcome::Unchanged
        );
        assert_eq!(view.count(), CounterValue::ZERO);
        assert!(drain(&mut events).is_empty());
    }

    #[test]
    fn detached_view_is_silent() {
        let (mut view, mut events) = EmbeddedCounter::create(CounterValue::new(2));
        view.attach();
        view.detach();
        drain(&mut events);

        assert_eq!(
            view.receive_command(CounterCommand::Increase),
            CommandOutcome::Rejected
        );
        assert_eq!(view.count(), CounterValue::new(2));
        assert!(drain(&mut events).is_empty());
    }
}
