//! Intents for the embedded counter.

use crate::ui::mvi::Intent;

/// Command surface exposed to the host container.
///
/// Ids match the view manager's command map; names are what the host
/// dispatches by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CounterCommand {
    Increase,
    Decrease,
}

impl CounterCommand {
    pub const fn id(self) -> u32 {
        match self {
            Self::Increase => 1,
            Self::Decrease => 2,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Increase => "increase",
            Self::Decrease => "decrease",
        }
    }

    pub fn from_id(id: u32) -> Option<Self> {
        match id {
            1 => Some(Self::Increase),
            2 => Some(Self::Decrease),
            _ => None,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "increase" => Some(Self::Increase),
            "decrease" => Some(Self::Decrease),
            _ => None,
        }
    }

    /// Command that undoes this one (away from the zero floor).
    pub const fn inverse(self) -> Self {
        match self {
            Self::Increase => Self::Decrease,
            Self::Decrease => Self::Increase,
        }
    }
}

/// Intents dispatched to the counter reducer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterIntent {
    Increase,
    Decrease,
    /// View attached to its window.
    Attach,
    /// View detached; no further commands are accepted.
    Detach,
}

impl From<CounterCommand> for CounterIntent {
    fn from(command: CounterCommand) -> Self {
        match command {
            CounterCommand::Increase => CounterIntent::Increase,
            CounterCommand::Decrease => CounterIntent::Decrease,
        }
    }
}

impl Intent for CounterIntent {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_map_round_trips() {
        for command in [CounterCommand::Increase, CounterCommand::Decrease] {
            assert_eq!(CounterCommand::from_id(command.id()), Some(command));
            assert_eq!(CounterCommand::from_name(command.name()), Some(command));
        }
        assert_eq!(CounterCommand::from_id(3), None);
        assert_eq!(CounterCommand::from_name("setCount"), None);
    }
}
