//! Replay-based reconciliation.
//!
//! The embedded view can only be moved one step at a time, so bringing it to
//! the authoritative value means replaying `|target - current|` single-step
//! commands in the right direction.

use crate::store::CounterValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepDirection {
    Up,
    Down,
}

/// Commands issued by one [`drive_to_target`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Replay {
    pub direction: Option<StepDirection>,
    pub commands: u64,
}

impl Replay {
    pub const NONE: Replay = Replay {
        direction: None,
        commands: 0,
    };
}

/// Drive a state machine from `current` to `target` using only single-step
/// transitions, one call per step.
///
/// `step_up` / `step_down` receive `ctx` so both can mutate the same machine.
pub fn drive_to_target<C, U, D>(
    ctx: &mut C,
    current: CounterValue,
    target: CounterValue,
    mut step_up: U,
    mut step_down: D,
) -> Replay
where
    U: FnMut(&mut C),
    D: FnMut(&mut C),
{
    let delta = current.delta_to(target);
    let commands = delta.unsigned_abs();

    let direction = match delta.signum() {
        0 => return Replay::NONE,
        1 => StepDirection::Up,
        _ => StepDirection::Down,
    };

    for _ in 0..commands {
        match direction {
            StepDirection::Up => step_up(ctx),
            StepDirection::Down => step_down(ctx),
        }
    }

    Replay {
        direction: Some(direction),
        commands,
    }
}

/// Per-container sync bookkeeping. Never shared outside its container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconciliationState {
    pub last_known: CounterValue,
}

impl ReconciliationState {
    pub fn new(last_known: CounterValue) -> Self {
        Self { last_known }
    }
}

/// Why a reconciliation pass ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileTrigger {
    Mount,
    Resume,
    Broadcast,
}

impl ReconcileTrigger {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mount => "mount",
            Self::Resume => "resume",
            Self::Broadcast => "broadcast",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// Store and last known value already agreed; nothing issued.
    InSync { value: CounterValue },

    /// View replayed to the authoritative value.
    Replayed {
        from: CounterValue,
        to: CounterValue,
        replay: Replay,
    },

    /// Replay finished but the view reports a different count than the
    /// store (a step was swallowed by the zero floor). The next pass
    /// starts from `observed`.
    Diverged {
        expected: CounterValue,
        observed: CounterValue,
        replay: Replay,
    },
}

impl ReconcileOutcome {
    pub fn commands(&self) -> u64 {
        match self {
            Self::InSync { .. } => 0,
            Self::Replayed { replay, .. } | Self::Diverged { replay, .. } => replay.commands,
        }
    }
}
