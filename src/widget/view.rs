//! What a single home-screen widget instance shows.

use crate::channel::{BroadcastMessage, ACTION_DECREMENT, ACTION_INCREMENT};
use crate::store::CounterValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WidgetInstanceId(pub u32);

impl std::fmt::Display for WidgetInstanceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Tap actions handled by the widget itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetAction {
    Increment,
    Decrement,
}

impl WidgetAction {
    pub fn action_id(self) -> &'static str {
        match self {
            Self::Increment => ACTION_INCREMENT,
            Self::Decrement => ACTION_DECREMENT,
        }
    }

    pub fn message(self) -> BroadcastMessage {
        match self {
            Self::Increment => BroadcastMessage::IncrementRequested,
            Self::Decrement => BroadcastMessage::DecrementRequested,
        }
    }

    pub fn apply(self, value: CounterValue) -> CounterValue {
        match self {
            Self::Increment => value.incremented(),
            Self::Decrement => value.decremented(),
        }
    }
}

/// The two interactive regions of a widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapRegion {
    Plus,
    Minus,
}

impl TapRegion {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "plus" | "+" => Some(Self::Plus),
            "minus" | "-" => Some(Self::Minus),
            _ => None,
        }
    }

    pub fn action(self) -> WidgetAction {
        match self {
            Self::Plus => WidgetAction::Increment,
            Self::Minus => WidgetAction::Decrement,
        }
    }

    /// Per-instance request code, unique across every region of every
    /// instance.
    pub fn request_code(self, instance: WidgetInstanceId) -> u64 {
        let base = u64::from(instance.0) * 2;
        match self {
            Self::Plus => base,
            Self::Minus => base + 1,
        }
    }
}

/// Region → action binding attached to a rendered view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TapBinding {
    pub region: TapRegion,
    pub action: WidgetAction,
    pub request_code: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetView {
    pub instance: WidgetInstanceId,
    pub count: CounterValue,
    pub bindings: [TapBinding; 2],
}

impl WidgetView {
    pub fn build(instance: WidgetInstanceId, count: CounterValue) -> Self {
        let bind = |region: TapRegion| TapBinding {
            region,
            action: region.action(),
            request_code: region.request_code(instance),
        };
        Self {
            instance,
            count,
            bindings: [bind(TapRegion::Plus), bind(TapRegion::Minus)],
        }
    }

    pub fn text(&self) -> String {
        self.count.to_string()
    }

    /// Message dispatched when `region` is tapped.
    pub fn tap(&self, region: TapRegion) -> BroadcastMessage {
        region.action().message()
    }
}
