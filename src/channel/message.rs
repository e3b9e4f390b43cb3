use serde::{Deserialize, Serialize};

use crate::store::CounterValue;

pub const ACTION_INCREMENT: &str = "ACTION_INCREMENT";
pub const ACTION_DECREMENT: &str = "ACTION_DECREMENT";
pub const ACTION_VALUE_CHANGED: &str = "ACTION_VALUE_CHANGED";
pub const ACTION_APPWIDGET_UPDATE: &str = "ACTION_APPWIDGET_UPDATE";

/// Value announcement from the home-screen widget after a commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncBroadcast {
    pub value: CounterValue,
}

/// Everything that travels on the broadcast channel.
///
/// Serialized as a JSON object tagged by `action`, e.g.
/// `{"action":"ACTION_VALUE_CHANGED","value":4}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action")]
pub enum BroadcastMessage {
    /// Plus region tapped. Consumed by the widget's tap handler.
    #[serde(rename = "ACTION_INCREMENT")]
    IncrementRequested,

    /// Minus region tapped. Consumed by the widget's tap handler.
    #[serde(rename = "ACTION_DECREMENT")]
    DecrementRequested,

    /// Widget committed a new value. Consumed by live foreground listeners.
    #[serde(rename = "ACTION_VALUE_CHANGED")]
    ValueChanged(SyncBroadcast),

    /// Store changed elsewhere; widget instances should redraw.
    #[serde(rename = "ACTION_APPWIDGET_UPDATE")]
    RefreshRequested,
}

impl BroadcastMessage {
    pub fn action_id(&self) -> &'static str {
        match self {
            Self::IncrementRequested => ACTION_INCREMENT,
            Self::DecrementRequested => ACTION_DECREMENT,
            Self::ValueChanged(_) => ACTION_VALUE_CHANGED,
            Self::RefreshRequested => ACTION_APPWIDGET_UPDATE,
        }
    }

    pub fn value_changed(value: CounterValue) -> Self {
        Self::ValueChanged(SyncBroadcast { value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_changed_wire_shape() {
        let json = serde_json::to_string(&BroadcastMessage::value_changed(CounterValue::new(4)))
            .unwrap();
        assert_eq!(json, r#"{"action":"ACTION_VALUE_CHANGED","value":4}"#);
    }

    #[test]
    fn tap_actions_parse_from_identifiers() {
        let msg: BroadcastMessage = serde_json::from_str(r#"{"action":"ACTION_DECREMENT"}"#).unwrap();
        assert_eq!(msg, BroadcastMessage::DecrementRequested);
        assert_eq!(msg.action_id(), ACTION_DECREMENT);
    }

    #[test]
    fn negative_payload_is_rejected() {
        let parsed =
            serde_json::from_str::<BroadcastMessage>(r#"{"action":"ACTION_VALUE_CHANGED","value":-1}"#);
        assert!(parsed.is_err());
    }
}
