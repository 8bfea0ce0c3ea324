//! Control messages sent by the host UI (e.g. a settings popup).

use serde::{Deserialize, Serialize};
use serde_json::Value;

use jobpulse_core::Threshold;

pub const UPDATE_LIMIT_ACTION: &str = "updateLimit";
pub const LIMIT_UPDATED_STATUS: &str = "limit updated";

/// Recognized control messages. Anything else is ignored.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ControlMessage {
    /// The stored limit changed: re-read it and redraw every indicator.
    UpdateLimit,
}

#[derive(Deserialize)]
struct Envelope {
    action: String,
}

impl ControlMessage {
    /// Parse `{"action": "..."}`. Unknown actions and malformed payloads
    /// yield `None`.
    pub fn from_json(value: &Value) -> Option<Self> {
        let envelope = Envelope::deserialize(value).ok()?;
        match envelope.action.as_str() {
            UPDATE_LIMIT_ACTION => Some(ControlMessage::UpdateLimit),
            _ => None,
        }
    }
}

/// Reply to [`ControlMessage::UpdateLimit`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlReply {
    pub status: String,
    pub new_limit: Threshold,
}

impl ControlReply {
    pub fn limit_updated(new_limit: Threshold) -> Self {
        Self {
            status: LIMIT_UPDATED_STATUS.to_string(),
            new_limit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_update_limit() {
        let msg = ControlMessage::from_json(&json!({ "action": "updateLimit" }));
        assert_eq!(msg, Some(ControlMessage::UpdateLimit));
    }

    #[test]
    fn ignores_unknown_and_malformed() {
        assert_eq!(ControlMessage::from_json(&json!({ "action": "reload" })), None);
        assert_eq!(ControlMessage::from_json(&json!({ "limit": 5 })), None);
        assert_eq!(ControlMessage::from_json(&json!("updateLimit")), None);
    }

    #[test]
    fn reply_shape() {
        let reply = ControlReply::limit_updated(Threshold::new(120).unwrap());
        assert_eq!(
            serde_json::to_value(&reply).unwrap(),
            json!({ "status": "limit updated", "newLimit": 120 })
        );
    }
}
