// Activity feed entries
use chrono::{DateTime, Utc};
use serde::Serialize;

pub const ASSISTANT_NAME: &str = "AI Assistant";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    Action,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ActivityKind,
    pub user: String,
    pub avatar_fallback: String,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

impl Activity {
    /// An action performed by the assistant, stamped now
    pub fn assistant_action(text: impl Into<String>) -> Self {
        Self {
            id: format!("act-{}", uuid::Uuid::new_v4()),
            kind: ActivityKind::Action,
            user: ASSISTANT_NAME.to_string(),
            avatar_fallback: "AI".to_string(),
            text: text.into(),
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assistant_action_wire_shape() {
        let activity = Activity::assistant_action("Added KPI cards.");
        let json = serde_json::to_value(&activity).unwrap();
        assert_eq!(json["type"], "action");
        assert_eq!(json["user"], ASSISTANT_NAME);
        assert_eq!(json["avatarFallback"], "AI");
        assert!(json["id"].as_str().unwrap().starts_with("act-"));
    }
}
