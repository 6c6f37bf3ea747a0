use super::{key_assignment::KeyAssignment, key_item::KeyItem, user_profile::UserProfile};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProtocolAction {
    Issue,
    Return,
    Lost,
    Reactivate,
}

impl ProtocolAction {
    pub fn to_db_str(&self) -> &'static str {
        match self {
            ProtocolAction::Issue => "issue",
            ProtocolAction::Return => "return",
            ProtocolAction::Lost => "lost",
            ProtocolAction::Reactivate => "reactivate",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "issue" => Some(ProtocolAction::Issue),
            "return" => Some(ProtocolAction::Return),
            "lost" => Some(ProtocolAction::Lost),
            "reactivate" => Some(ProtocolAction::Reactivate),
            _ => None,
        }
    }
}

/// Append-only audit row for one key lifecycle transition.
#[derive(Debug, Clone, Serialize)]
pub struct KeyProtocolEntry {
    pub id: i64,
    pub action: ProtocolAction,
    pub key_item_id: String,
    pub assignment_id: Option<i64>, // None for reactivation
    pub acting_user_id: Option<String>,
    pub created_at: String,
}

/// A protocol entry together with the records it refers to.
#[derive(Debug, Clone, Serialize)]
pub struct ProtocolDetails {
    pub protocol: KeyProtocolEntry,
    pub key_item: KeyItem,
    pub assignment: Option<KeyAssignment>,
    pub holder: Option<UserProfile>,
}
