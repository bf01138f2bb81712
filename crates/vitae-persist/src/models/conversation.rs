use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One browser session's worth of messages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    #[serde(deserialize_with = "super::id::string_or_number")]
    pub id: String,
    pub session_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}
