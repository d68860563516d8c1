use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A message as persisted by the log and returned to clients.
///
/// `id` and `timestamp` are assigned by the server on append — the value
/// handed back from a post is the canonical record, never an echo of the
/// caller's input.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub username: String,
    pub timestamp: DateTime<Utc>,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}
