//! Chat transcript model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use utility_hub_core::{ChatSender, MessageId};

/// One row of the chat transcript.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: MessageId,
    pub text: String,
    pub sender: ChatSender,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    /// The canned greeting shown when the transcript is empty.
    #[must_use]
    pub fn welcome(now: DateTime<Utc>) -> Self {
        Self {
            id: MessageId::generate(),
            text: "Hello! How can I help you today?".to_owned(),
            sender: ChatSender::Bot,
            timestamp: now,
        }
    }
}
