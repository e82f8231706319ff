//! Chat transcript types shared between the web app and tooling.

use serde::{Deserialize, Serialize};

/// Who produced a chat transcript row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatSender {
    /// A human user of the widget.
    User,
    /// The assistant.
    Bot,
}

impl ChatSender {
    /// The stored string form, matching the `chat_messages.sender` column.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Bot => "bot",
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_matches_column_values() {
        assert_eq!(serde_json::to_string(&ChatSender::User).unwrap(), "\"user\"");
        assert_eq!(serde_json::to_string(&ChatSender::Bot).unwrap(), "\"bot\"");
        let sender: ChatSender = serde_json::from_str("\"bot\"").unwrap();
        assert_eq!(sender, ChatSender::Bot);
    }
}
