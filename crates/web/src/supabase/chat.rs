//! `chat_messages` table: the shared chat transcript.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;

use utility_hub_core::{ChatSender, MessageId, UserId};

use crate::models::ChatMessage;

use super::{SupabaseClient, SupabaseError};

/// Wire shape of a `chat_messages` row.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatMessageRow {
    id: MessageId,
    message: String,
    sender: ChatSender,
    created_at: DateTime<Utc>,
}

impl From<ChatMessageRow> for ChatMessage {
    fn from(row: ChatMessageRow) -> Self {
        Self {
            id: row.id,
            text: row.message,
            sender: row.sender,
            timestamp: row.created_at,
        }
    }
}

impl SupabaseClient {
    /// The oldest-first transcript window shown when the widget opens.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform call fails.
    #[instrument(skip(self, access_token))]
    pub async fn recent_chat_messages(
        &self,
        access_token: &str,
        limit: usize,
    ) -> Result<Vec<ChatMessage>, SupabaseError> {
        let url = format!(
            "{}?select=id,message,sender,created_at&order=created_at.asc&limit={limit}",
            self.rest_url("chat_messages")
        );
        let response = self
            .request(reqwest::Method::GET, url, access_token)
            .send()
            .await?;

        let body = Self::read_body(response).await?;
        let rows: Vec<ChatMessageRow> = Self::parse_json(&body)?;
        Ok(rows.into_iter().map(ChatMessage::from).collect())
    }

    /// Append one transcript row. `user_id` is null for anonymous visitors.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform call fails.
    #[instrument(skip(self, access_token, text), fields(sender = sender.as_str()))]
    pub async fn insert_chat_message(
        &self,
        access_token: &str,
        user_id: Option<UserId>,
        text: &str,
        sender: ChatSender,
    ) -> Result<ChatMessage, SupabaseError> {
        let response = self
            .request(
                reqwest::Method::POST,
                self.rest_url("chat_messages"),
                access_token,
            )
            .header("Prefer", "return=representation")
            .json(&json!({
                "user_id": user_id,
                "message": text,
                "sender": sender.as_str(),
            }))
            .send()
            .await?;

        let body = Self::read_body(response).await?;
        let rows: Vec<ChatMessageRow> = Self::parse_json(&body)?;
        rows.into_iter()
            .next()
            .map(ChatMessage::from)
            .ok_or_else(|| SupabaseError::Parse("insert returned no row".to_owned()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_row_converts() {
        let body = format!(
            r#"{{
                "id": "{}",
                "user_id": null,
                "message": "hello there",
                "sender": "bot",
                "created_at": "2026-08-07T12:00:00Z"
            }}"#,
            uuid::Uuid::new_v4()
        );
        let row: ChatMessageRow = serde_json::from_str(&body).unwrap();
        let message = ChatMessage::from(row);
        assert_eq!(message.sender, ChatSender::Bot);
        assert_eq!(message.text, "hello there");
    }
}
