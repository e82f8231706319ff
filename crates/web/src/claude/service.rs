//! Chat orchestration: persistence, history, and the two-round tool loop.
//!
//! Round 1 sends the rolling history plus the tool manifest. If the model
//! requests tool calls, each is executed locally and a single round 2
//! produces the final reply. There is no third round and no retry: any
//! failure along the way degrades to a fixed apology string, and transcript
//! writes are best-effort.

use chrono::Utc;
use tokio::sync::broadcast;
use tracing::{info, instrument, warn};

use utility_hub_core::{ChatSender, MessageId, UserId};

use crate::models::ChatMessage;
use crate::supabase::SupabaseClient;

use super::client::ClaudeClient;
use super::error::ClaudeError;
use super::tools::{ToolExecutor, hub_tools};
use super::types::{ChatResponse, ContentBlock, Message, MessageContent};

/// Rolling history window, in transcript rows.
const HISTORY_TURNS: usize = 10;

/// Transcript rows loaded when the widget opens.
const TRANSCRIPT_LIMIT: usize = 50;

/// Shown whenever reply generation fails, whatever the reason.
pub const APOLOGY: &str =
    "Sorry - something went wrong while generating a response. Please try again in a moment.";

const SYSTEM_PROMPT: &str = "You are the friendly assistant of the Utility Hub. Answer \
                             concisely and helpfully. Use the available tools when a question \
                             involves products, prices, arithmetic, or the current time.";

/// Chat service wiring the transcript store, the completion client, and the
/// live feed together.
pub struct ChatService<'a> {
    supabase: &'a SupabaseClient,
    claude: &'a ClaudeClient,
    feed: &'a broadcast::Sender<ChatMessage>,
}

impl<'a> ChatService<'a> {
    /// Create a new chat service.
    #[must_use]
    pub const fn new(
        supabase: &'a SupabaseClient,
        claude: &'a ClaudeClient,
        feed: &'a broadcast::Sender<ChatMessage>,
    ) -> Self {
        Self {
            supabase,
            claude,
            feed,
        }
    }

    /// The transcript window for the widget, with a canned greeting when the
    /// table is empty (or unreadable).
    pub async fn transcript(&self, access_token: &str) -> Vec<ChatMessage> {
        let messages = self
            .supabase
            .recent_chat_messages(access_token, TRANSCRIPT_LIMIT)
            .await
            .unwrap_or_else(|e| {
                warn!(error = %e, "failed to load chat transcript");
                Vec::new()
            });

        if messages.is_empty() {
            vec![ChatMessage::welcome(Utc::now())]
        } else {
            messages
        }
    }

    /// Handle one user message end to end.
    ///
    /// Returns the rows added to the transcript (the user's message and the
    /// assistant's reply). This method never fails; every error path ends in
    /// the apology string.
    #[instrument(skip_all, fields(user = ?user_id))]
    pub async fn send_message(
        &self,
        access_token: &str,
        user_id: Option<UserId>,
        text: &str,
    ) -> Vec<ChatMessage> {
        // History is captured before the new row lands so the current turn
        // appears exactly once in the request.
        let history = self
            .supabase
            .recent_chat_messages(access_token, TRANSCRIPT_LIMIT)
            .await
            .unwrap_or_default();

        let user_row = self
            .persist(access_token, user_id, text, ChatSender::User)
            .await;
        let reply_text = match self.generate_reply(access_token, &history, text).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!(error = %e, "chat reply generation failed");
                APOLOGY.to_owned()
            }
        };
        let bot_row = self
            .persist(access_token, user_id, &reply_text, ChatSender::Bot)
            .await;

        vec![user_row, bot_row]
    }

    /// Write one transcript row, falling back to an unsaved local row when
    /// the platform write fails. Either way the row reaches the live feed.
    async fn persist(
        &self,
        access_token: &str,
        user_id: Option<UserId>,
        text: &str,
        sender: ChatSender,
    ) -> ChatMessage {
        let message = match self
            .supabase
            .insert_chat_message(access_token, user_id, text, sender)
            .await
        {
            Ok(row) => row,
            Err(e) => {
                warn!(error = %e, "failed to persist chat message");
                ChatMessage {
                    id: MessageId::generate(),
                    text: text.to_owned(),
                    sender,
                    timestamp: Utc::now(),
                }
            }
        };

        // Fan out to other open widgets; no receivers is fine.
        let _ = self.feed.send(message.clone());
        message
    }

    /// The two-round completion protocol.
    async fn generate_reply(
        &self,
        access_token: &str,
        history: &[ChatMessage],
        text: &str,
    ) -> Result<String, ClaudeError> {
        let tools = hub_tools();
        let mut messages = to_history(history);
        messages.push(Message::user(text));

        let first = self
            .claude
            .complete(
                messages.clone(),
                Some(SYSTEM_PROMPT.to_owned()),
                Some(tools.clone()),
            )
            .await?;

        info!(
            stop_reason = ?first.stop_reason,
            content_blocks = first.content.len(),
            "round-1 response received"
        );

        if !first.wants_tools() {
            return Ok(non_empty_or_apology(first.text()));
        }

        let tool_results = self.run_tools(access_token, &first).await;

        messages.push(Message {
            role: "assistant".to_owned(),
            content: MessageContent::Blocks(first.content),
        });
        messages.push(Message {
            role: "user".to_owned(),
            content: MessageContent::Blocks(tool_results),
        });

        let second = self
            .claude
            .complete(messages, Some(SYSTEM_PROMPT.to_owned()), Some(tools))
            .await?;

        Ok(non_empty_or_apology(second.text()))
    }

    /// Execute every tool call in a round-1 response.
    async fn run_tools(&self, access_token: &str, response: &ChatResponse) -> Vec<ContentBlock> {
        let executor = ToolExecutor::new(self.supabase, access_token);
        let mut results = Vec::new();

        for block in &response.content {
            let ContentBlock::ToolUse { id, name, input } = block else {
                continue;
            };

            info!(tool = %name, "executing tool call");
            let (content, is_error) = match executor.execute(name, input).await {
                Ok(result) => (result, false),
                Err(e) => (format!("Error: {e}"), true),
            };

            results.push(ContentBlock::ToolResult {
                tool_use_id: id.clone(),
                content,
                is_error: Some(is_error),
            });
        }

        results
    }
}

/// Map the trailing transcript rows into completion-request turns.
fn to_history(messages: &[ChatMessage]) -> Vec<Message> {
    let start = messages.len().saturating_sub(HISTORY_TURNS);
    messages
        .get(start..)
        .unwrap_or_default()
        .iter()
        .map(|message| match message.sender {
            ChatSender::User => Message::user(message.text.clone()),
            ChatSender::Bot => Message::assistant(message.text.clone()),
        })
        .collect()
}

fn non_empty_or_apology(text: String) -> String {
    if text.trim().is_empty() {
        APOLOGY.to_owned()
    } else {
        text
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn row(sender: ChatSender, text: &str) -> ChatMessage {
        ChatMessage {
            id: MessageId::generate(),
            text: text.to_owned(),
            sender,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn test_history_maps_senders_to_roles() {
        let rows = vec![row(ChatSender::User, "hi"), row(ChatSender::Bot, "hello")];
        let history = to_history(&rows);
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].role, "user");
        assert_eq!(history[1].role, "assistant");
    }

    #[test]
    fn test_history_trims_to_last_ten_rows() {
        let rows: Vec<ChatMessage> = (0..25)
            .map(|i| row(ChatSender::User, &format!("message {i}")))
            .collect();
        let history = to_history(&rows);
        assert_eq!(history.len(), 10);
        match &history[0].content {
            MessageContent::Text(text) => assert_eq!(text, "message 15"),
            MessageContent::Blocks(_) => panic!("expected text"),
        }
    }

    #[test]
    fn test_empty_reply_becomes_apology() {
        assert_eq!(non_empty_or_apology(String::new()), APOLOGY);
        assert_eq!(non_empty_or_apology("  \n ".to_owned()), APOLOGY);
        assert_eq!(non_empty_or_apology("fine".to_owned()), "fine");
    }
}
