//! Chat widget API.
//!
//! Sending a message runs the full two-round tool loop and returns the new
//! transcript rows. The feed endpoint streams inserts from every session
//! over server-sent events, which is how other open tabs see new rows
//! without polling.

use std::convert::Infallible;

use async_stream::stream;
use axum::{
    Json,
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
};
use futures::Stream;
use serde::Deserialize;

use crate::claude::ChatService;
use crate::error::{AppError, Result};
use crate::middleware::OptionalUser;
use crate::models::{ChatMessage, CurrentUser};
use crate::state::AppState;

/// Body of the send endpoint.
#[derive(Debug, Deserialize)]
pub struct SendBody {
    pub text: String,
}

/// The platform bearer token for this request.
fn token_for<'a>(state: &'a AppState, user: Option<&'a CurrentUser>) -> &'a str {
    user.map_or_else(|| state.supabase().anon_token(), |u| u.access_token.as_str())
}

/// The transcript window, with a greeting when empty.
pub async fn messages(
    State(state): State<AppState>,
    OptionalUser(user): OptionalUser,
) -> Json<Vec<ChatMessage>> {
    let service = ChatService::new(state.supabase(), state.claude(), state.chat_feed());
    Json(service.transcript(token_for(&state, user.as_ref())).await)
}

/// Send a message and get the new transcript rows back.
///
/// # Errors
///
/// Returns 400 for an empty message. Downstream failures do not error; they
/// degrade to the apology row.
pub async fn send(
    State(state): State<AppState>,
    OptionalUser(user): OptionalUser,
    Json(body): Json<SendBody>,
) -> Result<Json<Vec<ChatMessage>>> {
    let text = body.text.trim();
    if text.is_empty() {
        return Err(AppError::BadRequest("message text is empty".to_owned()));
    }

    let service = ChatService::new(state.supabase(), state.claude(), state.chat_feed());
    let rows = service
        .send_message(
            token_for(&state, user.as_ref()),
            user.as_ref().map(|u| u.id),
            text,
        )
        .await;

    Ok(Json(rows))
}

/// Live feed of transcript inserts as server-sent events.
pub async fn feed(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = std::result::Result<Event, Infallible>>> {
    let mut rx = state.chat_feed().subscribe();

    let stream = stream! {
        loop {
            match rx.recv().await {
                Ok(message) => {
                    let event = Event::default().event("message").json_data(&message);
                    match event {
                        Ok(event) => yield Ok(event),
                        Err(e) => {
                            tracing::error!(error = %e, "failed to serialize feed event");
                        }
                    }
                }
                // A lagged subscriber skips what it missed and keeps going.
                Err(tokio::sync::broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::debug!(skipped, "chat feed subscriber lagged");
                }
                Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
            }
        }
    };

    Sse::new(stream).keep_alive(KeepAlive::default())
}
