//! JSON API for the interactive widgets.

pub mod calc;
pub mod chat;
pub mod convert;
pub mod todos;

use axum::{
    Router,
    routing::{delete, get, post},
};

use crate::state::AppState;

/// Create the `/api` router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/todos", get(todos::list).post(todos::add))
        .route("/todos/{id}/toggle", post(todos::toggle))
        .route("/todos/{id}", delete(todos::remove))
        .route("/calc", post(calc::press))
        .route("/calc/clear", post(calc::clear))
        .route("/convert", get(convert::convert))
        .route("/chat/messages", get(chat::messages).post(chat::send))
        .route("/chat/feed", get(chat::feed))
}
