//! Chat assistant built on a hosted chat-completion endpoint.
//!
//! The widget forwards user text to the Messages API with a small manifest
//! of callable actions (product lookup, arithmetic, clock, product search).
//! Tool calls are executed locally and fed back for one follow-up round;
//! any failure degrades to a fixed apology string.

mod client;
mod error;
mod expr;
mod service;
mod tools;
mod types;

pub use client::ClaudeClient;
pub use error::ClaudeError;
pub use expr::{ExprError, evaluate};
pub use service::{APOLOGY, ChatService};
pub use tools::{ToolExecutor, hub_tools};
pub use types::{
    ChatRequest, ChatResponse, ContentBlock, Message, MessageContent, StopReason, Tool, Usage,
};
