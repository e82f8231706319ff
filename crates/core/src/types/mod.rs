//! Core types for Utility Hub.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod chat;
pub mod email;
pub mod id;
pub mod plan;
pub mod price;

pub use chat::ChatSender;
pub use email::{Email, EmailError};
pub use id::*;
pub use plan::Plan;
pub use price::Price;
