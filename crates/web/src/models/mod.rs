//! Application-facing models.
//!
//! These are the shapes the routes and templates work with; the raw wire
//! shapes of the hosted platform live in [`crate::supabase`] and are
//! converted at the client boundary.

pub mod chat;
pub mod product;
pub mod session;
pub mod task;

pub use chat::ChatMessage;
pub use product::Product;
pub use session::{CurrentUser, session_keys};
pub use task::{Task, TaskFilter};
