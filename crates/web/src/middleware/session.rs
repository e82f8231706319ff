//! Session middleware configuration.
//!
//! Sessions live in an in-process memory store: the only durable state this
//! application owns is the hosted platform's, and an instance restart just
//! asks visitors to sign in again.

use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use crate::config::HubConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "hub_session";

/// Session expiry time in seconds (7 days).
const SESSION_EXPIRY_SECONDS: i64 = 7 * 24 * 60 * 60;

/// Create the session layer.
#[must_use]
pub fn create_session_layer(config: &HubConfig) -> SessionManagerLayer<MemoryStore> {
    let store = MemoryStore::default();

    // Only mark cookies Secure when actually served over HTTPS
    let is_secure = config.base_url.starts_with("https://");

    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(is_secure)
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}
