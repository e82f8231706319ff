//! Session-related types.
//!
//! Types stored in the tower-session for authentication and widget state.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use utility_hub_core::{Email, Plan, UserId};

/// Session-stored user identity plus the hosted platform's tokens.
///
/// The access/refresh tokens are issued by the hosted auth service; this
/// application only stores and replays them. The session store lives
/// server-side, so the tokens never reach the browser.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    /// Platform user id.
    pub id: UserId,
    /// User's email address.
    pub email: Email,
    /// Subscription tier, cached at sign-in and after plan changes.
    pub plan: Plan,
    /// Bearer token for data calls.
    pub access_token: String,
    /// Token used to mint a fresh access token.
    pub refresh_token: String,
    /// When the access token stops being accepted.
    pub expires_at: DateTime<Utc>,
}

impl CurrentUser {
    /// Leeway subtracted from the expiry so a token is refreshed slightly
    /// before the platform would start rejecting it.
    const EXPIRY_LEEWAY_SECS: i64 = 30;

    /// Whether the access token needs refreshing at `now`.
    #[must_use]
    pub fn token_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at - Duration::seconds(Self::EXPIRY_LEEWAY_SECS)
    }
}

/// Session keys for stored state.
pub mod session_keys {
    /// Key for the current logged-in user.
    pub const CURRENT_USER: &str = "current_user";

    /// Key for the anonymous task list (the on-device fallback store).
    pub const LOCAL_TASKS: &str = "todos";

    /// Key for the calculator state machine.
    pub const CALCULATOR: &str = "calculator";
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn user(expires_at: DateTime<Utc>) -> CurrentUser {
        CurrentUser {
            id: UserId::generate(),
            email: Email::parse("user@example.com").unwrap(),
            plan: Plan::Free,
            access_token: "token".to_owned(),
            refresh_token: "refresh".to_owned(),
            expires_at,
        }
    }

    #[test]
    fn test_token_expired_with_leeway() {
        let now = Utc::now();
        assert!(user(now - Duration::minutes(1)).token_expired(now));
        // Inside the leeway window counts as expired.
        assert!(user(now + Duration::seconds(10)).token_expired(now));
        assert!(!user(now + Duration::minutes(10)).token_expired(now));
    }
}
