//! Auth (GoTrue) endpoints: sign-up, sign-in, refresh, sign-out.
//!
//! The hosted service owns credentials and token lifetimes; this module only
//! exchanges them. Token refresh uses the published refresh-token grant;
//! the protocol itself is not reimplemented here.

use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;

use utility_hub_core::{Email, UserId};

use super::{SupabaseClient, SupabaseError};

/// The user block inside a token response.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthUser {
    /// Platform user id.
    pub id: UserId,
    /// Email as registered with the platform.
    pub email: Email,
}

/// A granted auth session.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthSession {
    /// Bearer token for data calls.
    pub access_token: String,
    /// Token for the refresh grant.
    pub refresh_token: String,
    /// Seconds until `access_token` expires.
    pub expires_in: i64,
    /// The authenticated user.
    pub user: AuthUser,
}

impl AuthSession {
    /// Absolute expiry of the access token, measured from `now`.
    #[must_use]
    pub fn expires_at(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now + Duration::seconds(self.expires_in)
    }
}

impl SupabaseClient {
    /// Sign in with email and password.
    ///
    /// # Errors
    ///
    /// Returns [`SupabaseError::Unauthorized`] for bad credentials and other
    /// variants for transport or platform failures.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn sign_in(
        &self,
        email: &Email,
        password: &str,
    ) -> Result<AuthSession, SupabaseError> {
        let url = format!("{}?grant_type=password", self.auth_url("token"));
        let response = self
            .request(reqwest::Method::POST, url, self.anon_token())
            .json(&json!({ "email": email.as_str(), "password": password }))
            .send()
            .await?;

        let body = Self::read_body(response).await?;
        Self::parse_json(&body)
    }

    /// Create an account. The platform signs the user in immediately; no
    /// email confirmation round-trip is required.
    ///
    /// # Errors
    ///
    /// Returns an error if the address is taken or the platform rejects the
    /// password.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn sign_up(
        &self,
        email: &Email,
        password: &str,
    ) -> Result<AuthSession, SupabaseError> {
        let response = self
            .request(reqwest::Method::POST, self.auth_url("signup"), self.anon_token())
            .json(&json!({ "email": email.as_str(), "password": password }))
            .send()
            .await?;

        let body = Self::read_body(response).await?;
        Self::parse_json(&body)
    }

    /// Exchange a refresh token for a fresh session.
    ///
    /// # Errors
    ///
    /// Returns [`SupabaseError::Unauthorized`] when the refresh token has
    /// been revoked or expired; callers must treat that as a forced
    /// sign-out.
    #[instrument(skip(self, refresh_token))]
    pub async fn refresh_session(
        &self,
        refresh_token: &str,
    ) -> Result<AuthSession, SupabaseError> {
        let url = format!("{}?grant_type=refresh_token", self.auth_url("token"));
        let response = self
            .request(reqwest::Method::POST, url, self.anon_token())
            .json(&json!({ "refresh_token": refresh_token }))
            .send()
            .await?;

        let body = Self::read_body(response).await?;
        Self::parse_json(&body)
    }

    /// Revoke the session server-side. Best-effort; the local session is
    /// flushed regardless of the outcome.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform call fails.
    #[instrument(skip(self, access_token))]
    pub async fn sign_out(&self, access_token: &str) -> Result<(), SupabaseError> {
        let response = self
            .request(reqwest::Method::POST, self.auth_url("logout"), access_token)
            .send()
            .await?;

        Self::read_body(response).await?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_session_deserializes() {
        let body = format!(
            r#"{{
                "access_token": "at",
                "token_type": "bearer",
                "expires_in": 3600,
                "refresh_token": "rt",
                "user": {{ "id": "{}", "email": "user@example.com" }}
            }}"#,
            uuid::Uuid::new_v4()
        );
        let session: AuthSession = serde_json::from_str(&body).unwrap();
        assert_eq!(session.access_token, "at");
        assert_eq!(session.expires_in, 3600);
        assert_eq!(session.user.email.as_str(), "user@example.com");
    }

    #[test]
    fn test_expires_at() {
        let session = AuthSession {
            access_token: "at".to_owned(),
            refresh_token: "rt".to_owned(),
            expires_in: 60,
            user: AuthUser {
                id: UserId::generate(),
                email: Email::parse("a@b.c").unwrap(),
            },
        };
        let now = Utc::now();
        assert_eq!(session.expires_at(now), now + Duration::seconds(60));
    }
}
