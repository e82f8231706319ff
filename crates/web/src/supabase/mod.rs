//! Hosted data/auth platform client.
//!
//! Everything stateful in this application lives in a hosted Supabase
//! project: auth sessions, the `profiles`, `todos`, `products` and
//! `chat_messages` tables. This module wraps the project's REST surface
//! (GoTrue for auth, PostgREST for tables) behind typed methods.
//!
//! The client is cheaply cloneable and caches product catalog reads with a
//! 5-minute TTL.

mod auth;
mod chat;
mod products;
mod profiles;
mod todos;

pub use auth::{AuthSession, AuthUser};
pub use products::NewProduct;

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use secrecy::ExposeSecret;
use thiserror::Error;

use crate::config::SupabaseConfig;
use crate::models::Product;

/// Errors from the hosted platform.
#[derive(Debug, Error)]
pub enum SupabaseError {
    /// HTTP transport failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The platform rejected the request.
    #[error("platform error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Message from the error body, or the raw body.
        message: String,
    },

    /// Credentials were rejected (sign-in, refresh, or an expired token).
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Rate limited by the platform.
    #[error("rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Failed to parse a response body.
    #[error("parse error: {0}")]
    Parse(String),
}

impl SupabaseError {
    /// Whether this error means the session token is no longer valid and
    /// the user must be signed out.
    #[must_use]
    pub const fn is_auth_invalid(&self) -> bool {
        matches!(self, Self::Unauthorized(_))
    }
}

/// Client for the hosted data/auth platform.
#[derive(Clone)]
pub struct SupabaseClient {
    inner: Arc<SupabaseClientInner>,
}

struct SupabaseClientInner {
    client: reqwest::Client,
    base_url: String,
    anon_key: String,
    product_cache: Cache<String, Arc<Vec<Product>>>,
}

impl SupabaseClient {
    /// Catalog cache TTL.
    const PRODUCT_CACHE_TTL: Duration = Duration::from_secs(300);

    /// Create a new platform client.
    #[must_use]
    pub fn new(config: &SupabaseConfig) -> Self {
        let product_cache = Cache::builder()
            .max_capacity(100)
            .time_to_live(Self::PRODUCT_CACHE_TTL)
            .build();

        Self {
            inner: Arc::new(SupabaseClientInner {
                client: reqwest::Client::new(),
                base_url: config.url.trim_end_matches('/').to_owned(),
                anon_key: config.anon_key.expose_secret().to_owned(),
                product_cache,
            }),
        }
    }

    /// URL of an auth (GoTrue) endpoint.
    fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{path}", self.inner.base_url)
    }

    /// URL of a table (PostgREST) endpoint.
    fn rest_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{table}", self.inner.base_url)
    }

    /// The anonymous key, used as the bearer token for unauthenticated calls.
    #[must_use]
    pub fn anon_token(&self) -> &str {
        &self.inner.anon_key
    }

    /// Start a request with the platform's standing headers.
    ///
    /// `access_token` is the user's bearer token; pass the anon key for
    /// unauthenticated access.
    fn request(
        &self,
        method: reqwest::Method,
        url: String,
        access_token: &str,
    ) -> reqwest::RequestBuilder {
        self.inner
            .client
            .request(method, url)
            .header("apikey", &self.inner.anon_key)
            .bearer_auth(access_token)
    }

    /// Read the response body, mapping error statuses to [`SupabaseError`].
    async fn read_body(response: reqwest::Response) -> Result<String, SupabaseError> {
        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(60);
            return Err(SupabaseError::RateLimited(retry_after));
        }

        let body = response.text().await?;

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(SupabaseError::Unauthorized(extract_error_message(&body)));
        }

        if !status.is_success() {
            return Err(SupabaseError::Api {
                status: status.as_u16(),
                message: extract_error_message(&body),
            });
        }

        Ok(body)
    }

    /// Parse a JSON body into `T`.
    fn parse_json<T: serde::de::DeserializeOwned>(body: &str) -> Result<T, SupabaseError> {
        serde_json::from_str(body)
            .map_err(|e| SupabaseError::Parse(format!("failed to parse response: {e}")))
    }
}

/// Pull a human-readable message out of a platform error body.
///
/// GoTrue uses `error_description`/`msg`, PostgREST uses `message`; fall
/// back to the raw body (truncated) when neither is present.
fn extract_error_message(body: &str) -> String {
    #[derive(serde::Deserialize)]
    struct ErrorBody {
        message: Option<String>,
        error_description: Option<String>,
        msg: Option<String>,
    }

    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|e| e.message.or(e.error_description).or(e.msg))
        .unwrap_or_else(|| body.chars().take(200).collect())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::SecretString;

    use super::*;

    fn client() -> SupabaseClient {
        SupabaseClient::new(&SupabaseConfig {
            url: "https://project.supabase.co/".to_owned(),
            anon_key: SecretString::from("anon-key"),
            service_key: None,
        })
    }

    #[test]
    fn test_urls_strip_trailing_slash() {
        let client = client();
        assert_eq!(
            client.auth_url("token"),
            "https://project.supabase.co/auth/v1/token"
        );
        assert_eq!(
            client.rest_url("todos"),
            "https://project.supabase.co/rest/v1/todos"
        );
    }

    #[test]
    fn test_extract_error_message_variants() {
        assert_eq!(
            extract_error_message(r#"{"message":"row not found"}"#),
            "row not found"
        );
        assert_eq!(
            extract_error_message(r#"{"error":"x","error_description":"bad creds"}"#),
            "bad creds"
        );
        assert_eq!(
            extract_error_message(r#"{"msg":"signup disabled"}"#),
            "signup disabled"
        );
        assert_eq!(extract_error_message("plain text"), "plain text");
    }

    #[test]
    fn test_client_is_clone_send_sync() {
        fn assert_clone<T: Clone + Send + Sync>() {}
        assert_clone::<SupabaseClient>();
    }
}
