//! Authentication extractors.
//!
//! The hosted auth service owns the tokens; the session only carries them.
//! Both extractors refresh an expired access token inline through the
//! refresh-token grant. A failed refresh is a forced sign-out: the session
//! is flushed (credential cache purge) and page requests bounce to `/auth`.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use chrono::Utc;
use tower_sessions::Session;

use crate::error::clear_sentry_user;
use crate::models::{CurrentUser, session_keys};
use crate::state::AppState;

/// Extractor that requires a signed-in user.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireUser(user): RequireUser,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", user.email)
/// }
/// ```
pub struct RequireUser(pub CurrentUser);

/// Error returned when authentication is required but absent.
pub enum AuthRejection {
    /// Redirect to the auth page (for HTML requests).
    RedirectToAuth,
    /// Unauthorized response (for API requests).
    Unauthorized,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToAuth => Redirect::to("/auth").into_response(),
            Self::Unauthorized => StatusCode::UNAUTHORIZED.into_response(),
        }
    }
}

impl FromRequestParts<AppState> for RequireUser {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let is_api = parts.uri.path().starts_with("/api/");
        let reject = move || {
            if is_api {
                AuthRejection::Unauthorized
            } else {
                AuthRejection::RedirectToAuth
            }
        };

        let session = parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or(AuthRejection::Unauthorized)?;

        match resolve_user(state, &session).await {
            Some(user) => Ok(Self(user)),
            None => Err(reject()),
        }
    }
}

/// Extractor that optionally gets the current user.
///
/// Unlike `RequireUser`, this does not reject the request when nobody is
/// signed in.
pub struct OptionalUser(pub Option<CurrentUser>);

impl FromRequestParts<AppState> for OptionalUser {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = match parts.extensions.get::<Session>().cloned() {
            Some(session) => resolve_user(state, &session).await,
            None => None,
        };

        Ok(Self(user))
    }
}

/// Load the session user, refreshing the access token when it has expired.
///
/// Returns `None` both for anonymous visitors and for sessions whose
/// refresh token was rejected - the latter after purging the session.
async fn resolve_user(state: &AppState, session: &Session) -> Option<CurrentUser> {
    let user: CurrentUser = session
        .get(session_keys::CURRENT_USER)
        .await
        .ok()
        .flatten()?;

    let now = Utc::now();
    if !user.token_expired(now) {
        return Some(user);
    }

    match state.supabase().refresh_session(&user.refresh_token).await {
        Ok(granted) => {
            let expires_at = granted.expires_at(now);
            let refreshed = CurrentUser {
                access_token: granted.access_token,
                refresh_token: granted.refresh_token,
                expires_at,
                ..user
            };
            if let Err(e) = set_current_user(session, &refreshed).await {
                tracing::error!(error = %e, "failed to store refreshed session");
            }
            Some(refreshed)
        }
        Err(e) => {
            tracing::warn!(error = %e, "token refresh failed, forcing sign-out");
            clear_sentry_user();
            if let Err(e) = session.flush().await {
                tracing::error!(error = %e, "failed to flush session");
            }
            None
        }
    }
}

/// Helper to set the current user in the session.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_user(
    session: &Session,
    user: &CurrentUser,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::CURRENT_USER, user).await
}

/// Helper to clear the current user from the session (sign-out).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_current_user(
    session: &Session,
) -> Result<(), tower_sessions::session::Error> {
    session
        .remove::<CurrentUser>(session_keys::CURRENT_USER)
        .await?;
    Ok(())
}
