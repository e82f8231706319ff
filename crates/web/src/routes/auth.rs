//! Authentication route handlers.
//!
//! Sign-in and sign-up delegate entirely to the hosted auth service; on
//! success the granted tokens land in the session together with a plan read
//! under its 3-second budget. Sign-up signs the new account straight in.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use chrono::Utc;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::warn;

use utility_hub_core::{Email, Plan};

use crate::error::{clear_sentry_user, set_sentry_user};
use crate::middleware::{clear_current_user, set_current_user};
use crate::models::{CurrentUser, session_keys};
use crate::state::AppState;
use crate::supabase::AuthSession;
use crate::timeout::{PLAN_LOOKUP_BUDGET, bounded};

// =============================================================================
// Form and Query Types
// =============================================================================

/// Credentials form, shared by sign-in and sign-up.
#[derive(Debug, Deserialize)]
pub struct CredentialsForm {
    pub email: String,
    pub password: String,
}

/// Query parameters for error display.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
}

// =============================================================================
// Templates
// =============================================================================

/// Sign-in / sign-up page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth.html")]
pub struct AuthTemplate {
    pub error: Option<String>,
}

/// Map an error code from the query string to display text.
fn error_text(code: &str) -> String {
    match code {
        "credentials" => "Invalid email or password.".to_owned(),
        "invalid_email" => "That email address does not look right.".to_owned(),
        "signup_failed" => "Could not create the account. The address may already be taken.".to_owned(),
        "session" => "Session expired, please try again.".to_owned(),
        other => other.to_owned(),
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the combined sign-in / sign-up page.
pub async fn auth_page(Query(query): Query<MessageQuery>) -> impl IntoResponse {
    AuthTemplate {
        error: query.error.as_deref().map(error_text),
    }
}

/// Handle sign-in form submission.
pub async fn sign_in(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<CredentialsForm>,
) -> Response {
    let Ok(email) = Email::parse(form.email.trim()) else {
        return Redirect::to("/auth?error=invalid_email").into_response();
    };

    match state.supabase().sign_in(&email, &form.password).await {
        Ok(granted) => establish_session(&state, &session, granted).await,
        Err(e) => {
            warn!(error = %e, "sign-in failed");
            Redirect::to("/auth?error=credentials").into_response()
        }
    }
}

/// Handle sign-up form submission. A successful sign-up is signed in
/// immediately; there is no confirmation round-trip.
pub async fn sign_up(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<CredentialsForm>,
) -> Response {
    let Ok(email) = Email::parse(form.email.trim()) else {
        return Redirect::to("/auth?error=invalid_email").into_response();
    };

    match state.supabase().sign_up(&email, &form.password).await {
        Ok(granted) => establish_session(&state, &session, granted).await,
        Err(e) => {
            warn!(error = %e, "sign-up failed");
            Redirect::to("/auth?error=signup_failed").into_response()
        }
    }
}

/// Handle sign-out: best-effort remote revoke, then a full session flush.
pub async fn sign_out(State(state): State<AppState>, session: Session) -> Response {
    if let Ok(Some(user)) = session
        .get::<CurrentUser>(session_keys::CURRENT_USER)
        .await
    {
        if let Err(e) = state.supabase().sign_out(&user.access_token).await {
            warn!(error = %e, "remote sign-out failed");
        }
    }

    clear_sentry_user();

    if let Err(e) = clear_current_user(&session).await {
        tracing::error!(error = %e, "failed to clear session user");
    }
    if let Err(e) = session.flush().await {
        tracing::error!(error = %e, "failed to flush session");
    }

    Redirect::to("/").into_response()
}

/// Store a granted auth session plus the plan read under its budget.
async fn establish_session(
    state: &AppState,
    session: &Session,
    granted: AuthSession,
) -> Response {
    let now = Utc::now();

    // Bounded plan read; timeout or error resolves to the free tier.
    let plan = bounded(
        PLAN_LOOKUP_BUDGET,
        state
            .supabase()
            .fetch_plan(&granted.access_token, granted.user.id),
    )
    .await
    .into_option()
    .map_or(Plan::Free, |result| {
        result.unwrap_or_else(|e| {
            warn!(error = %e, "plan lookup failed, defaulting to free");
            Plan::Free
        })
    });

    let user = CurrentUser {
        id: granted.user.id,
        email: granted.user.email.clone(),
        plan,
        expires_at: granted.expires_at(now),
        access_token: granted.access_token,
        refresh_token: granted.refresh_token,
    };

    if let Err(e) = set_current_user(session, &user).await {
        tracing::error!(error = %e, "failed to store session");
        return Redirect::to("/auth?error=session").into_response();
    }

    set_sentry_user(&user.id, Some(user.email.as_str()));

    Redirect::to("/").into_response()
}
