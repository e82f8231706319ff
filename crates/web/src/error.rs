//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server-side errors to
//! Sentry before responding to the client. Route handlers return
//! `Result<T, AppError>`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::claude::ClaudeError;
use crate::schedule::ScheduleError;
use crate::supabase::SupabaseError;
use crate::tasks::TaskError;
use crate::toss::TossError;
use crate::units::ConvertError;

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Hosted data/auth platform failed.
    #[error("platform error: {0}")]
    Supabase(#[from] SupabaseError),

    /// Chat completion failed.
    #[error("chat error: {0}")]
    Claude(#[from] ClaudeError),

    /// Payment gateway failed.
    #[error("payment error: {0}")]
    Toss(#[from] TossError),

    /// A task operation failed.
    #[error("task error: {0}")]
    Task(#[from] TaskError),

    /// A batch of task dates failed validation.
    #[error("schedule error: {0}")]
    Schedule(#[from] ScheduleError),

    /// A unit conversion was rejected.
    #[error("conversion error: {0}")]
    Convert(#[from] ConvertError),

    /// Session storage failed.
    #[error("session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// User is not authenticated.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Supabase(err) => match err {
                SupabaseError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
                SupabaseError::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
                _ => StatusCode::BAD_GATEWAY,
            },
            Self::Claude(_) | Self::Toss(_) => StatusCode::BAD_GATEWAY,
            Self::Task(err) => match err {
                TaskError::NotFound => StatusCode::NOT_FOUND,
                TaskError::Schedule(_) => StatusCode::UNPROCESSABLE_ENTITY,
                _ => StatusCode::BAD_GATEWAY,
            },
            Self::Schedule(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Convert(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Session(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        }
    }

    /// The message shown to the client. Internal details stay server-side.
    fn public_message(&self) -> String {
        match self {
            Self::Supabase(err) => match err {
                SupabaseError::Unauthorized(_) => "Session expired, please sign in again".to_owned(),
                SupabaseError::RateLimited(_) => "Too many requests, please slow down".to_owned(),
                _ => "The data service is unavailable right now".to_owned(),
            },
            Self::Claude(_) => "The assistant is unavailable right now".to_owned(),
            Self::Toss(_) => "The payment service is unavailable right now".to_owned(),
            Self::Task(err) => match err {
                TaskError::NotFound | TaskError::Schedule(_) => err.to_string(),
                _ => "Could not reach the task store, please try again".to_owned(),
            },
            Self::Schedule(err) => err.to_string(),
            Self::Convert(err) => err.to_string(),
            Self::Session(_) | Self::Internal(_) => "Internal server error".to_owned(),
            _ => self.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server-side failures to Sentry
        if matches!(
            self,
            Self::Supabase(_) | Self::Claude(_) | Self::Toss(_) | Self::Session(_) | Self::Internal(_)
        ) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        (self.status(), self.public_message()).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context from a user ID.
///
/// Call this after successful authentication to associate errors with users.
pub fn set_sentry_user(user_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
///
/// Call this on sign-out to stop associating errors with the user.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::NotFound("x".to_owned()).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Unauthorized("x".to_owned()).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::BadRequest("x".to_owned()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Internal("x".to_owned()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::Supabase(SupabaseError::Unauthorized("expired".to_owned())).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::Task(TaskError::NotFound).status(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_schedule_errors_keep_their_message() {
        let err = AppError::Schedule(ScheduleError::EmptyTask);
        assert_eq!(err.public_message(), "enter a task first");
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_platform_details_are_not_leaked() {
        let err = AppError::Supabase(SupabaseError::Api {
            status: 500,
            message: "secret internal detail".to_owned(),
        });
        assert!(!err.public_message().contains("secret internal detail"));
    }
}
