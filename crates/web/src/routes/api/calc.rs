//! Calculator API.
//!
//! The state machine serializes into the session; each request applies one
//! key and returns the updated display.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use crate::calculator::{Calculator, Key};
use crate::error::{AppError, Result};
use crate::models::session_keys;
use crate::state::AppState;

/// Body of the press endpoint.
#[derive(Debug, Deserialize)]
pub struct PressBody {
    /// One key token: a digit, `.`, `+`, `-`, `*`, `/`, `=`, `Enter`,
    /// `Escape`, `c`, `Backspace`, `%`, or `±`.
    pub key: String,
}

/// The machine's visible state.
#[derive(Debug, Serialize)]
pub struct CalcView {
    pub display: String,
    pub expression: String,
}

impl From<&Calculator> for CalcView {
    fn from(calc: &Calculator) -> Self {
        Self {
            display: calc.display().to_owned(),
            expression: calc.expression().to_owned(),
        }
    }
}

async fn load(session: &Session) -> Result<Calculator> {
    Ok(session
        .get::<Calculator>(session_keys::CALCULATOR)
        .await?
        .unwrap_or_default())
}

async fn save(session: &Session, calc: &Calculator) -> Result<()> {
    session.insert(session_keys::CALCULATOR, calc).await?;
    Ok(())
}

/// Apply one key press.
///
/// # Errors
///
/// Returns 400 for an unrecognized key token.
pub async fn press(
    State(_state): State<AppState>,
    session: Session,
    Json(body): Json<PressBody>,
) -> Result<Json<CalcView>> {
    let key = Key::parse(&body.key)
        .ok_or_else(|| AppError::BadRequest(format!("unknown key: {}", body.key)))?;

    let mut calc = load(&session).await?;
    calc.press(key);
    save(&session, &calc).await?;

    Ok(Json(CalcView::from(&calc)))
}

/// Reset the machine.
pub async fn clear(
    State(_state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse> {
    let calc = Calculator::new();
    save(&session, &calc).await?;
    Ok((StatusCode::OK, Json(CalcView::from(&calc))))
}
