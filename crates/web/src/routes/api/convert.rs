//! Unit converter API.

use axum::{Json, extract::Query};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::units::{self, Unit};

/// Query parameters of the convert endpoint.
#[derive(Debug, Deserialize)]
pub struct ConvertQuery {
    pub value: f64,
    pub from: String,
    pub to: String,
}

/// A completed conversion.
#[derive(Debug, Serialize)]
pub struct ConvertView {
    pub value: f64,
    pub from: Unit,
    pub to: Unit,
    /// Rounded to four decimal places.
    pub result: f64,
}

/// Convert a value between two units.
///
/// # Errors
///
/// Returns 400 for unknown units or a cross-category pair.
pub async fn convert(Query(query): Query<ConvertQuery>) -> Result<Json<ConvertView>> {
    let from: Unit = query.from.parse().map_err(AppError::Convert)?;
    let to: Unit = query.to.parse().map_err(AppError::Convert)?;
    let result = units::convert(query.value, from, to)?;

    Ok(Json(ConvertView {
        value: query.value,
        from,
        to,
        result,
    }))
}
