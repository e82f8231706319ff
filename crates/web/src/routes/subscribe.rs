//! Subscription checkout handoff.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use rust_decimal::Decimal;

use utility_hub_core::Price;

use crate::error::Result;
use crate::middleware::RequireUser;
use crate::state::AppState;
use crate::toss::{CheckoutRequest, MONTHLY_PRICE_WON, ORDER_NAME, generate_order_id};

/// Checkout summary template.
#[derive(Template, WebTemplate)]
#[template(path = "subscribe.html")]
pub struct SubscribeTemplate {
    pub already_pro: bool,
    pub price_display: String,
}

/// Display the checkout summary.
pub async fn summary(RequireUser(user): RequireUser) -> SubscribeTemplate {
    SubscribeTemplate {
        already_pro: user.plan.is_pro(),
        price_display: Price::new(Decimal::from(MONTHLY_PRICE_WON)).display(),
    }
}

/// Start checkout: redirect to the gateway's hosted page.
///
/// Already-pro users are bounced back to the summary instead of being
/// charged twice.
///
/// # Errors
///
/// Returns an error when the checkout URL cannot be built.
pub async fn start(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
) -> Result<Response> {
    if user.plan.is_pro() {
        return Ok(Redirect::to("/subscribe").into_response());
    }

    let request = CheckoutRequest {
        amount: MONTHLY_PRICE_WON,
        order_id: generate_order_id(),
        order_name: ORDER_NAME.to_owned(),
        customer_name: user.email.local_part().to_owned(),
        customer_email: user.email.as_str().to_owned(),
    };

    let url = state
        .toss()
        .checkout_url(&state.config().base_url, &request)?;

    Ok(Redirect::to(url.as_str()).into_response())
}
