//! Payment return points.
//!
//! The gateway sends the customer back with query parameters. The success
//! path confirms the payment (best-effort) and flips the profile plan under
//! a 5-second budget; neither failure blocks the user from landing on the
//! success page, which is the lenient behavior the product shipped with.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Query, State};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::warn;

use utility_hub_core::Plan;

use crate::middleware::{OptionalUser, set_current_user};
use crate::state::AppState;
use crate::timeout::{Bounded, PLAN_UPDATE_BUDGET, bounded};
use crate::toss::{FailParams, SuccessParams};

/// Success-return query, tolerant of missing parameters (direct visits).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuccessQuery {
    payment_key: Option<String>,
    order_id: Option<String>,
    amount: Option<i64>,
}

impl SuccessQuery {
    fn into_params(self) -> Option<SuccessParams> {
        Some(SuccessParams {
            payment_key: self.payment_key?,
            order_id: self.order_id?,
            amount: self.amount?,
        })
    }
}

/// Success page template.
#[derive(Template, WebTemplate)]
#[template(path = "payment_success.html")]
pub struct PaymentSuccessTemplate {
    pub plan_updated: bool,
}

/// Failure page template.
#[derive(Template, WebTemplate)]
#[template(path = "payment_fail.html")]
pub struct PaymentFailTemplate {
    pub code: String,
    pub message: String,
}

/// Handle the gateway's success return.
pub async fn success(
    State(state): State<AppState>,
    session: Session,
    OptionalUser(user): OptionalUser,
    Query(query): Query<SuccessQuery>,
) -> PaymentSuccessTemplate {
    // Confirm with the gateway when the return carries the full parameters.
    if let Some(params) = query.into_params() {
        if let Err(e) = state.toss().confirm(&params).await {
            warn!(error = %e, "payment confirmation failed");
        }
    }

    let Some(user) = user else {
        return PaymentSuccessTemplate {
            plan_updated: false,
        };
    };

    // Plan flip under its budget; timeout is a soft failure.
    let outcome = bounded(
        PLAN_UPDATE_BUDGET,
        state
            .supabase()
            .upgrade_plan_to_pro(&user.access_token, user.id),
    )
    .await;

    let plan_updated = match outcome {
        Bounded::Completed(Ok(())) => {
            let upgraded = crate::models::CurrentUser {
                plan: Plan::Pro,
                ..user
            };
            if let Err(e) = set_current_user(&session, &upgraded).await {
                tracing::error!(error = %e, "failed to store upgraded session");
            }
            true
        }
        Bounded::Completed(Err(e)) => {
            warn!(error = %e, "plan update failed");
            false
        }
        Bounded::TimedOut => {
            warn!("plan update timed out");
            false
        }
    };

    PaymentSuccessTemplate { plan_updated }
}

/// Handle the gateway's failure return.
pub async fn fail(Query(params): Query<FailParams>) -> PaymentFailTemplate {
    PaymentFailTemplate {
        code: params.code.unwrap_or_else(|| "UNKNOWN".to_owned()),
        message: params
            .message
            .unwrap_or_else(|| "The payment was not completed.".to_owned()),
    }
}
