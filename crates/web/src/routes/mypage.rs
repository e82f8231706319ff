//! Profile page.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use tower_sessions::Session;
use tracing::warn;

use utility_hub_core::Plan;

use crate::middleware::{RequireUser, set_current_user};
use crate::state::AppState;
use crate::timeout::{Bounded, PLAN_LOOKUP_BUDGET, bounded};

/// Profile page template.
#[derive(Template, WebTemplate)]
#[template(path = "mypage.html")]
pub struct MyPageTemplate {
    pub email: String,
    pub plan_label: String,
    pub is_pro: bool,
}

/// Display the profile page with a fresh plan read.
///
/// The read runs under the 3-second budget and resolves to the free tier on
/// timeout or error; no error reaches the page.
pub async fn mypage(
    State(state): State<AppState>,
    session: Session,
    RequireUser(user): RequireUser,
) -> MyPageTemplate {
    let plan = match bounded(
        PLAN_LOOKUP_BUDGET,
        state.supabase().fetch_plan(&user.access_token, user.id),
    )
    .await
    {
        Bounded::Completed(Ok(plan)) => plan,
        Bounded::Completed(Err(e)) => {
            warn!(error = %e, "plan lookup failed, defaulting to free");
            Plan::Free
        }
        Bounded::TimedOut => {
            warn!("plan lookup timed out, defaulting to free");
            Plan::Free
        }
    };

    // Keep the session cache in step with what the page shows.
    if plan != user.plan {
        let updated = crate::models::CurrentUser { plan, ..user.clone() };
        if let Err(e) = set_current_user(&session, &updated).await {
            tracing::error!(error = %e, "failed to store refreshed plan");
        }
    }

    MyPageTemplate {
        email: user.email.as_str().to_owned(),
        plan_label: plan.as_str().to_owned(),
        is_pro: plan.is_pro(),
    }
}
