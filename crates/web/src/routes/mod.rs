//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                     - Hub page (tools + todo view)
//! GET  /health               - Health check
//!
//! # Auth
//! GET  /auth                 - Sign-in / sign-up page
//! POST /auth/sign-in         - Sign-in action
//! POST /auth/sign-up         - Sign-up action (auto sign-in)
//! POST /auth/sign-out        - Sign-out action
//!
//! # Subscription
//! GET  /pricing              - Plan comparison (requires auth)
//! GET  /product              - Product catalog
//! GET  /subscribe            - Checkout summary (requires auth)
//! POST /subscribe            - Redirect to hosted checkout
//! GET  /payment/success      - Confirm + plan flip
//! GET  /payment/fail         - Gateway error display
//! GET  /mypage               - Profile page (requires auth)
//!
//! # JSON API
//! GET    /api/todos          - Loaded set filtered by ?date=&filter=
//! POST   /api/todos          - Add a batch {text, dates[]}
//! POST   /api/todos/{id}/toggle - Toggle completion (optimistic)
//! DELETE /api/todos/{id}     - Delete a task (optimistic)
//! POST   /api/calc           - Apply one calculator key {key}
//! POST   /api/calc/clear     - Reset the calculator
//! GET    /api/convert        - ?value=&from=&to=
//! GET    /api/chat/messages  - Recent transcript
//! POST   /api/chat/messages  - Send a message (two-round tool loop)
//! GET    /api/chat/feed      - SSE live feed of transcript inserts
//! ```

pub mod api;
pub mod auth;
pub mod home;
pub mod mypage;
pub mod payment;
pub mod pricing;
pub mod product;
pub mod subscribe;

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Router,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(auth::auth_page))
        .route("/sign-in", post(auth::sign_in))
        .route("/sign-up", post(auth::sign_up))
        .route("/sign-out", post(auth::sign_out))
}

/// Create the subscription/payment routes router.
pub fn subscription_routes() -> Router<AppState> {
    Router::new()
        .route("/pricing", get(pricing::pricing))
        .route("/product", get(product::catalog))
        .route("/subscribe", get(subscribe::summary).post(subscribe::start))
        .route("/payment/success", get(payment::success))
        .route("/payment/fail", get(payment::fail))
        .route("/mypage", get(mypage::mypage))
}

/// Create all routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .nest("/auth", auth_routes())
        .merge(subscription_routes())
        .nest("/api", api::routes())
        .fallback(not_found)
}

/// 404 page template.
#[derive(Template, WebTemplate)]
#[template(path = "not_found.html")]
struct NotFoundTemplate;

/// Catch-all 404 handler.
async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, NotFoundTemplate)
}
