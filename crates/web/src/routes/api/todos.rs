//! Todo list API.
//!
//! Handlers pick the task store from the auth state: the session list for
//! anonymous visitors, the remote table for signed-in users. Responses carry
//! the affected state; failures come back as transient JSON errors, with the
//! out-of-window rejection flagged separately so the client can show the
//! upgrade prompt instead of a plain error toast.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_sessions::Session;

use utility_hub_core::{Plan, TaskId};

use crate::middleware::OptionalUser;
use crate::models::{CurrentUser, Task, TaskFilter};
use crate::schedule::max_due_date;
use crate::state::AppState;
use crate::tasks::{RemoteTaskStore, SessionTaskStore, TaskError, TaskStore, TodoService};

/// Pick the task store for this request's auth state.
pub fn store_for(
    state: &AppState,
    session: &Session,
    user: Option<&CurrentUser>,
) -> Box<dyn TaskStore> {
    match user {
        Some(user) => Box::new(RemoteTaskStore::new(
            state.supabase().clone(),
            user.access_token.clone(),
            user.id,
        )),
        None => Box::new(SessionTaskStore::new(session.clone())),
    }
}

/// Query parameters for the list endpoint.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Selected day; defaults to today.
    pub date: Option<NaiveDate>,
    /// Status filter; defaults to `all`.
    pub filter: Option<TaskFilter>,
}

/// Body of the add endpoint.
#[derive(Debug, Deserialize)]
pub struct AddBody {
    pub text: String,
    pub dates: Vec<NaiveDate>,
}

/// The todo view returned by list and add.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoView {
    pub date: NaiveDate,
    pub filter: TaskFilter,
    pub max_due_date: NaiveDate,
    pub tasks: Vec<Task>,
    pub active_count: usize,
    pub completed_count: usize,
}

fn view(service: &TodoService, date: NaiveDate, filter: TaskFilter, plan: Plan) -> TodoView {
    let visible: Vec<Task> = service.visible(date, filter).into_iter().cloned().collect();
    let active_count = visible.iter().filter(|t| !t.completed).count();

    TodoView {
        date,
        filter,
        max_due_date: max_due_date(plan, Utc::now().date_naive()),
        completed_count: visible.len() - active_count,
        active_count,
        tasks: visible,
    }
}

/// Turn a task failure into the JSON shape the widget understands.
fn error_response(err: &TaskError) -> Response {
    match err {
        TaskError::Schedule(schedule_err) => {
            let status = if schedule_err.is_upgrade_prompt() {
                StatusCode::FORBIDDEN
            } else {
                StatusCode::UNPROCESSABLE_ENTITY
            };
            (
                status,
                Json(json!({
                    "error": schedule_err.to_string(),
                    "upgradeRequired": schedule_err.is_upgrade_prompt(),
                })),
            )
                .into_response()
        }
        TaskError::NotFound => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "task not found" })),
        )
            .into_response(),
        other => (
            StatusCode::BAD_GATEWAY,
            Json(json!({ "error": other.to_string(), "transient": true })),
        )
            .into_response(),
    }
}

/// List the visible tasks for a day and status filter.
pub async fn list(
    State(state): State<AppState>,
    session: Session,
    OptionalUser(user): OptionalUser,
    Query(query): Query<ListQuery>,
) -> Response {
    let date = query.date.unwrap_or_else(|| Utc::now().date_naive());
    let filter = query.filter.unwrap_or_default();
    let plan = user.as_ref().map_or(Plan::Free, |u| u.plan);

    match TodoService::load(store_for(&state, &session, user.as_ref())).await {
        Ok(service) => Json(view(&service, date, filter, plan)).into_response(),
        Err(e) => error_response(&e),
    }
}

/// Add one task per date. All-or-nothing; the response carries the re-read
/// view for the first requested date.
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    OptionalUser(user): OptionalUser,
    Json(body): Json<AddBody>,
) -> Response {
    let plan = user.as_ref().map_or(Plan::Free, |u| u.plan);
    let today = Utc::now().date_naive();

    let mut service = match TodoService::load(store_for(&state, &session, user.as_ref())).await {
        Ok(service) => service,
        Err(e) => return error_response(&e),
    };

    if let Err(e) = service
        .add(&body.text, &body.dates, plan, today, Utc::now())
        .await
    {
        return error_response(&e);
    }

    let date = body.dates.first().copied().unwrap_or(today);
    (
        StatusCode::CREATED,
        Json(view(&service, date, TaskFilter::All, plan)),
    )
        .into_response()
}

/// Toggle a task's completion. Applied optimistically; a failed remote write
/// is rolled back before the error response is produced, so the reported
/// state always matches the store's view.
pub async fn toggle(
    State(state): State<AppState>,
    session: Session,
    OptionalUser(user): OptionalUser,
    Path(id): Path<TaskId>,
) -> Response {
    let mut service = match TodoService::load(store_for(&state, &session, user.as_ref())).await {
        Ok(service) => service,
        Err(e) => return error_response(&e),
    };

    match service.toggle(id).await {
        Ok(task) => Json(json!({ "task": task })).into_response(),
        Err(e) => error_response(&e),
    }
}

/// Delete a task.
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    OptionalUser(user): OptionalUser,
    Path(id): Path<TaskId>,
) -> Response {
    let mut service = match TodoService::load(store_for(&state, &session, user.as_ref())).await {
        Ok(service) => service,
        Err(e) => return error_response(&e),
    };

    match service.delete(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(&e),
    }
}
