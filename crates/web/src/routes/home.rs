//! Hub page: the tool grid plus the server-rendered todo view.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Query, State};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::warn;

use utility_hub_core::Plan;

use crate::middleware::OptionalUser;
use crate::models::TaskFilter;
use crate::schedule::max_due_date;
use crate::state::AppState;
use crate::tasks::TodoService;
use crate::units::Category;

use super::api::todos::store_for;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Query parameters for the todo view.
#[derive(Debug, Deserialize)]
pub struct HomeQuery {
    /// Selected day (`YYYY-MM-DD`); defaults to today.
    pub date: Option<String>,
    /// Status filter; defaults to `all`.
    pub filter: Option<TaskFilter>,
}

/// One todo row, preformatted for the template.
pub struct TaskRow {
    pub id: String,
    pub text: String,
    pub completed: bool,
    pub due_date: String,
}

/// A converter select option.
pub struct UnitOption {
    pub value: &'static str,
    pub label: &'static str,
}

/// Hub page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub signed_in: bool,
    pub email: String,
    pub plan_label: String,
    pub plan_is_free: bool,
    pub today: String,
    pub selected_date: String,
    pub max_due_date: String,
    pub tasks: Vec<TaskRow>,
    pub active_count: usize,
    pub completed_count: usize,
    pub length_units: Vec<UnitOption>,
    pub weight_units: Vec<UnitOption>,
    pub temperature_units: Vec<UnitOption>,
}

/// Display the hub page.
pub async fn home(
    State(state): State<AppState>,
    session: Session,
    OptionalUser(user): OptionalUser,
    Query(query): Query<HomeQuery>,
) -> HomeTemplate {
    let today = Utc::now().date_naive();
    let selected = query
        .date
        .as_deref()
        .and_then(|raw| NaiveDate::parse_from_str(raw, DATE_FORMAT).ok())
        .unwrap_or(today);
    let filter = query.filter.unwrap_or_default();
    let plan = user.as_ref().map_or(Plan::Free, |u| u.plan);

    // A failed load renders an empty list; the todo API surfaces the error
    // when the visitor interacts with the widget.
    let visible: Vec<TaskRow> = match TodoService::load(store_for(&state, &session, user.as_ref()))
        .await
    {
        Ok(service) => service
            .visible(selected, filter)
            .into_iter()
            .map(|task| TaskRow {
                id: task.id.to_string(),
                text: task.text.clone(),
                completed: task.completed,
                due_date: task.due_date.format(DATE_FORMAT).to_string(),
            })
            .collect(),
        Err(e) => {
            warn!(error = %e, "failed to load tasks for home page");
            Vec::new()
        }
    };

    let active_count = visible.iter().filter(|t| !t.completed).count();
    let completed_count = visible.len() - active_count;

    HomeTemplate {
        signed_in: user.is_some(),
        email: user
            .as_ref()
            .map(|u| u.email.as_str().to_owned())
            .unwrap_or_default(),
        plan_label: plan.as_str().to_owned(),
        plan_is_free: !plan.is_pro(),
        today: today.format(DATE_FORMAT).to_string(),
        selected_date: selected.format(DATE_FORMAT).to_string(),
        max_due_date: max_due_date(plan, today).format(DATE_FORMAT).to_string(),
        tasks: visible,
        active_count,
        completed_count,
        length_units: unit_options(Category::Length),
        weight_units: unit_options(Category::Weight),
        temperature_units: unit_options(Category::Temperature),
    }
}

fn unit_options(category: Category) -> Vec<UnitOption> {
    category
        .units()
        .iter()
        .map(|unit| UnitOption {
            value: unit.as_str(),
            label: unit.label(),
        })
        .collect()
}
