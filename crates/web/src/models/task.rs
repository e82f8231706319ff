//! Task model and view filtering.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use utility_hub_core::TaskId;

/// A single dated to-do item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    /// The task text, shared by every task created in one batch.
    pub text: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    /// Day-granularity due date; decides which day's view shows the task.
    pub due_date: NaiveDate,
}

impl Task {
    /// Create a fresh, uncompleted task.
    #[must_use]
    pub fn new(text: impl Into<String>, due_date: NaiveDate, created_at: DateTime<Utc>) -> Self {
        Self {
            id: TaskId::generate(),
            text: text.into(),
            completed: false,
            created_at,
            due_date,
        }
    }
}

/// The status filter applied on top of the selected day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskFilter {
    #[default]
    All,
    Active,
    Completed,
}

impl TaskFilter {
    /// Whether `task` passes this status filter.
    #[must_use]
    pub const fn matches(self, task: &Task) -> bool {
        match self {
            Self::All => true,
            Self::Active => !task.completed,
            Self::Completed => task.completed,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn task(completed: bool) -> Task {
        let mut t = Task::new(
            "write report",
            NaiveDate::from_ymd_opt(2026, 8, 7).unwrap(),
            Utc::now(),
        );
        t.completed = completed;
        t
    }

    #[test]
    fn test_filter_matches() {
        assert!(TaskFilter::All.matches(&task(false)));
        assert!(TaskFilter::All.matches(&task(true)));
        assert!(TaskFilter::Active.matches(&task(false)));
        assert!(!TaskFilter::Active.matches(&task(true)));
        assert!(TaskFilter::Completed.matches(&task(true)));
        assert!(!TaskFilter::Completed.matches(&task(false)));
    }

    #[test]
    fn test_serde_camel_case() {
        let json = serde_json::to_value(task(false)).unwrap();
        assert!(json.get("dueDate").is_some());
        assert!(json.get("createdAt").is_some());
        assert!(json.get("due_date").is_none());
    }
}
