//! `todos` table: the authenticated task backend.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::instrument;

use utility_hub_core::{TaskId, UserId};

use crate::models::Task;

use super::{SupabaseClient, SupabaseError};

/// Wire shape of a `todos` row.
#[derive(Debug, Clone, Deserialize)]
pub struct TodoRow {
    id: TaskId,
    task: String,
    is_completed: bool,
    due_date: NaiveDate,
    created_at: DateTime<Utc>,
}

impl From<TodoRow> for Task {
    fn from(row: TodoRow) -> Self {
        Self {
            id: row.id,
            text: row.task,
            completed: row.is_completed,
            created_at: row.created_at,
            due_date: row.due_date,
        }
    }
}

/// Insert shape for a new `todos` row.
#[derive(Debug, Serialize)]
struct NewTodoRow<'a> {
    user_id: UserId,
    task: &'a str,
    is_completed: bool,
    due_date: NaiveDate,
}

impl SupabaseClient {
    /// Fetch the user's full task list, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform call fails.
    #[instrument(skip(self, access_token), fields(user_id = %user_id))]
    pub async fn list_todos(
        &self,
        access_token: &str,
        user_id: UserId,
    ) -> Result<Vec<Task>, SupabaseError> {
        let url = format!(
            "{}?user_id=eq.{}&select=id,task,is_completed,due_date,created_at&order=created_at.desc",
            self.rest_url("todos"),
            user_id
        );
        let response = self
            .request(reqwest::Method::GET, url, access_token)
            .send()
            .await?;

        let body = Self::read_body(response).await?;
        let rows: Vec<TodoRow> = Self::parse_json(&body)?;
        Ok(rows.into_iter().map(Task::from).collect())
    }

    /// Insert one task per due date, all sharing the same text.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform call fails; nothing is inserted in
    /// that case (single request, single transaction on the platform side).
    #[instrument(skip(self, access_token, text), fields(user_id = %user_id, dates = dates.len()))]
    pub async fn insert_todos(
        &self,
        access_token: &str,
        user_id: UserId,
        text: &str,
        dates: &[NaiveDate],
    ) -> Result<Vec<Task>, SupabaseError> {
        let rows: Vec<NewTodoRow<'_>> = dates
            .iter()
            .map(|&due_date| NewTodoRow {
                user_id,
                task: text,
                is_completed: false,
                due_date,
            })
            .collect();

        let response = self
            .request(reqwest::Method::POST, self.rest_url("todos"), access_token)
            .header("Prefer", "return=representation")
            .json(&rows)
            .send()
            .await?;

        let body = Self::read_body(response).await?;
        let created: Vec<TodoRow> = Self::parse_json(&body)?;
        Ok(created.into_iter().map(Task::from).collect())
    }

    /// Set a task's completion flag.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform call fails.
    #[instrument(skip(self, access_token), fields(task_id = %task_id))]
    pub async fn set_todo_completed(
        &self,
        access_token: &str,
        task_id: TaskId,
        completed: bool,
    ) -> Result<(), SupabaseError> {
        let url = format!("{}?id=eq.{}", self.rest_url("todos"), task_id);
        let response = self
            .request(reqwest::Method::PATCH, url, access_token)
            .json(&json!({ "is_completed": completed }))
            .send()
            .await?;

        Self::read_body(response).await?;
        Ok(())
    }

    /// Delete a task.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform call fails.
    #[instrument(skip(self, access_token), fields(task_id = %task_id))]
    pub async fn delete_todo(
        &self,
        access_token: &str,
        task_id: TaskId,
    ) -> Result<(), SupabaseError> {
        let url = format!("{}?id=eq.{}", self.rest_url("todos"), task_id);
        let response = self
            .request(reqwest::Method::DELETE, url, access_token)
            .send()
            .await?;

        Self::read_body(response).await?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_todo_row_converts_to_task() {
        let body = format!(
            r#"{{
                "id": "{}",
                "task": "water the plants",
                "is_completed": false,
                "due_date": "2026-08-07",
                "created_at": "2026-08-01T09:30:00Z"
            }}"#,
            uuid::Uuid::new_v4()
        );
        let row: TodoRow = serde_json::from_str(&body).unwrap();
        let task = Task::from(row);
        assert_eq!(task.text, "water the plants");
        assert!(!task.completed);
        assert_eq!(
            task.due_date,
            NaiveDate::from_ymd_opt(2026, 8, 7).unwrap()
        );
    }
}
