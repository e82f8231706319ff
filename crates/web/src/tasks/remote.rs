//! Authenticated task storage in the platform's `todos` table.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

use utility_hub_core::{TaskId, UserId};

use crate::models::Task;
use crate::supabase::SupabaseClient;

use super::{TaskError, TaskStore};

/// Remote task store bound to one signed-in user.
pub struct RemoteTaskStore {
    client: SupabaseClient,
    access_token: String,
    user_id: UserId,
}

impl RemoteTaskStore {
    /// Bind the platform client to a user's token.
    #[must_use]
    pub const fn new(client: SupabaseClient, access_token: String, user_id: UserId) -> Self {
        Self {
            client,
            access_token,
            user_id,
        }
    }
}

#[async_trait]
impl TaskStore for RemoteTaskStore {
    async fn load(&self) -> Result<Vec<Task>, TaskError> {
        self.client
            .list_todos(&self.access_token, self.user_id)
            .await
            .map_err(|e| TaskError::Load(e.to_string()))
    }

    async fn add_batch(
        &self,
        text: &str,
        dates: &[NaiveDate],
        _now: DateTime<Utc>,
    ) -> Result<(), TaskError> {
        // The platform stamps ids and creation times.
        self.client
            .insert_todos(&self.access_token, self.user_id, text, dates)
            .await
            .map(|_| ())
            .map_err(|e| TaskError::Store(e.to_string()))
    }

    async fn set_completed(&self, id: TaskId, completed: bool) -> Result<(), TaskError> {
        self.client
            .set_todo_completed(&self.access_token, id, completed)
            .await
            .map_err(|e| TaskError::Store(e.to_string()))
    }

    async fn delete(&self, id: TaskId) -> Result<(), TaskError> {
        self.client
            .delete_todo(&self.access_token, id)
            .await
            .map_err(|e| TaskError::Store(e.to_string()))
    }
}
