//! Anonymous task storage inside the visitor's session.
//!
//! The entire list serializes under a single session key, the server-side
//! analog of the original on-device store. It exists only while there is no
//! signed-in user; signing in switches the whole feature to the remote
//! table.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use tower_sessions::Session;

use utility_hub_core::TaskId;

use crate::models::{Task, session_keys};

use super::{TaskError, TaskStore};

/// Session-backed task store for anonymous visitors.
pub struct SessionTaskStore {
    session: Session,
}

impl SessionTaskStore {
    /// Wrap the request's session.
    #[must_use]
    pub const fn new(session: Session) -> Self {
        Self { session }
    }

    async fn read(&self) -> Result<Vec<Task>, TaskError> {
        Ok(self
            .session
            .get::<Vec<Task>>(session_keys::LOCAL_TASKS)
            .await
            .map_err(|e| TaskError::Load(e.to_string()))?
            .unwrap_or_default())
    }

    async fn write(&self, tasks: &[Task]) -> Result<(), TaskError> {
        self.session
            .insert(session_keys::LOCAL_TASKS, tasks)
            .await
            .map_err(|e| TaskError::Store(e.to_string()))
    }
}

#[async_trait]
impl TaskStore for SessionTaskStore {
    async fn load(&self) -> Result<Vec<Task>, TaskError> {
        self.read().await
    }

    async fn add_batch(
        &self,
        text: &str,
        dates: &[NaiveDate],
        now: DateTime<Utc>,
    ) -> Result<(), TaskError> {
        let mut tasks = self.read().await?;
        // Newest first, matching the remote table's ordering.
        for &date in dates.iter().rev() {
            tasks.insert(0, Task::new(text, date, now));
        }
        self.write(&tasks).await
    }

    async fn set_completed(&self, id: TaskId, completed: bool) -> Result<(), TaskError> {
        let mut tasks = self.read().await?;
        let task = tasks
            .iter_mut()
            .find(|task| task.id == id)
            .ok_or(TaskError::NotFound)?;
        task.completed = completed;
        self.write(&tasks).await
    }

    async fn delete(&self, id: TaskId) -> Result<(), TaskError> {
        let mut tasks = self.read().await?;
        let before = tasks.len();
        tasks.retain(|task| task.id != id);
        if tasks.len() == before {
            return Err(TaskError::NotFound);
        }
        self.write(&tasks).await
    }
}
