//! Task storage strategies and the todo service.
//!
//! Tasks live in exactly one of two places, switched wholesale on auth
//! state: the visitor's session (anonymous) or the platform's `todos` table
//! (signed in). Both sit behind the [`TaskStore`] trait so the service and
//! routes never branch on where the data is.
//!
//! Mutations follow the product's reconciliation rules: adds are
//! write-through followed by a re-read, while toggle and delete apply
//! optimistically to the loaded set and revert the one affected item when
//! the store reports failure.

mod local;
mod remote;

pub use local::SessionTaskStore;
pub use remote::RemoteTaskStore;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use thiserror::Error;

use utility_hub_core::{Plan, TaskId};

use crate::models::{Task, TaskFilter};
use crate::schedule::{self, ScheduleError};

/// Task storage failures.
#[derive(Debug, Error)]
pub enum TaskError {
    /// Reading the stored list failed.
    #[error("could not load tasks: {0}")]
    Load(String),
    /// Writing a change failed. Optimistic changes are reverted.
    #[error("could not save tasks: {0}")]
    Store(String),
    /// The task is not in the loaded set.
    #[error("task not found")]
    NotFound,
    /// The batch failed plan-window validation.
    #[error(transparent)]
    Schedule(#[from] ScheduleError),
}

/// A task storage backend.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Load the full task list, newest first.
    async fn load(&self) -> Result<Vec<Task>, TaskError>;

    /// Create one task per date, all sharing `text`. All-or-nothing.
    async fn add_batch(
        &self,
        text: &str,
        dates: &[NaiveDate],
        now: DateTime<Utc>,
    ) -> Result<(), TaskError>;

    /// Persist a task's completion flag.
    async fn set_completed(&self, id: TaskId, completed: bool) -> Result<(), TaskError>;

    /// Remove a task.
    async fn delete(&self, id: TaskId) -> Result<(), TaskError>;
}

/// Captured pre-state of an optimistic toggle.
struct ToggleCommand {
    index: usize,
    previous: bool,
}

impl ToggleCommand {
    fn apply(tasks: &mut [Task], index: usize) -> Option<Self> {
        let task = tasks.get_mut(index)?;
        let previous = task.completed;
        task.completed = !previous;
        Some(Self { index, previous })
    }

    fn revert(self, tasks: &mut [Task]) {
        if let Some(task) = tasks.get_mut(self.index) {
            task.completed = self.previous;
        }
    }
}

/// Captured pre-state of an optimistic delete.
struct DeleteCommand {
    index: usize,
    removed: Task,
}

impl DeleteCommand {
    fn apply(tasks: &mut Vec<Task>, index: usize) -> Self {
        let removed = tasks.remove(index);
        Self { index, removed }
    }

    fn revert(self, tasks: &mut Vec<Task>) {
        let index = self.index.min(tasks.len());
        tasks.insert(index, self.removed);
    }
}

/// The loaded task set plus the store behind it.
pub struct TodoService {
    store: Box<dyn TaskStore>,
    tasks: Vec<Task>,
}

impl TodoService {
    /// Load the task list from `store`.
    ///
    /// # Errors
    ///
    /// Returns an error if the initial read fails.
    pub async fn load(store: Box<dyn TaskStore>) -> Result<Self, TaskError> {
        let tasks = store.load().await?;
        Ok(Self { store, tasks })
    }

    /// The loaded set.
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// The visible subset for one day and status filter. A pure predicate
    /// over the loaded set; switching days never refetches.
    #[must_use]
    pub fn visible(&self, day: NaiveDate, filter: TaskFilter) -> Vec<&Task> {
        self.tasks
            .iter()
            .filter(|task| task.due_date == day && filter.matches(task))
            .collect()
    }

    /// Add `text` on every date in `dates`, gated by `plan`.
    ///
    /// Validation is all-or-nothing; on success the list is re-read from the
    /// store rather than merged optimistically.
    ///
    /// # Errors
    ///
    /// Returns [`TaskError::Schedule`] when validation rejects the batch and
    /// [`TaskError::Store`] when the write fails. Neither adds any task.
    pub async fn add(
        &mut self,
        text: &str,
        dates: &[NaiveDate],
        plan: Plan,
        today: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<(), TaskError> {
        schedule::validate_batch(text, dates, plan, today)?;

        let text = text.trim();
        self.store.add_batch(text, dates, now).await?;
        self.tasks = self.store.load().await?;
        Ok(())
    }

    /// Flip a task's completion, optimistically.
    ///
    /// # Errors
    ///
    /// Returns [`TaskError::NotFound`] for an unknown id. On a store
    /// failure the flip is reverted and the error returned; the displayed
    /// state ends up exactly as before the call.
    pub async fn toggle(&mut self, id: TaskId) -> Result<&Task, TaskError> {
        let index = self.index_of(id).ok_or(TaskError::NotFound)?;
        let command = ToggleCommand::apply(&mut self.tasks, index).ok_or(TaskError::NotFound)?;
        let completed = !command.previous;

        if let Err(e) = self.store.set_completed(id, completed).await {
            command.revert(&mut self.tasks);
            return Err(e);
        }

        self.tasks.get(index).ok_or(TaskError::NotFound)
    }

    /// Delete a task, optimistically.
    ///
    /// # Errors
    ///
    /// Returns [`TaskError::NotFound`] for an unknown id. On a store
    /// failure the task is restored at its previous position.
    pub async fn delete(&mut self, id: TaskId) -> Result<(), TaskError> {
        let index = self.index_of(id).ok_or(TaskError::NotFound)?;
        let command = DeleteCommand::apply(&mut self.tasks, index);

        if let Err(e) = self.store.delete(id).await {
            command.revert(&mut self.tasks);
            return Err(e);
        }

        Ok(())
    }

    fn index_of(&self, id: TaskId) -> Option<usize> {
        self.tasks.iter().position(|task| task.id == id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};

    use super::*;

    /// In-memory store whose writes can be made to fail.
    #[derive(Default)]
    struct FlakyStore {
        tasks: std::sync::Mutex<Vec<Task>>,
        fail_writes: AtomicBool,
    }

    impl FlakyStore {
        fn failing(self) -> Self {
            self.fail_writes.store(true, Ordering::SeqCst);
            self
        }

        fn seeded(tasks: Vec<Task>) -> Self {
            Self {
                tasks: std::sync::Mutex::new(tasks),
                fail_writes: AtomicBool::new(false),
            }
        }

        fn check(&self) -> Result<(), TaskError> {
            if self.fail_writes.load(Ordering::SeqCst) {
                Err(TaskError::Store("injected failure".to_owned()))
            } else {
                Ok(())
            }
        }
    }

    #[async_trait]
    impl TaskStore for FlakyStore {
        async fn load(&self) -> Result<Vec<Task>, TaskError> {
            Ok(self.tasks.lock().unwrap().clone())
        }

        async fn add_batch(
            &self,
            text: &str,
            dates: &[NaiveDate],
            now: DateTime<Utc>,
        ) -> Result<(), TaskError> {
            self.check()?;
            let mut tasks = self.tasks.lock().unwrap();
            for &date in dates {
                tasks.insert(0, Task::new(text, date, now));
            }
            Ok(())
        }

        async fn set_completed(&self, id: TaskId, completed: bool) -> Result<(), TaskError> {
            self.check()?;
            let mut tasks = self.tasks.lock().unwrap();
            let task = tasks
                .iter_mut()
                .find(|t| t.id == id)
                .ok_or(TaskError::NotFound)?;
            task.completed = completed;
            Ok(())
        }

        async fn delete(&self, id: TaskId) -> Result<(), TaskError> {
            self.check()?;
            let mut tasks = self.tasks.lock().unwrap();
            tasks.retain(|t| t.id != id);
            Ok(())
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn today() -> NaiveDate {
        date(2026, 8, 7)
    }

    async fn service_with(tasks: Vec<Task>) -> TodoService {
        TodoService::load(Box::new(FlakyStore::seeded(tasks)))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_add_batch_creates_one_task_per_date() {
        let mut service = service_with(Vec::new()).await;
        let dates = [today(), date(2026, 8, 8)];
        service
            .add("water the plants", &dates, Plan::Free, today(), Utc::now())
            .await
            .unwrap();
        assert_eq!(service.tasks().len(), 2);
        assert!(service.tasks().iter().all(|t| t.text == "water the plants"));
    }

    #[tokio::test]
    async fn test_add_rejects_whole_batch_on_one_bad_date() {
        let mut service = service_with(Vec::new()).await;
        let dates = [today(), date(2026, 12, 25)];
        let err = service
            .add("holiday prep", &dates, Plan::Free, today(), Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            TaskError::Schedule(ScheduleError::OutOfWindow { .. })
        ));
        assert!(service.tasks().is_empty());
    }

    #[tokio::test]
    async fn test_add_within_pro_window() {
        let mut service = service_with(Vec::new()).await;
        let dates = [date(2026, 10, 15)];
        service
            .add("quarterly report", &dates, Plan::Pro, today(), Utc::now())
            .await
            .unwrap();
        assert_eq!(service.tasks().len(), 1);
    }

    #[tokio::test]
    async fn test_toggle_round_trip() {
        let task = Task::new("write tests", today(), Utc::now());
        let id = task.id;
        let mut service = service_with(vec![task]).await;

        let toggled = service.toggle(id).await.unwrap();
        assert!(toggled.completed);
        let toggled = service.toggle(id).await.unwrap();
        assert!(!toggled.completed);
    }

    #[tokio::test]
    async fn test_toggle_rolls_back_on_store_failure() {
        let task = Task::new("write tests", today(), Utc::now());
        let id = task.id;
        let mut service = TodoService::load(Box::new(
            FlakyStore::seeded(vec![task]).failing(),
        ))
        .await
        .unwrap();

        let err = service.toggle(id).await.unwrap_err();
        assert!(matches!(err, TaskError::Store(_)));
        // Displayed state is exactly as before the toggle.
        assert!(!service.tasks()[0].completed);
    }

    #[tokio::test]
    async fn test_delete_restores_position_on_store_failure() {
        let first = Task::new("first", today(), Utc::now());
        let second = Task::new("second", today(), Utc::now());
        let second_id = second.id;
        let mut service = TodoService::load(Box::new(
            FlakyStore::seeded(vec![first, second]).failing(),
        ))
        .await
        .unwrap();

        assert!(service.delete(second_id).await.is_err());
        assert_eq!(service.tasks().len(), 2);
        assert_eq!(service.tasks()[1].id, second_id);
    }

    #[tokio::test]
    async fn test_visible_filters_by_day_and_status() {
        let mut done = Task::new("done today", today(), Utc::now());
        done.completed = true;
        let open = Task::new("open today", today(), Utc::now());
        let tomorrow = Task::new("tomorrow", date(2026, 8, 8), Utc::now());
        let service = service_with(vec![done.clone(), open.clone(), tomorrow]).await;

        assert_eq!(service.visible(today(), TaskFilter::All).len(), 2);
        assert_eq!(
            service.visible(today(), TaskFilter::Active)[0].id,
            open.id
        );
        assert_eq!(
            service.visible(today(), TaskFilter::Completed)[0].id,
            done.id
        );
        assert_eq!(service.visible(date(2026, 8, 9), TaskFilter::All).len(), 0);
    }

    #[tokio::test]
    async fn test_unknown_id_is_not_found() {
        let mut service = service_with(Vec::new()).await;
        assert!(matches!(
            service.toggle(TaskId::generate()).await,
            Err(TaskError::NotFound)
        ));
        assert!(matches!(
            service.delete(TaskId::generate()).await,
            Err(TaskError::NotFound)
        ));
    }
}
