//! Training task store

use std::sync::Arc;

use chrono::NaiveDate;
use tokio::sync::watch;
use tracing::{debug, info};

use super::state::{StoreCore, StoreState};
use super::{BestEffort, StoreError, StoreResult};
use crate::api::{ApiError, RecoveryApi};
use crate::dates::{local_today, today_filter};
use crate::filter::Filter;
use crate::i18n::{Locale, Operation};
use crate::models::{Ack, NewTask, Task, TaskCompletion, TaskUpdate};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskState {
    /// Result of the most recent task fetch, in server order
    pub items: Vec<Task>,
    pub loading: bool,
    pub error: Option<String>,
}

impl StoreState for TaskState {
    fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    fn set_error(&mut self, error: Option<String>) {
        self.error = error;
    }
}

pub struct TaskStore {
    core: StoreCore<TaskState>,
}

impl TaskStore {
    pub fn new(api: Arc<dyn RecoveryApi>, locale: Locale) -> Self {
        Self {
            core: StoreCore::new(api, locale),
        }
    }

    pub fn snapshot(&self) -> TaskState {
        self.core.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<TaskState> {
        self.core.subscribe()
    }

    /// Replace the task list with the server's answer for `filter`
    pub async fn fetch_tasks(&self, filter: &Filter) -> StoreResult<Vec<Task>> {
        let _loading = self.core.loading();
        let result = self.core.api.list_tasks(filter).await;
        let tasks = self.core.settle(Operation::FetchTasks, result)?;

        debug!("Fetched {} tasks for {}", tasks.len(), filter);
        self.core.modify(|s| {
            s.items = tasks.clone();
            s.error = None;
        });
        Ok(tasks)
    }

    /// Load one task with its completions; the task list is not touched
    pub async fn get_task(&self, id: i64) -> StoreResult<Task> {
        let result = self.core.api.get_task(id).await;
        self.core.settle(Operation::GetTask, result)
    }

    /// Create a task, then refresh the tasks of its cycle
    pub async fn create_task(&self, task: &NewTask) -> StoreResult<Ack> {
        let _loading = self.core.loading();
        let result = async {
            let ack = self.core.api.create_task(task).await?;
            info!("Created task {:?} in cycle {}", ack.id, task.cycle_id);
            self.refresh(Filter::for_cycle(task.cycle_id)).await?;
            Ok::<_, ApiError>(ack)
        }
        .await;
        self.core.settle(Operation::CreateTask, result)
    }

    /// Update a task, then refresh by the update's `cycle_id`
    ///
    /// Without a `cycle_id` in the update the refresh is unfiltered.
    pub async fn update_task(&self, id: i64, update: &TaskUpdate) -> StoreResult<Ack> {
        let _loading = self.core.loading();
        let result = async {
            let ack = self.core.api.update_task(id, update).await?;
            info!("Updated task {}", id);
            self.refresh(Filter::for_optional_cycle(update.cycle_id))
                .await?;
            Ok::<_, ApiError>(ack)
        }
        .await;
        self.core.settle(Operation::UpdateTask, result)
    }

    /// Mark a task completed on the server
    ///
    /// The refresh scope comes from the cached task list. When the task is
    /// not cached (e.g. the list was last fetched for another cycle) or its
    /// cycle id is 0, no refresh happens and the list stays stale.
    pub async fn complete_task(&self, id: i64, completion: &TaskCompletion) -> StoreResult<Ack> {
        let _loading = self.core.loading();
        let result = async {
            let ack = self.core.api.complete_task(id, completion).await?;
            info!("Completed task {} (completion {:?})", id, ack.completion_id);

            let cycle_id = self
                .core
                .read(|s| s.items.iter().find(|t| t.id == id).map(|t| t.cycle_id))
                .filter(|&cycle_id| cycle_id != 0);
            match cycle_id {
                Some(cycle_id) => {
                    self.refresh(Filter::for_cycle(cycle_id)).await?;
                }
                None => debug!("Task {} is not in the cached list; not refreshing", id),
            }
            Ok::<_, ApiError>(ack)
        }
        .await;
        self.core.settle(Operation::CompleteTask, result)
    }

    /// Tasks scheduled for today in `cycle_id`
    ///
    /// Best-effort: failures are recorded and yield an empty result. Neither
    /// `loading` nor the cached list are touched. Without a cycle no request
    /// is made.
    pub async fn fetch_today_tasks(&self, cycle_id: Option<i64>) -> BestEffort<Vec<Task>> {
        self.fetch_tasks_for_day(cycle_id, local_today()).await
    }

    /// [`fetch_today_tasks`](Self::fetch_today_tasks) for an explicit date
    pub async fn fetch_tasks_for_day(
        &self,
        cycle_id: Option<i64>,
        day: NaiveDate,
    ) -> BestEffort<Vec<Task>> {
        let Some(cycle_id) = cycle_id else {
            return BestEffort::Fetched(Vec::new());
        };

        let result = self.core.api.list_tasks(&today_filter(cycle_id, day)).await;
        self.core.degrade(Operation::FetchTodayTasks, result)
    }

    async fn refresh(&self, filter: Filter) -> Result<Vec<Task>, ApiError> {
        self.fetch_tasks(&filter)
            .await
            .map_err(StoreError::into_api_error)
    }
}
