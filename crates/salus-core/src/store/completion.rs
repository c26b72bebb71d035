//! Completion record store

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info};

use super::state::{StoreCore, StoreState};
use super::{StoreError, StoreResult};
use crate::api::{ApiError, RecoveryApi};
use crate::filter::Filter;
use crate::i18n::{Locale, Operation};
use crate::models::{Ack, Completion, CompletionStats, CompletionUpdate, NewCompletion};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompletionState {
    pub items: Vec<Completion>,
    /// Aggregates from the most recent stats fetch
    pub stats: Option<CompletionStats>,
    pub loading: bool,
    pub error: Option<String>,
}

impl StoreState for CompletionState {
    fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    fn set_error(&mut self, error: Option<String>) {
        self.error = error;
    }
}

/// Completion records and their statistics
pub struct CompletionStore {
    core: StoreCore<CompletionState>,
}

impl CompletionStore {
    pub fn new(api: Arc<dyn RecoveryApi>, locale: Locale) -> Self {
        Self {
            core: StoreCore::new(api, locale),
        }
    }

    pub fn snapshot(&self) -> CompletionState {
        self.core.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<CompletionState> {
        self.core.subscribe()
    }

    /// Replace the record list with the server's answer for `filter`
    ///
    /// Recognized keys are `cycle_id`, `task_id`, `start_date` and
    /// `end_date`.
    pub async fn fetch_completions(&self, filter: &Filter) -> StoreResult<Vec<Completion>> {
        let _loading = self.core.loading();
        let result = self.core.api.list_completions(filter).await;
        let completions = self.core.settle(Operation::FetchCompletions, result)?;

        debug!("Fetched {} completions for {}", completions.len(), filter);
        self.core.modify(|s| {
            s.items = completions.clone();
            s.error = None;
        });
        Ok(completions)
    }

    pub async fn get_completion(&self, id: i64) -> StoreResult<Completion> {
        let result = self.core.api.get_completion(id).await;
        self.core.settle(Operation::GetCompletion, result)
    }

    /// Record a completion, then refresh by its `cycle_id`
    pub async fn create_completion(&self, completion: &NewCompletion) -> StoreResult<Ack> {
        let _loading = self.core.loading();
        let result = async {
            let ack = self.core.api.create_completion(completion).await?;
            info!(
                "Recorded completion {:?} for task {}",
                ack.id, completion.task_id
            );
            self.refresh(Filter::for_optional_cycle(completion.cycle_id))
                .await?;
            Ok::<_, ApiError>(ack)
        }
        .await;
        self.core.settle(Operation::CreateCompletion, result)
    }

    /// Update a completion, then refresh by the update's `cycle_id`
    pub async fn update_completion(
        &self,
        id: i64,
        update: &CompletionUpdate,
    ) -> StoreResult<Ack> {
        let _loading = self.core.loading();
        let result = async {
            let ack = self.core.api.update_completion(id, update).await?;
            info!("Updated completion {}", id);
            self.refresh(Filter::for_optional_cycle(update.cycle_id))
                .await?;
            Ok::<_, ApiError>(ack)
        }
        .await;
        self.core.settle(Operation::UpdateCompletion, result)
    }

    /// Delete a completion
    ///
    /// The list is refreshed for `cycle_id` when one is given; otherwise it
    /// is left as is.
    pub async fn delete_completion(&self, id: i64, cycle_id: Option<i64>) -> StoreResult<Ack> {
        let _loading = self.core.loading();
        let result = async {
            let ack = self.core.api.delete_completion(id).await?;
            info!("Deleted completion {}", id);
            if let Some(cycle_id) = cycle_id {
                self.refresh(Filter::for_cycle(cycle_id)).await?;
            }
            Ok::<_, ApiError>(ack)
        }
        .await;
        self.core.settle(Operation::DeleteCompletion, result)
    }

    /// Load aggregate statistics for `filter` into `stats`
    pub async fn fetch_stats(&self, filter: &Filter) -> StoreResult<CompletionStats> {
        let _loading = self.core.loading();
        let result = self.core.api.completion_stats(filter).await;
        let stats = self.core.settle(Operation::FetchStats, result)?;

        self.core.modify(|s| {
            s.stats = Some(stats.clone());
            s.error = None;
        });
        Ok(stats)
    }

    async fn refresh(&self, filter: Filter) -> Result<Vec<Completion>, ApiError> {
        self.fetch_completions(&filter)
            .await
            .map_err(StoreError::into_api_error)
    }
}
