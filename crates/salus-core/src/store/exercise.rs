//! Exercise type store

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{info, warn};

use super::state::{StoreCore, StoreState};
use super::{BestEffort, StoreResult};
use crate::api::RecoveryApi;
use crate::filter::Filter;
use crate::i18n::{Locale, Operation};
use crate::models::{Ack, Exercise, ExerciseUpdate, NewExercise};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExerciseState {
    pub items: Vec<Exercise>,
    pub loading: bool,
    pub error: Option<String>,
}

impl StoreState for ExerciseState {
    fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    fn set_error(&mut self, error: Option<String>) {
        self.error = error;
    }
}

/// The exercise catalog
///
/// Listing is best-effort, so mutations succeed even when the refresh
/// afterwards fails. The refresh failure is still recorded in `error`.
pub struct ExerciseStore {
    core: StoreCore<ExerciseState>,
}

impl ExerciseStore {
    pub fn new(api: Arc<dyn RecoveryApi>, locale: Locale) -> Self {
        Self {
            core: StoreCore::new(api, locale),
        }
    }

    pub fn snapshot(&self) -> ExerciseState {
        self.core.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<ExerciseState> {
        self.core.subscribe()
    }

    /// Replace the catalog with the server's
    ///
    /// On failure the catalog is left as it was.
    pub async fn fetch_exercises(&self, filter: &Filter) -> BestEffort<Vec<Exercise>> {
        let _loading = self.core.loading();
        let result = self.core.api.list_exercises(filter).await;
        let fetched = self.core.degrade(Operation::FetchExercises, result);

        if let BestEffort::Fetched(ref exercises) = fetched {
            self.core.modify(|s| {
                s.items = exercises.clone();
                s.error = None;
            });
        }
        fetched
    }

    pub async fn get_exercise(&self, id: i64) -> StoreResult<Exercise> {
        let result = self.core.api.get_exercise(id).await;
        self.core.settle(Operation::GetExercise, result)
    }

    pub async fn create_exercise(&self, exercise: &NewExercise) -> StoreResult<Ack> {
        let _loading = self.core.loading();
        let result = self.core.api.create_exercise(exercise).await;
        let ack = self.core.settle(Operation::CreateExercise, result)?;

        info!("Created exercise {:?} ({})", ack.id, exercise.name);
        self.refresh().await;
        Ok(ack)
    }

    pub async fn update_exercise(&self, id: i64, update: &ExerciseUpdate) -> StoreResult<Ack> {
        let _loading = self.core.loading();
        let result = self.core.api.update_exercise(id, update).await;
        let ack = self.core.settle(Operation::UpdateExercise, result)?;

        info!("Updated exercise {}", id);
        self.refresh().await;
        Ok(ack)
    }

    pub async fn delete_exercise(&self, id: i64) -> StoreResult<Ack> {
        let _loading = self.core.loading();
        let result = self.core.api.delete_exercise(id).await;
        let ack = self.core.settle(Operation::DeleteExercise, result)?;

        info!("Deleted exercise {}", id);
        self.refresh().await;
        Ok(ack)
    }

    async fn refresh(&self) {
        if let BestEffort::Degraded { message } = self.fetch_exercises(&Filter::new()).await {
            warn!("Exercise list is stale after mutation: {}", message);
        }
    }
}
