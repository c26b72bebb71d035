//! Client-side stores
//!
//! Each store owns one in-memory collection mirrored from the backend plus
//! transient `loading` / `error` flags, and keeps that collection consistent
//! after mutations.
//!
//! ## Synchronization rules
//!
//! - Every action raises `loading` on entry and lowers it on every exit path,
//!   including when its future is dropped.
//! - After a successful mutation the affected collection is re-fetched,
//!   scoped by the filter the mutated entity belongs to, and replaced
//!   wholesale. Mutation responses are never merged into the collection.
//! - Failures record the server's message (or a localized fallback) in
//!   `error` and are returned to the caller. Best-effort reads record the
//!   failure and return [`BestEffort::Degraded`] instead.
//! - Only a successful collection fetch clears `error`.
//!
//! ## Usage
//!
//! ```ignore
//! let api: Arc<dyn RecoveryApi> = Arc::new(HttpApiClient::from_config(&config)?);
//! let tasks = TaskStore::new(api.clone(), config.locale);
//!
//! tasks.create_task(&new_task).await?;   // refreshes tasks for new_task.cycle_id
//! let state = tasks.snapshot();
//! ```

mod completion;
mod cycle;
mod exercise;
mod state;
mod task;

#[cfg(test)]
pub(crate) mod testing;

use thiserror::Error;

use crate::api::ApiError;
use crate::i18n::Operation;

pub use completion::{CompletionState, CompletionStore};
pub use cycle::{CycleState, CycleStore};
pub use exercise::{ExerciseState, ExerciseStore};
pub use state::StoreState;
pub use task::{TaskState, TaskStore};

/// A store action that failed and was recorded in the store's `error`
#[derive(Error, Debug)]
#[error("{message}")]
pub struct StoreError {
    /// The action that failed
    pub operation: Operation,
    /// The message recorded in the store
    pub message: String,
    #[source]
    pub source: ApiError,
}

impl StoreError {
    pub fn api_error(&self) -> &ApiError {
        &self.source
    }

    pub fn into_api_error(self) -> ApiError {
        self.source
    }
}

/// Result type for store actions that propagate failures
pub type StoreResult<T> = Result<T, StoreError>;

/// Outcome of a best-effort read
///
/// The failure has already been recorded in the store; callers that only
/// want data can use [`BestEffort::into_value`].
#[derive(Debug, Clone, PartialEq)]
pub enum BestEffort<T> {
    Fetched(T),
    Degraded { message: String },
}

impl<T> BestEffort<T> {
    pub fn is_degraded(&self) -> bool {
        matches!(self, BestEffort::Degraded { .. })
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            BestEffort::Fetched(_) => None,
            BestEffort::Degraded { message } => Some(message),
        }
    }
}

impl<T: Default> BestEffort<T> {
    /// The fetched value, or an empty one when the read degraded
    pub fn into_value(self) -> T {
        match self {
            BestEffort::Fetched(value) => value,
            BestEffort::Degraded { .. } => T::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_best_effort_into_value() {
        let fetched = BestEffort::Fetched(vec![1, 2]);
        assert!(!fetched.is_degraded());
        assert_eq!(fetched.into_value(), vec![1, 2]);

        let degraded: BestEffort<Vec<i32>> = BestEffort::Degraded {
            message: "获取今日任务失败".to_string(),
        };
        assert!(degraded.is_degraded());
        assert_eq!(degraded.message(), Some("获取今日任务失败"));
        assert!(degraded.into_value().is_empty());
    }

    #[test]
    fn test_store_error_displays_recorded_message() {
        let err = StoreError {
            operation: Operation::DeleteCycle,
            message: "康复周期不存在".to_string(),
            source: ApiError::server("/cycles/3", 404, Some("康复周期不存在".to_string())),
        };
        assert_eq!(err.to_string(), "康复周期不存在");
        assert_eq!(err.api_error().status(), Some(404));
    }
}
