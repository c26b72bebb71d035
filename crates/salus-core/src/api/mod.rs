//! REST backend client
//!
//! `RecoveryApi` maps every domain operation to exactly one HTTP call. It
//! does no caching, retrying or validation; stores layer the
//! synchronization rules on top.
//!
//! ## Endpoints
//!
//! - `GET/POST /cycles`, `GET/PUT/DELETE /cycles/{id}`
//! - `GET/POST /tasks`, `GET/PUT /tasks/{id}`, `POST /tasks/{id}/complete`
//! - `GET/POST /exercises`, `GET/PUT/DELETE /exercises/{id}`
//! - `GET/POST /completions`, `GET/PUT/DELETE /completions/{id}`,
//!   `GET /completions/stats`

mod error;
mod http;

use async_trait::async_trait;

pub use error::{ApiError, ApiResult};
pub use http::HttpApiClient;

use crate::filter::Filter;
use crate::models::{
    Ack, Completion, CompletionStats, CompletionUpdate, Cycle, CycleUpdate, Exercise,
    ExerciseUpdate, NewCompletion, NewCycle, NewExercise, NewTask, Task, TaskCompletion,
    TaskUpdate,
};

/// One method per backend operation
///
/// List operations forward their `Filter` verbatim as query parameters.
#[async_trait]
pub trait RecoveryApi: Send + Sync {
    // Cycles
    async fn list_cycles(&self, filter: &Filter) -> ApiResult<Vec<Cycle>>;
    async fn get_cycle(&self, id: i64) -> ApiResult<Cycle>;
    async fn create_cycle(&self, cycle: &NewCycle) -> ApiResult<Ack>;
    async fn update_cycle(&self, id: i64, update: &CycleUpdate) -> ApiResult<Ack>;
    async fn delete_cycle(&self, id: i64) -> ApiResult<Ack>;

    // Tasks
    async fn list_tasks(&self, filter: &Filter) -> ApiResult<Vec<Task>>;
    async fn get_task(&self, id: i64) -> ApiResult<Task>;
    async fn create_task(&self, task: &NewTask) -> ApiResult<Ack>;
    async fn update_task(&self, id: i64, update: &TaskUpdate) -> ApiResult<Ack>;
    /// State transition, distinct from a generic update
    async fn complete_task(&self, id: i64, completion: &TaskCompletion) -> ApiResult<Ack>;

    // Exercises
    async fn list_exercises(&self, filter: &Filter) -> ApiResult<Vec<Exercise>>;
    async fn get_exercise(&self, id: i64) -> ApiResult<Exercise>;
    async fn create_exercise(&self, exercise: &NewExercise) -> ApiResult<Ack>;
    async fn update_exercise(&self, id: i64, update: &ExerciseUpdate) -> ApiResult<Ack>;
    async fn delete_exercise(&self, id: i64) -> ApiResult<Ack>;

    // Completions
    async fn list_completions(&self, filter: &Filter) -> ApiResult<Vec<Completion>>;
    async fn get_completion(&self, id: i64) -> ApiResult<Completion>;
    async fn create_completion(&self, completion: &NewCompletion) -> ApiResult<Ack>;
    async fn update_completion(&self, id: i64, update: &CompletionUpdate) -> ApiResult<Ack>;
    async fn delete_completion(&self, id: i64) -> ApiResult<Ack>;
    async fn completion_stats(&self, filter: &Filter) -> ApiResult<CompletionStats>;
}
