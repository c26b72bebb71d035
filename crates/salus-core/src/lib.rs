//! Salus Core Library
//!
//! This crate provides the client side of Salus, a rehabilitation tracker:
//! recovery cycles, scheduled training tasks, exercise types and completion
//! records, all persisted by a REST backend.
//!
//! # Architecture
//!
//! - **RecoveryApi**: one async method per backend call, no caching
//! - **Stores**: observable in-memory collections that re-fetch after every
//!   successful mutation
//!
//! # Quick Start
//!
//! ```text
//! let config = Config::load()?;
//! let api: Arc<dyn RecoveryApi> = Arc::new(HttpApiClient::from_config(&config)?);
//!
//! let cycles = CycleStore::new(api.clone(), config.locale);
//! cycles.fetch_cycles().await?;
//!
//! let tasks = TaskStore::new(api, config.locale);
//! let today = tasks.fetch_today_tasks(Some(1)).await.into_value();
//! ```
//!
//! # Modules
//!
//! - `api`: HTTP client and the `RecoveryApi` trait
//! - `store`: Cycle, task, exercise and completion stores
//! - `models`: Records and request payloads
//! - `filter`: Query parameters for list calls
//! - `dates`: Duration and "today" helpers
//! - `i18n`: Locales and fallback error messages
//! - `config`: Application configuration

pub mod api;
pub mod config;
pub mod dates;
pub mod filter;
pub mod i18n;
pub mod models;
pub mod store;

pub use api::{ApiError, ApiResult, HttpApiClient, RecoveryApi};
pub use config::Config;
pub use filter::Filter;
pub use i18n::{Locale, Operation};
pub use models::{
    Ack, Completion, CompletionStats, CompletionUpdate, Cycle, CycleUpdate, DateStat, Exercise,
    ExerciseStat, ExerciseUpdate, NewCompletion, NewCycle, NewExercise, NewTask, Task,
    TaskCompletion, TaskUpdate,
};
pub use store::{
    BestEffort, CompletionStore, CycleStore, ExerciseStore, StoreError, StoreResult, TaskStore,
};
