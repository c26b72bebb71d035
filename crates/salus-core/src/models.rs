//! Data models for Salus
//!
//! Entities as the backend transports them, plus the request payloads the
//! API client sends. Field names follow the wire format.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::dates::calculate_duration;

/// A bounded rehabilitation period
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Cycle {
    pub id: i64,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub notes: Option<String>,
    /// Only populated on detail reads
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tasks: Vec<Task>,
}

impl Cycle {
    /// Inclusive number of days covered by this cycle
    pub fn duration_days(&self) -> i64 {
        calculate_duration(Some(self.start_date), Some(self.end_date))
    }
}

/// A scheduled exercise instance tied to a cycle and a day
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Task {
    pub id: i64,
    pub cycle_id: i64,
    pub exercise_id: i64,
    pub scheduled_time: String,
    pub sets: i64,
    /// 0 = Sunday .. 6 = Saturday
    #[serde(default)]
    pub day_of_week: Option<u8>,
    #[serde(default, deserialize_with = "empty_date_as_none")]
    pub specific_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "flexible_bool")]
    pub is_completed: bool,
    #[serde(default)]
    pub exercise_name: Option<String>,
    #[serde(default)]
    pub duration_sec: Option<i64>,
    #[serde(default)]
    pub rest_sec: Option<i64>,
    /// Only populated on detail reads
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub completions: Vec<Completion>,
}

/// An exercise type
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Exercise {
    pub id: i64,
    pub name: String,
    pub duration_sec: i64,
    pub rest_sec: i64,
    #[serde(default)]
    pub description: Option<String>,
}

/// Evidence that a task was performed
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Completion {
    pub id: i64,
    pub task_id: i64,
    #[serde(default)]
    pub cycle_id: Option<i64>,
    #[serde(default)]
    pub completed_at: Option<String>,
    #[serde(default)]
    pub actual_sets: Option<i64>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub scheduled_time: Option<String>,
    #[serde(default)]
    pub exercise_name: Option<String>,
}

/// Server-computed completion aggregate
///
/// The client passes this through without interpreting it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CompletionStats {
    #[serde(default)]
    pub total_completions: i64,
    #[serde(default)]
    pub total_sets: i64,
    #[serde(default)]
    pub exercise_stats: Vec<ExerciseStat>,
    #[serde(default)]
    pub date_stats: Vec<DateStat>,
    /// Aggregates this client does not model, kept for re-serialization
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExerciseStat {
    pub name: String,
    pub count: i64,
    #[serde(default)]
    pub total_sets: Option<i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DateStat {
    #[serde(default)]
    pub date: Option<String>,
    pub count: i64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Body of a mutation response
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Ack {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub completion_id: Option<i64>,
}

// ==================== Request payloads ====================

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NewCycle {
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Partial cycle update; unset fields are left untouched by the server
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct CycleUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NewTask {
    pub cycle_id: i64,
    pub exercise_id: i64,
    /// `HH:MM` or `HH:MM:SS`
    pub scheduled_time: String,
    pub sets: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub day_of_week: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specific_date: Option<NaiveDate>,
}

/// Partial task update
///
/// `cycle_id` also decides which cycle's task list is refreshed afterwards.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct TaskUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cycle_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exercise_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduled_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sets: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub day_of_week: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specific_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_completed: Option<bool>,
}

/// Body of the task completion transition
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct TaskCompletion {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual_sets: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NewExercise {
    pub name: String,
    pub duration_sec: i64,
    pub rest_sec: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct ExerciseUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_sec: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rest_sec: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NewCompletion {
    pub task_id: i64,
    /// Scope of the refresh after creation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cycle_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual_sets: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct CompletionUpdate {
    /// Scope of the refresh after the update
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cycle_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual_sets: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

// SQLite-backed servers send 0/1 for booleans.
fn flexible_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
    }

    Ok(match Option::<Flag>::deserialize(deserializer)? {
        Some(Flag::Bool(b)) => b,
        Some(Flag::Int(n)) => n != 0,
        None => false,
    })
}

fn empty_date_as_none<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(s) if !s.trim().is_empty() => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map(Some)
            .map_err(serde::de::Error::custom),
        _ => Ok(None),
    }
}
