//! Localized fallback messages
//!
//! When the backend reports a failure without an `error` field, stores
//! record a fixed per-operation message in the configured locale.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Supported message languages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Locale {
    #[serde(rename = "en")]
    En,
    #[default]
    #[serde(rename = "zh-CN")]
    ZhCn,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown locale '{0}'. Supported: en, zh-CN")]
pub struct UnknownLocale(pub String);

impl FromStr for Locale {
    type Err = UnknownLocale;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "en" | "en-us" | "en-gb" => Ok(Locale::En),
            "zh" | "zh-cn" | "zh-hans" => Ok(Locale::ZhCn),
            _ => Err(UnknownLocale(s.to_string())),
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locale::En => f.write_str("en"),
            Locale::ZhCn => f.write_str("zh-CN"),
        }
    }
}

/// Every store action that can record an error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    FetchCycles,
    GetCycle,
    CreateCycle,
    UpdateCycle,
    DeleteCycle,
    FetchTasks,
    GetTask,
    CreateTask,
    UpdateTask,
    CompleteTask,
    FetchTodayTasks,
    FetchExercises,
    GetExercise,
    CreateExercise,
    UpdateExercise,
    DeleteExercise,
    FetchCompletions,
    GetCompletion,
    CreateCompletion,
    UpdateCompletion,
    DeleteCompletion,
    FetchStats,
}

impl Operation {
    /// Stable identifier used in logs
    pub fn name(self) -> &'static str {
        match self {
            Operation::FetchCycles => "fetch_cycles",
            Operation::GetCycle => "get_cycle",
            Operation::CreateCycle => "create_cycle",
            Operation::UpdateCycle => "update_cycle",
            Operation::DeleteCycle => "delete_cycle",
            Operation::FetchTasks => "fetch_tasks",
            Operation::GetTask => "get_task",
            Operation::CreateTask => "create_task",
            Operation::UpdateTask => "update_task",
            Operation::CompleteTask => "complete_task",
            Operation::FetchTodayTasks => "fetch_today_tasks",
            Operation::FetchExercises => "fetch_exercises",
            Operation::GetExercise => "get_exercise",
            Operation::CreateExercise => "create_exercise",
            Operation::UpdateExercise => "update_exercise",
            Operation::DeleteExercise => "delete_exercise",
            Operation::FetchCompletions => "fetch_completions",
            Operation::GetCompletion => "get_completion",
            Operation::CreateCompletion => "create_completion",
            Operation::UpdateCompletion => "update_completion",
            Operation::DeleteCompletion => "delete_completion",
            Operation::FetchStats => "fetch_stats",
        }
    }

    /// Message recorded when the server gives no reason of its own
    pub fn fallback(self, locale: Locale) -> &'static str {
        match locale {
            Locale::En => self.fallback_en(),
            Locale::ZhCn => self.fallback_zh(),
        }
    }

    fn fallback_en(self) -> &'static str {
        match self {
            Operation::FetchCycles => "Failed to load recovery cycles",
            Operation::GetCycle => "Failed to load recovery cycle details",
            Operation::CreateCycle => "Failed to create recovery cycle",
            Operation::UpdateCycle => "Failed to update recovery cycle",
            Operation::DeleteCycle => "Failed to delete recovery cycle",
            Operation::FetchTasks => "Failed to load training tasks",
            Operation::GetTask => "Failed to load training task details",
            Operation::CreateTask => "Failed to create training task",
            Operation::UpdateTask => "Failed to update training task",
            Operation::CompleteTask => "Failed to complete training task",
            Operation::FetchTodayTasks => "Failed to load today's tasks",
            Operation::FetchExercises => "Failed to load exercise types",
            Operation::GetExercise => "Failed to load exercise type details",
            Operation::CreateExercise => "Failed to create exercise type",
            Operation::UpdateExercise => "Failed to update exercise type",
            Operation::DeleteExercise => "Failed to delete exercise type",
            Operation::FetchCompletions => "Failed to load completion records",
            Operation::GetCompletion => "Failed to load completion record details",
            Operation::CreateCompletion => "Failed to create completion record",
            Operation::UpdateCompletion => "Failed to update completion record",
            Operation::DeleteCompletion => "Failed to delete completion record",
            Operation::FetchStats => "Failed to load statistics",
        }
    }

    fn fallback_zh(self) -> &'static str {
        match self {
            Operation::FetchCycles => "获取康复周期失败",
            Operation::GetCycle => "获取康复周期详情失败",
            Operation::CreateCycle => "创建康复周期失败",
            Operation::UpdateCycle => "更新康复周期失败",
            Operation::DeleteCycle => "删除康复周期失败",
            Operation::FetchTasks => "获取训练任务失败",
            Operation::GetTask => "获取训练任务详情失败",
            Operation::CreateTask => "创建训练任务失败",
            Operation::UpdateTask => "更新训练任务失败",
            Operation::CompleteTask => "完成训练任务失败",
            Operation::FetchTodayTasks => "获取今日任务失败",
            Operation::FetchExercises => "获取运动类型失败",
            Operation::GetExercise => "获取运动类型详情失败",
            Operation::CreateExercise => "创建运动类型失败",
            Operation::UpdateExercise => "更新运动类型失败",
            Operation::DeleteExercise => "删除运动类型失败",
            Operation::FetchCompletions => "获取完成记录失败",
            Operation::GetCompletion => "获取完成记录详情失败",
            Operation::CreateCompletion => "创建完成记录失败",
            Operation::UpdateCompletion => "更新完成记录失败",
            Operation::DeleteCompletion => "删除完成记录失败",
            Operation::FetchStats => "获取统计数据失败",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
