//! In-memory `RecoveryApi` used by the store tests
//!
//! Records every call (with its filter), can be scripted to fail or hang per
//! method, and can sample a store's `loading` flag while a call is in flight.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::api::{ApiError, ApiResult, RecoveryApi};
use crate::filter::Filter;
use crate::models::{
    Ack, Completion, CompletionStats, CompletionUpdate, Cycle, CycleUpdate, Exercise,
    ExerciseUpdate, NewCompletion, NewCycle, NewExercise, NewTask, Task, TaskCompletion,
    TaskUpdate,
};

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Call {
    pub method: &'static str,
    pub id: Option<i64>,
    pub filter: Option<Filter>,
}

type Probe = Arc<dyn Fn() -> bool + Send + Sync>;

#[derive(Default)]
pub(crate) struct FakeApi {
    calls: Mutex<Vec<Call>>,
    failures: Mutex<HashMap<&'static str, (u16, Option<String>)>>,
    hanging: Mutex<HashSet<&'static str>>,
    probe: Mutex<Option<Probe>>,
    loading_seen: Mutex<Vec<(&'static str, bool)>>,
    next_id: Mutex<i64>,
    cycles: Mutex<Vec<Cycle>>,
    tasks: Mutex<Vec<Task>>,
    exercises: Mutex<Vec<Exercise>>,
    completions: Mutex<Vec<Completion>>,
    stats: Mutex<CompletionStats>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self {
            next_id: Mutex::new(100),
            ..Default::default()
        }
    }

    pub fn with_cycles(self, cycles: Vec<Cycle>) -> Self {
        *self.cycles.lock().unwrap() = cycles;
        self
    }

    pub fn with_tasks(self, tasks: Vec<Task>) -> Self {
        *self.tasks.lock().unwrap() = tasks;
        self
    }

    pub fn with_exercises(self, exercises: Vec<Exercise>) -> Self {
        *self.exercises.lock().unwrap() = exercises;
        self
    }

    pub fn with_completions(self, completions: Vec<Completion>) -> Self {
        *self.completions.lock().unwrap() = completions;
        self
    }

    pub fn with_stats(self, stats: CompletionStats) -> Self {
        *self.stats.lock().unwrap() = stats;
        self
    }

    /// Make `method` fail with the given status and optional `error` body
    pub fn fail(&self, method: &'static str, status: u16, message: Option<&str>) {
        self.failures
            .lock()
            .unwrap()
            .insert(method, (status, message.map(str::to_string)));
    }

    pub fn recover(&self, method: &'static str) {
        self.failures.lock().unwrap().remove(method);
    }

    /// Make `method` never resolve
    pub fn hang(&self, method: &'static str) {
        self.hanging.lock().unwrap().insert(method);
    }

    /// Sample a flag on every call
    pub fn set_probe(&self, probe: impl Fn() -> bool + Send + Sync + 'static) {
        *self.probe.lock().unwrap() = Some(Arc::new(probe));
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, method: &str) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| c.method == method)
            .collect()
    }

    pub fn methods(&self) -> Vec<&'static str> {
        self.calls().into_iter().map(|c| c.method).collect()
    }

    pub fn filters_for(&self, method: &str) -> Vec<Filter> {
        self.calls_to(method)
            .into_iter()
            .filter_map(|c| c.filter)
            .collect()
    }

    pub fn loading_seen(&self, method: &str) -> Vec<bool> {
        self.loading_seen
            .lock()
            .unwrap()
            .iter()
            .filter(|(m, _)| *m == method)
            .map(|(_, seen)| *seen)
            .collect()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    pub fn push_task(&self, task: Task) {
        self.tasks.lock().unwrap().push(task);
    }

    async fn enter(
        &self,
        method: &'static str,
        id: Option<i64>,
        filter: Option<&Filter>,
    ) -> ApiResult<()> {
        self.calls.lock().unwrap().push(Call {
            method,
            id,
            filter: filter.cloned(),
        });

        let probe = self.probe.lock().unwrap().clone();
        if let Some(probe) = probe {
            self.loading_seen.lock().unwrap().push((method, probe()));
        }

        let hangs = self.hanging.lock().unwrap().contains(method);
        if hangs {
            std::future::pending::<()>().await;
        }

        let failure = self.failures.lock().unwrap().get(method).cloned();
        match failure {
            Some((status, message)) => Err(ApiError::server(
                format!("http://fake/{}", method),
                status,
                message,
            )),
            None => Ok(()),
        }
    }

    fn allocate_id(&self) -> i64 {
        let mut next = self.next_id.lock().unwrap();
        *next += 1;
        *next
    }

    fn not_found(what: &str) -> ApiError {
        ApiError::server(format!("http://fake/{}", what), 404, None)
    }
}

fn matches_cycle(filter: &Filter, cycle_id: Option<i64>) -> bool {
    match filter.get("cycle_id") {
        Some(wanted) => cycle_id.map(|c| c.to_string()).as_deref() == Some(wanted),
        None => true,
    }
}

#[async_trait]
impl RecoveryApi for FakeApi {
    async fn list_cycles(&self, filter: &Filter) -> ApiResult<Vec<Cycle>> {
        self.enter("list_cycles", None, Some(filter)).await?;
        Ok(self.cycles.lock().unwrap().clone())
    }

    async fn get_cycle(&self, id: i64) -> ApiResult<Cycle> {
        self.enter("get_cycle", Some(id), None).await?;
        self.cycles
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or_else(|| Self::not_found("cycles"))
    }

    async fn create_cycle(&self, cycle: &NewCycle) -> ApiResult<Ack> {
        self.enter("create_cycle", None, None).await?;
        let id = self.allocate_id();
        self.cycles.lock().unwrap().push(Cycle {
            id,
            name: cycle.name.clone(),
            start_date: cycle.start_date,
            end_date: cycle.end_date,
            notes: cycle.notes.clone(),
            tasks: Vec::new(),
        });
        Ok(ack(Some(id)))
    }

    async fn update_cycle(&self, id: i64, update: &CycleUpdate) -> ApiResult<Ack> {
        self.enter("update_cycle", Some(id), None).await?;
        let mut cycles = self.cycles.lock().unwrap();
        let cycle = cycles
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| Self::not_found("cycles"))?;
        if let Some(ref name) = update.name {
            cycle.name = name.clone();
        }
        if let Some(start) = update.start_date {
            cycle.start_date = start;
        }
        if let Some(end) = update.end_date {
            cycle.end_date = end;
        }
        Ok(ack(None))
    }

    async fn delete_cycle(&self, id: i64) -> ApiResult<Ack> {
        self.enter("delete_cycle", Some(id), None).await?;
        self.cycles.lock().unwrap().retain(|c| c.id != id);
        Ok(ack(Some(id)))
    }

    async fn list_tasks(&self, filter: &Filter) -> ApiResult<Vec<Task>> {
        self.enter("list_tasks", None, Some(filter)).await?;
        Ok(self
            .tasks
            .lock()
            .unwrap()
            .iter()
            .filter(|t| matches_cycle(filter, Some(t.cycle_id)))
            .cloned()
            .collect())
    }

    async fn get_task(&self, id: i64) -> ApiResult<Task> {
        self.enter("get_task", Some(id), None).await?;
        self.tasks
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.id == id)
            .cloned()
            .ok_or_else(|| Self::not_found("tasks"))
    }

    async fn create_task(&self, task: &NewTask) -> ApiResult<Ack> {
        self.enter("create_task", None, None).await?;
        let id = self.allocate_id();
        self.tasks.lock().unwrap().push(Task {
            id,
            cycle_id: task.cycle_id,
            exercise_id: task.exercise_id,
            scheduled_time: task.scheduled_time.clone(),
            sets: task.sets,
            day_of_week: task.day_of_week,
            specific_date: task.specific_date,
            is_completed: false,
            exercise_name: None,
            duration_sec: None,
            rest_sec: None,
            completions: Vec::new(),
        });
        Ok(ack(Some(id)))
    }

    async fn update_task(&self, id: i64, update: &TaskUpdate) -> ApiResult<Ack> {
        self.enter("update_task", Some(id), None).await?;
        let mut tasks = self.tasks.lock().unwrap();
        let task = tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| Self::not_found("tasks"))?;
        if let Some(cycle_id) = update.cycle_id {
            task.cycle_id = cycle_id;
        }
        if let Some(sets) = update.sets {
            task.sets = sets;
        }
        if let Some(done) = update.is_completed {
            task.is_completed = done;
        }
        Ok(ack(None))
    }

    async fn complete_task(&self, id: i64, completion: &TaskCompletion) -> ApiResult<Ack> {
        self.enter("complete_task", Some(id), None).await?;
        let mut tasks = self.tasks.lock().unwrap();
        let task = tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| Self::not_found("tasks"))?;
        task.is_completed = true;
        let cycle_id = task.cycle_id;
        drop(tasks);

        let completion_id = self.allocate_id();
        self.completions.lock().unwrap().push(Completion {
            id: completion_id,
            task_id: id,
            cycle_id: Some(cycle_id),
            completed_at: None,
            actual_sets: completion.actual_sets,
            notes: completion.notes.clone(),
            scheduled_time: None,
            exercise_name: None,
        });
        Ok(Ack {
            id: None,
            message: Some("任务已标记为完成".to_string()),
            completion_id: Some(completion_id),
        })
    }

    async fn list_exercises(&self, filter: &Filter) -> ApiResult<Vec<Exercise>> {
        self.enter("list_exercises", None, Some(filter)).await?;
        Ok(self.exercises.lock().unwrap().clone())
    }

    async fn get_exercise(&self, id: i64) -> ApiResult<Exercise> {
        self.enter("get_exercise", Some(id), None).await?;
        self.exercises
            .lock()
            .unwrap()
            .iter()
            .find(|e| e.id == id)
            .cloned()
            .ok_or_else(|| Self::not_found("exercises"))
    }

    async fn create_exercise(&self, exercise: &NewExercise) -> ApiResult<Ack> {
        self.enter("create_exercise", None, None).await?;
        let id = self.allocate_id();
        self.exercises.lock().unwrap().push(Exercise {
            id,
            name: exercise.name.clone(),
            duration_sec: exercise.duration_sec,
            rest_sec: exercise.rest_sec,
            description: exercise.description.clone(),
        });
        Ok(ack(Some(id)))
    }

    async fn update_exercise(&self, id: i64, update: &ExerciseUpdate) -> ApiResult<Ack> {
        self.enter("update_exercise", Some(id), None).await?;
        let mut exercises = self.exercises.lock().unwrap();
        let exercise = exercises
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| Self::not_found("exercises"))?;
        if let Some(ref name) = update.name {
            exercise.name = name.clone();
        }
        if let Some(duration) = update.duration_sec {
            exercise.duration_sec = duration;
        }
        if let Some(rest) = update.rest_sec {
            exercise.rest_sec = rest;
        }
        Ok(ack(None))
    }

    async fn delete_exercise(&self, id: i64) -> ApiResult<Ack> {
        self.enter("delete_exercise", Some(id), None).await?;
        self.exercises.lock().unwrap().retain(|e| e.id != id);
        Ok(ack(None))
    }

    async fn list_completions(&self, filter: &Filter) -> ApiResult<Vec<Completion>> {
        self.enter("list_completions", None, Some(filter)).await?;
        Ok(self
            .completions
            .lock()
            .unwrap()
            .iter()
            .filter(|c| matches_cycle(filter, c.cycle_id))
            .cloned()
            .collect())
    }

    async fn get_completion(&self, id: i64) -> ApiResult<Completion> {
        self.enter("get_completion", Some(id), None).await?;
        self.completions
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or_else(|| Self::not_found("completions"))
    }

    async fn create_completion(&self, completion: &NewCompletion) -> ApiResult<Ack> {
        self.enter("create_completion", None, None).await?;
        let id = self.allocate_id();
        self.completions.lock().unwrap().push(Completion {
            id,
            task_id: completion.task_id,
            cycle_id: completion.cycle_id,
            completed_at: None,
            actual_sets: completion.actual_sets,
            notes: completion.notes.clone(),
            scheduled_time: None,
            exercise_name: None,
        });
        Ok(ack(Some(id)))
    }

    async fn update_completion(&self, id: i64, update: &CompletionUpdate) -> ApiResult<Ack> {
        self.enter("update_completion", Some(id), None).await?;
        let mut completions = self.completions.lock().unwrap();
        let completion = completions
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| Self::not_found("completions"))?;
        if update.actual_sets.is_some() {
            completion.actual_sets = update.actual_sets;
        }
        if update.notes.is_some() {
            completion.notes = update.notes.clone();
        }
        Ok(ack(Some(id)))
    }

    async fn delete_completion(&self, id: i64) -> ApiResult<Ack> {
        self.enter("delete_completion", Some(id), None).await?;
        self.completions.lock().unwrap().retain(|c| c.id != id);
        Ok(ack(Some(id)))
    }

    async fn completion_stats(&self, filter: &Filter) -> ApiResult<CompletionStats> {
        self.enter("completion_stats", None, Some(filter)).await?;
        Ok(self.stats.lock().unwrap().clone())
    }
}

fn ack(id: Option<i64>) -> Ack {
    Ack {
        id,
        message: Some("ok".to_string()),
        completion_id: None,
    }
}

pub(crate) fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub(crate) fn cycle(id: i64, name: &str) -> Cycle {
    Cycle {
        id,
        name: name.to_string(),
        start_date: date(2024, 1, 1),
        end_date: date(2024, 1, 31),
        notes: None,
        tasks: Vec::new(),
    }
}

pub(crate) fn task(id: i64, cycle_id: i64) -> Task {
    Task {
        id,
        cycle_id,
        exercise_id: 1,
        scheduled_time: "08:00:00".to_string(),
        sets: 3,
        day_of_week: Some(1),
        specific_date: None,
        is_completed: false,
        exercise_name: Some("Heel slides".to_string()),
        duration_sec: Some(30),
        rest_sec: Some(10),
        completions: Vec::new(),
    }
}

pub(crate) fn exercise(id: i64, name: &str) -> Exercise {
    Exercise {
        id,
        name: name.to_string(),
        duration_sec: 30,
        rest_sec: 10,
        description: None,
    }
}

pub(crate) fn completion(id: i64, task_id: i64, cycle_id: i64) -> Completion {
    Completion {
        id,
        task_id,
        cycle_id: Some(cycle_id),
        completed_at: Some("2024-01-02 08:30:00".to_string()),
        actual_sets: Some(3),
        notes: None,
        scheduled_time: Some("08:00:00".to_string()),
        exercise_name: Some("Heel slides".to_string()),
    }
}
