//! Task command handlers

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;

use salus_core::{BestEffort, Filter, NewTask, TaskCompletion, TaskStore, TaskUpdate};

use crate::output::Output;

/// List tasks, optionally narrowed by cycle, weekday and date
pub async fn list(
    store: &TaskStore,
    cycle: Option<i64>,
    day: Option<u8>,
    date: Option<NaiveDate>,
    output: &Output,
) -> Result<()> {
    let filter = task_filter(cycle, day, date);
    let tasks = store.fetch_tasks(&filter).await?;
    output.print_tasks(&tasks);
    Ok(())
}

/// Show one task with its completion records
pub async fn show(store: &TaskStore, id: i64, output: &Output) -> Result<()> {
    let task = store
        .get_task(id)
        .await
        .with_context(|| format!("Failed to load task {}", id))?;
    output.print_task(&task);
    Ok(())
}

/// Schedule a new task
pub async fn create(store: &TaskStore, task: NewTask, output: &Output) -> Result<()> {
    if let Some(day) = task.day_of_week {
        check_weekday(day)?;
    }

    let ack = store.create_task(&task).await?;
    let id = ack
        .id
        .map(|id| id.to_string())
        .unwrap_or_else(|| "?".to_string());
    output.success(&format!("Created task {} in cycle {}", id, task.cycle_id));

    if output.is_quiet() {
        println!("{}", id);
    }
    Ok(())
}

/// Update fields of a task
pub async fn update(store: &TaskStore, id: i64, update: TaskUpdate, output: &Output) -> Result<()> {
    if update == TaskUpdate::default() {
        bail!("Nothing to update. Pass at least one field to change.");
    }
    if let Some(day) = update.day_of_week {
        check_weekday(day)?;
    }

    store.update_task(id, &update).await?;
    output.success(&format!("Updated task {}", id));
    Ok(())
}

/// Mark a task completed
///
/// With `cycle` the cycle's tasks are loaded first, so the list is
/// refreshed after completion.
pub async fn complete(
    store: &TaskStore,
    id: i64,
    cycle: Option<i64>,
    completion: TaskCompletion,
    output: &Output,
) -> Result<()> {
    if let Some(cycle_id) = cycle {
        store.fetch_tasks(&Filter::for_cycle(cycle_id)).await?;
    }

    let ack = store.complete_task(id, &completion).await?;

    match ack.completion_id {
        Some(completion_id) => {
            output.success(&format!(
                "Completed task {} (record {})",
                id, completion_id
            ));
            if output.is_quiet() {
                println!("{}", completion_id);
            }
        }
        None => output.success(&format!("Completed task {}", id)),
    }
    Ok(())
}

/// Tasks scheduled for today in a cycle
pub async fn today(store: &TaskStore, cycle: i64, output: &Output) -> Result<()> {
    let tasks = match store.fetch_today_tasks(Some(cycle)).await {
        BestEffort::Fetched(tasks) => tasks,
        BestEffort::Degraded { message } => {
            output.warn(&message);
            Vec::new()
        }
    };
    output.print_tasks(&tasks);
    Ok(())
}

fn task_filter(cycle: Option<i64>, day: Option<u8>, date: Option<NaiveDate>) -> Filter {
    let mut filter = Filter::for_optional_cycle(cycle);
    if let Some(day) = day {
        filter = filter.day_of_week(day);
    }
    if let Some(date) = date {
        filter = filter.date(date);
    }
    filter
}

fn check_weekday(day: u8) -> Result<()> {
    if day > 6 {
        bail!("Invalid day of week {}. Use 0 (Sunday) to 6 (Saturday).", day);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_filter() {
        assert!(task_filter(None, None, None).is_empty());

        let date = NaiveDate::from_ymd_opt(2024, 1, 8).unwrap();
        let filter = task_filter(Some(3), Some(1), Some(date));
        assert_eq!(filter.to_string(), "cycle_id=3&date=2024-01-08&day_of_week=1");
    }

    #[test]
    fn test_check_weekday() {
        assert!(check_weekday(0).is_ok());
        assert!(check_weekday(6).is_ok());
        assert!(check_weekday(7).is_err());
    }
}
