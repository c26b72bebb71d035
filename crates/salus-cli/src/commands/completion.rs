//! Completion record command handlers

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;

use salus_core::{CompletionStore, CompletionUpdate, Filter, NewCompletion};

use super::confirm_delete;
use crate::output::Output;

/// Query parameters shared by `completion list` and `completion stats`
#[derive(Debug, Clone, Default)]
pub struct RecordQuery {
    pub cycle: Option<i64>,
    pub task: Option<i64>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl RecordQuery {
    fn filter(&self) -> Result<Filter> {
        if let (Some(from), Some(to)) = (self.from, self.to) {
            if to < from {
                bail!("--to {} is before --from {}", to, from);
            }
        }

        let mut filter = Filter::for_optional_cycle(self.cycle);
        if let Some(task) = self.task {
            filter = filter.with("task_id", task);
        }
        if let Some(from) = self.from {
            filter = filter.with("start_date", from.format("%Y-%m-%d"));
        }
        if let Some(to) = self.to {
            filter = filter.with("end_date", to.format("%Y-%m-%d"));
        }
        Ok(filter)
    }
}

pub async fn list(store: &CompletionStore, query: RecordQuery, output: &Output) -> Result<()> {
    let completions = store.fetch_completions(&query.filter()?).await?;
    output.print_completions(&completions);
    Ok(())
}

pub async fn show(store: &CompletionStore, id: i64, output: &Output) -> Result<()> {
    let completion = store
        .get_completion(id)
        .await
        .with_context(|| format!("Failed to load completion record {}", id))?;
    output.print_completion(&completion);
    Ok(())
}

pub async fn create(
    store: &CompletionStore,
    completion: NewCompletion,
    output: &Output,
) -> Result<()> {
    let ack = store.create_completion(&completion).await?;
    let id = ack
        .id
        .map(|id| id.to_string())
        .unwrap_or_else(|| "?".to_string());
    output.success(&format!(
        "Recorded completion {} for task {}",
        id, completion.task_id
    ));

    if output.is_quiet() {
        println!("{}", id);
    }
    Ok(())
}

pub async fn update(
    store: &CompletionStore,
    id: i64,
    update: CompletionUpdate,
    output: &Output,
) -> Result<()> {
    if update.actual_sets.is_none() && update.notes.is_none() {
        bail!("Nothing to update. Pass --sets and/or --notes.");
    }

    store.update_completion(id, &update).await?;
    output.success(&format!("Updated completion record {}", id));
    Ok(())
}

pub async fn delete(
    store: &CompletionStore,
    id: i64,
    cycle: Option<i64>,
    yes: bool,
    output: &Output,
) -> Result<()> {
    if !confirm_delete(&format!("completion record {}", id), yes, output)? {
        return Ok(());
    }

    store.delete_completion(id, cycle).await?;
    output.success(&format!("Deleted completion record {}", id));
    Ok(())
}

/// Aggregate statistics for the matching records
pub async fn stats(store: &CompletionStore, query: RecordQuery, output: &Output) -> Result<()> {
    let stats = store.fetch_stats(&query.filter()?).await?;
    output.print_stats(&stats);
    Ok(())
}
