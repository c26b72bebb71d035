//! Cycle command handlers

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;

use salus_core::{CycleStore, CycleUpdate, NewCycle};

use super::confirm_delete;
use crate::output::Output;

/// List all cycles
pub async fn list(store: &CycleStore, output: &Output) -> Result<()> {
    let cycles = store.fetch_cycles().await?;
    output.print_cycles(&cycles);
    Ok(())
}

/// Show a cycle with its tasks
pub async fn show(store: &CycleStore, id: i64, output: &Output) -> Result<()> {
    let cycle = store
        .get_cycle(id)
        .await
        .with_context(|| format!("Failed to load cycle {}", id))?;
    output.print_cycle(&cycle);
    Ok(())
}

/// Create a new cycle
pub async fn create(store: &CycleStore, cycle: NewCycle, output: &Output) -> Result<()> {
    if cycle.end_date < cycle.start_date {
        bail!(
            "End date {} is before start date {}",
            cycle.end_date,
            cycle.start_date
        );
    }

    let ack = store.create_cycle(&cycle).await?;
    let id = ack
        .id
        .map(|id| id.to_string())
        .unwrap_or_else(|| "?".to_string());
    output.success(&format!("Created cycle {}: {}", id, cycle.name));

    if output.is_quiet() {
        println!("{}", id);
    }
    Ok(())
}

/// Update fields of a cycle
pub async fn update(
    store: &CycleStore,
    id: i64,
    update: CycleUpdate,
    output: &Output,
) -> Result<()> {
    if update == CycleUpdate::default() {
        bail!("Nothing to update. Pass at least one of --name, --start, --end, --notes.");
    }

    store.update_cycle(id, &update).await?;
    output.success(&format!("Updated cycle {}", id));
    Ok(())
}

/// Delete a cycle
pub async fn delete(store: &CycleStore, id: i64, yes: bool, output: &Output) -> Result<()> {
    if !confirm_delete(&format!("cycle {}", id), yes, output)? {
        return Ok(());
    }

    store.delete_cycle(id).await?;
    output.success(&format!("Deleted cycle {}", id));
    Ok(())
}

/// Print the inclusive day count between two dates
pub fn duration(start: NaiveDate, end: NaiveDate, output: &Output) -> Result<()> {
    let days = CycleStore::calculate_duration(Some(start), Some(end));

    if output.is_json() {
        println!(
            "{}",
            serde_json::json!({
                "start_date": start,
                "end_date": end,
                "days": days
            })
        );
    } else if output.is_quiet() {
        println!("{}", days);
    } else {
        println!("{} → {}: {} day(s)", start, end, days);
    }
    Ok(())
}
