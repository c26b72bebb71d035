//! Exercise type command handlers

use anyhow::{bail, Context, Result};

use salus_core::{BestEffort, ExerciseStore, ExerciseUpdate, Filter, NewExercise};

use super::confirm_delete;
use crate::output::Output;

/// List the exercise catalog
pub async fn list(store: &ExerciseStore, output: &Output) -> Result<()> {
    let exercises = match store.fetch_exercises(&Filter::new()).await {
        BestEffort::Fetched(exercises) => exercises,
        BestEffort::Degraded { message } => {
            output.warn(&message);
            Vec::new()
        }
    };
    output.print_exercises(&exercises);
    Ok(())
}

pub async fn show(store: &ExerciseStore, id: i64, output: &Output) -> Result<()> {
    let exercise = store
        .get_exercise(id)
        .await
        .with_context(|| format!("Failed to load exercise type {}", id))?;
    output.print_exercise(&exercise);
    Ok(())
}

pub async fn create(store: &ExerciseStore, exercise: NewExercise, output: &Output) -> Result<()> {
    let ack = store.create_exercise(&exercise).await?;
    let id = ack
        .id
        .map(|id| id.to_string())
        .unwrap_or_else(|| "?".to_string());
    output.success(&format!("Created exercise type {}: {}", id, exercise.name));

    if output.is_quiet() {
        println!("{}", id);
    }
    Ok(())
}

pub async fn update(
    store: &ExerciseStore,
    id: i64,
    update: ExerciseUpdate,
    output: &Output,
) -> Result<()> {
    if update == ExerciseUpdate::default() {
        bail!(
            "Nothing to update. Pass at least one of --name, --duration, --rest, --description."
        );
    }

    store.update_exercise(id, &update).await?;
    output.success(&format!("Updated exercise type {}", id));
    Ok(())
}

pub async fn delete(store: &ExerciseStore, id: i64, yes: bool, output: &Output) -> Result<()> {
    if !confirm_delete(&format!("exercise type {}", id), yes, output)? {
        return Ok(());
    }

    store.delete_exercise(id).await?;
    output.success(&format!("Deleted exercise type {}", id));
    Ok(())
}
