//! Output formatting for CLI
//!
//! Provides consistent output formatting across all commands:
//! - Human-readable default output
//! - JSON output (--json flag)
//! - Quiet mode for scripting (--quiet flag)

use serde::Serialize;

use salus_core::{Completion, CompletionStats, Cycle, Exercise, Task};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output
    Json,
    /// Quiet mode - minimal output
    Quiet,
}

impl OutputFormat {
    /// Create format from CLI flags
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if quiet {
            OutputFormat::Quiet
        } else if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Output helper for consistent formatting
pub struct Output {
    /// The output format
    pub format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn is_json(&self) -> bool {
        matches!(self.format, OutputFormat::Json)
    }

    /// Check if output is in quiet mode
    pub fn is_quiet(&self) -> bool {
        matches!(self.format, OutputFormat::Quiet)
    }

    /// Print a single cycle (with its tasks, when loaded)
    pub fn print_cycle(&self, cycle: &Cycle) {
        match self.format {
            OutputFormat::Human => {
                println!("ID:       {}", cycle.id);
                println!("Name:     {}", cycle.name);
                println!(
                    "Dates:    {} → {} ({} days)",
                    cycle.start_date,
                    cycle.end_date,
                    cycle.duration_days()
                );
                if let Some(ref notes) = cycle.notes {
                    println!("Notes:    {}", notes);
                }

                if !cycle.tasks.is_empty() {
                    println!();
                    println!("── Tasks ({}) ──", cycle.tasks.len());
                    for task in &cycle.tasks {
                        println!("{}", task_line(task));
                    }
                }
            }
            OutputFormat::Json => print_json(cycle),
            OutputFormat::Quiet => println!("{}", cycle.id),
        }
    }

    /// Print a list of cycles
    pub fn print_cycles(&self, cycles: &[Cycle]) {
        match self.format {
            OutputFormat::Human => {
                if cycles.is_empty() {
                    println!("No cycles found.");
                    return;
                }
                for cycle in cycles {
                    println!(
                        "{:>5} | {} | {} → {}",
                        cycle.id,
                        truncate(&cycle.name, 30),
                        cycle.start_date,
                        cycle.end_date
                    );
                }
                println!("\n{} cycle(s)", cycles.len());
            }
            OutputFormat::Json => print_json(cycles),
            OutputFormat::Quiet => {
                for cycle in cycles {
                    println!("{}", cycle.id);
                }
            }
        }
    }

    /// Print a single task (with its completions, when loaded)
    pub fn print_task(&self, task: &Task) {
        match self.format {
            OutputFormat::Human => {
                println!("ID:        {}", task.id);
                println!("Cycle:     {}", task.cycle_id);
                println!(
                    "Exercise:  {}",
                    task.exercise_name
                        .clone()
                        .unwrap_or_else(|| format!("#{}", task.exercise_id))
                );
                println!("Time:      {}", task.scheduled_time);
                println!("Sets:      {}", task.sets);
                println!("Schedule:  {}", schedule(task));
                println!("Completed: {}", if task.is_completed { "yes" } else { "no" });

                if !task.completions.is_empty() {
                    println!();
                    println!("── Completions ({}) ──", task.completions.len());
                    for completion in &task.completions {
                        println!("{}", completion_line(completion));
                    }
                }
            }
            OutputFormat::Json => print_json(task),
            OutputFormat::Quiet => println!("{}", task.id),
        }
    }

    /// Print a list of tasks
    pub fn print_tasks(&self, tasks: &[Task]) {
        match self.format {
            OutputFormat::Human => {
                if tasks.is_empty() {
                    println!("No tasks found.");
                    return;
                }
                for task in tasks {
                    println!("{}", task_line(task));
                }
                println!("\n{} task(s)", tasks.len());
            }
            OutputFormat::Json => print_json(tasks),
            OutputFormat::Quiet => {
                for task in tasks {
                    println!("{}", task.id);
                }
            }
        }
    }

    pub fn print_exercise(&self, exercise: &Exercise) {
        match self.format {
            OutputFormat::Human => {
                println!("ID:          {}", exercise.id);
                println!("Name:        {}", exercise.name);
                println!("Duration:    {}s", exercise.duration_sec);
                println!("Rest:        {}s", exercise.rest_sec);
                if let Some(ref desc) = exercise.description {
                    println!("Description: {}", desc);
                }
            }
            OutputFormat::Json => print_json(exercise),
            OutputFormat::Quiet => println!("{}", exercise.id),
        }
    }

    pub fn print_exercises(&self, exercises: &[Exercise]) {
        match self.format {
            OutputFormat::Human => {
                if exercises.is_empty() {
                    println!("No exercise types found.");
                    return;
                }
                for exercise in exercises {
                    println!(
                        "{:>5} | {} | {}s on, {}s rest",
                        exercise.id,
                        truncate(&exercise.name, 30),
                        exercise.duration_sec,
                        exercise.rest_sec
                    );
                }
                println!("\n{} exercise type(s)", exercises.len());
            }
            OutputFormat::Json => print_json(exercises),
            OutputFormat::Quiet => {
                for exercise in exercises {
                    println!("{}", exercise.id);
                }
            }
        }
    }

    pub fn print_completion(&self, completion: &Completion) {
        match self.format {
            OutputFormat::Human => {
                println!("ID:        {}", completion.id);
                println!("Task:      {}", completion.task_id);
                if let Some(cycle_id) = completion.cycle_id {
                    println!("Cycle:     {}", cycle_id);
                }
                if let Some(ref name) = completion.exercise_name {
                    println!("Exercise:  {}", name);
                }
                println!(
                    "Completed: {}",
                    completion.completed_at.as_deref().unwrap_or("(unknown)")
                );
                if let Some(sets) = completion.actual_sets {
                    println!("Sets:      {}", sets);
                }
                if let Some(ref notes) = completion.notes {
                    println!("Notes:     {}", notes);
                }
            }
            OutputFormat::Json => print_json(completion),
            OutputFormat::Quiet => println!("{}", completion.id),
        }
    }

    pub fn print_completions(&self, completions: &[Completion]) {
        match self.format {
            OutputFormat::Human => {
                if completions.is_empty() {
                    println!("No completion records found.");
                    return;
                }
                for completion in completions {
                    println!("{}", completion_line(completion));
                }
                println!("\n{} record(s)", completions.len());
            }
            OutputFormat::Json => print_json(completions),
            OutputFormat::Quiet => {
                for completion in completions {
                    println!("{}", completion.id);
                }
            }
        }
    }

    pub fn print_stats(&self, stats: &CompletionStats) {
        match self.format {
            OutputFormat::Human => {
                println!("Completions: {}", stats.total_completions);
                println!("Total sets:  {}", stats.total_sets);

                if !stats.exercise_stats.is_empty() {
                    println!();
                    println!("── By exercise ──");
                    for stat in &stats.exercise_stats {
                        println!(
                            "{} | {} time(s), {} set(s)",
                            truncate(&stat.name, 30),
                            stat.count,
                            stat.total_sets.unwrap_or(0)
                        );
                    }
                }

                if !stats.date_stats.is_empty() {
                    println!();
                    println!("── By date ──");
                    for stat in &stats.date_stats {
                        println!(
                            "{} | {}",
                            stat.date.as_deref().unwrap_or("(no date)"),
                            stat.count
                        );
                    }
                }
            }
            OutputFormat::Json => print_json(stats),
            OutputFormat::Quiet => println!("{}", stats.total_completions),
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Human => println!("✓ {}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({"status": "success", "message": message})
                );
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Report a degraded read on stderr
    pub fn warn(&self, message: &str) {
        if !self.is_quiet() {
            eprintln!("⚠ {}", message);
        }
    }

    /// Check if we should prompt for confirmation
    pub fn should_prompt(&self) -> bool {
        self.format == OutputFormat::Human
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize output: {}", e),
    }
}

fn task_line(task: &Task) -> String {
    let name = task
        .exercise_name
        .clone()
        .unwrap_or_else(|| format!("exercise #{}", task.exercise_id));
    format!(
        "{:>5} | {} {} | {} x{} | {}",
        task.id,
        if task.is_completed { "✓" } else { " " },
        task.scheduled_time,
        truncate(&name, 25),
        task.sets,
        schedule(task)
    )
}

fn completion_line(completion: &Completion) -> String {
    format!(
        "{:>5} | task {} | {} | {} set(s){}",
        completion.id,
        completion.task_id,
        completion.completed_at.as_deref().unwrap_or("(unknown)"),
        completion
            .actual_sets
            .map(|s| s.to_string())
            .unwrap_or_else(|| "?".to_string()),
        completion
            .notes
            .as_deref()
            .map(|n| format!(" | {}", truncate_line(n, 40)))
            .unwrap_or_default()
    )
}

/// When a task recurs, or the one date it is pinned to
fn schedule(task: &Task) -> String {
    match (task.specific_date, task.day_of_week) {
        (Some(date), _) => date.to_string(),
        (None, Some(day)) => format!("every {}", weekday_name(day)),
        (None, None) => "unscheduled".to_string(),
    }
}

/// 0 = Sunday
fn weekday_name(day: u8) -> &'static str {
    match day {
        0 => "Sunday",
        1 => "Monday",
        2 => "Tuesday",
        3 => "Wednesday",
        4 => "Thursday",
        5 => "Friday",
        6 => "Saturday",
        _ => "?",
    }
}

/// Truncate a string to max characters, adding "..." if truncated
fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Truncate to first line and max length
fn truncate_line(s: &str, max_chars: usize) -> String {
    let first_line = s.lines().next().unwrap_or("");
    truncate(first_line, max_chars)
}
