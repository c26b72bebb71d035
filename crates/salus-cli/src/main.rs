//! Salus CLI
//!
//! Command-line interface for Salus - rehabilitation cycles, tasks and
//! completion records.

use std::fs::File;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use salus_core::{
    CompletionStore, CompletionUpdate, Config, CycleStore, CycleUpdate, ExerciseStore,
    ExerciseUpdate, HttpApiClient, NewCompletion, NewCycle, NewExercise, NewTask, RecoveryApi,
    TaskCompletion, TaskStore, TaskUpdate,
};

mod commands;
mod output;
mod prompt;

use commands::completion::RecordQuery;
use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "salus")]
#[command(about = "Salus - Rehabilitation training tracker")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Use this config file instead of the default
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Backend base URL (overrides config and SALUS_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage recovery cycles
    Cycle {
        #[command(subcommand)]
        command: CycleCommands,
    },
    /// Manage training tasks
    Task {
        #[command(subcommand)]
        command: TaskCommands,
    },
    /// Manage exercise types
    Exercise {
        #[command(subcommand)]
        command: ExerciseCommands,
    },
    /// Manage completion records
    Completion {
        #[command(subcommand)]
        command: CompletionCommands,
    },
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand)]
enum CycleCommands {
    /// List all cycles
    #[command(alias = "ls")]
    List,
    /// Show a cycle with its tasks
    Show { id: i64 },
    /// Create a new cycle
    #[command(alias = "add")]
    Create {
        #[arg(short, long)]
        name: String,
        /// First day (YYYY-MM-DD)
        #[arg(long)]
        start: NaiveDate,
        /// Last day (YYYY-MM-DD)
        #[arg(long)]
        end: NaiveDate,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Update a cycle
    Update {
        id: i64,
        #[arg(short, long)]
        name: Option<String>,
        #[arg(long)]
        start: Option<NaiveDate>,
        #[arg(long)]
        end: Option<NaiveDate>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Delete a cycle
    #[command(alias = "rm")]
    Delete {
        id: i64,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Inclusive number of days between two dates
    Duration { start: NaiveDate, end: NaiveDate },
}

#[derive(Subcommand)]
enum TaskCommands {
    /// List tasks
    #[command(alias = "ls")]
    List {
        #[arg(short, long)]
        cycle: Option<i64>,
        /// Day of week, 0 (Sunday) to 6 (Saturday)
        #[arg(short, long)]
        day: Option<u8>,
        /// Specific date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Show a task with its completion records
    Show { id: i64 },
    /// Schedule a new task
    #[command(alias = "add")]
    Create {
        #[arg(short, long)]
        cycle: i64,
        #[arg(short, long)]
        exercise: i64,
        /// Time of day, e.g. 08:30
        #[arg(short, long)]
        time: String,
        #[arg(short, long)]
        sets: i64,
        /// Repeat weekly on this day, 0 (Sunday) to 6 (Saturday)
        #[arg(short, long)]
        day: Option<u8>,
        /// Pin to one date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Update a task
    Update {
        id: i64,
        /// Cycle the task belongs to; also scopes the refresh
        #[arg(short, long)]
        cycle: Option<i64>,
        #[arg(short, long)]
        exercise: Option<i64>,
        #[arg(short, long)]
        time: Option<String>,
        #[arg(short, long)]
        sets: Option<i64>,
        #[arg(short, long)]
        day: Option<u8>,
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long)]
        completed: Option<bool>,
    },
    /// Mark a task completed
    #[command(alias = "done")]
    Complete {
        id: i64,
        /// Cycle of the task, to refresh its task list afterwards
        #[arg(short, long)]
        cycle: Option<i64>,
        /// Sets actually performed
        #[arg(short, long)]
        sets: Option<i64>,
        #[arg(short, long)]
        notes: Option<String>,
    },
    /// Tasks scheduled for today in a cycle
    Today { cycle: i64 },
}

#[derive(Subcommand)]
enum ExerciseCommands {
    /// List exercise types
    #[command(alias = "ls")]
    List,
    /// Show an exercise type
    Show { id: i64 },
    /// Create an exercise type
    #[command(alias = "add")]
    Create {
        #[arg(short, long)]
        name: String,
        /// Seconds per set
        #[arg(long)]
        duration: i64,
        /// Rest seconds between sets
        #[arg(long)]
        rest: i64,
        #[arg(long)]
        description: Option<String>,
    },
    /// Update an exercise type
    Update {
        id: i64,
        #[arg(short, long)]
        name: Option<String>,
        #[arg(long)]
        duration: Option<i64>,
        #[arg(long)]
        rest: Option<i64>,
        #[arg(long)]
        description: Option<String>,
    },
    /// Delete an exercise type
    #[command(alias = "rm")]
    Delete {
        id: i64,
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum CompletionCommands {
    /// List completion records
    #[command(alias = "ls")]
    List {
        #[command(flatten)]
        query: QueryArgs,
    },
    /// Show a completion record
    Show { id: i64 },
    /// Record a completion
    #[command(alias = "add")]
    Create {
        #[arg(short, long)]
        task: i64,
        /// Cycle of the task; also scopes the refresh
        #[arg(short, long)]
        cycle: Option<i64>,
        #[arg(short, long)]
        sets: Option<i64>,
        #[arg(short, long)]
        notes: Option<String>,
    },
    /// Update a completion record
    Update {
        id: i64,
        /// Cycle to refresh afterwards
        #[arg(short, long)]
        cycle: Option<i64>,
        #[arg(short, long)]
        sets: Option<i64>,
        #[arg(short, long)]
        notes: Option<String>,
    },
    /// Delete a completion record
    #[command(alias = "rm")]
    Delete {
        id: i64,
        /// Cycle to refresh afterwards
        #[arg(short, long)]
        cycle: Option<i64>,
        #[arg(short, long)]
        yes: bool,
    },
    /// Completion statistics
    Stats {
        #[command(flatten)]
        query: QueryArgs,
    },
}

#[derive(clap::Args)]
struct QueryArgs {
    #[arg(short, long)]
    cycle: Option<i64>,
    #[arg(short, long)]
    task: Option<i64>,
    /// Earliest completion date (YYYY-MM-DD)
    #[arg(long)]
    from: Option<NaiveDate>,
    /// Latest completion date (YYYY-MM-DD)
    #[arg(long)]
    to: Option<NaiveDate>,
}

impl From<QueryArgs> for RecordQuery {
    fn from(args: QueryArgs) -> Self {
        RecordQuery {
            cycle: args.cycle,
            task: args.task,
            from: args.from,
            to: args.to,
        }
    }
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (api_url, locale, log_file)
        key: String,
        /// Configuration value
        value: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let Cli {
        json,
        quiet,
        config: config_path,
        api_url,
        command,
    } = Cli::parse();
    let output = Output::new(OutputFormat::from_flags(json, quiet));

    let mut config = Config::load_with_cli_override(config_path.as_ref())
        .context("Failed to load configuration")?;
    if let Some(url) = api_url {
        config.api_url = url;
    }

    init_logging(&config);

    // Config commands never talk to the backend
    if let Commands::Config { command } = command {
        return match command {
            Some(ConfigCommands::Show) | None => {
                commands::config::show(&config, config_path.as_ref(), &output)
            }
            Some(ConfigCommands::Set { key, value }) => {
                commands::config::set(key, value, config_path.as_ref(), &output)
            }
        };
    }

    let api: Arc<dyn RecoveryApi> = Arc::new(
        HttpApiClient::from_config(&config).context("Failed to create backend client")?,
    );
    debug!("Using backend {} ({})", config.api_url, config.locale);

    match command {
        Commands::Cycle { command } => {
            let store = CycleStore::new(api, config.locale);
            handle_cycle_command(command, &store, &output).await
        }
        Commands::Task { command } => {
            let store = TaskStore::new(api, config.locale);
            handle_task_command(command, &store, &output).await
        }
        Commands::Exercise { command } => {
            let store = ExerciseStore::new(api, config.locale);
            handle_exercise_command(command, &store, &output).await
        }
        Commands::Completion { command } => {
            let store = CompletionStore::new(api, config.locale);
            handle_completion_command(command, &store, &output).await
        }
        Commands::Config { .. } => unreachable!(), // Handled above
    }
}

async fn handle_cycle_command(
    command: CycleCommands,
    store: &CycleStore,
    output: &Output,
) -> Result<()> {
    match command {
        CycleCommands::List => commands::cycle::list(store, output).await,
        CycleCommands::Show { id } => commands::cycle::show(store, id, output).await,
        CycleCommands::Create {
            name,
            start,
            end,
            notes,
        } => {
            let cycle = NewCycle {
                name,
                start_date: start,
                end_date: end,
                notes,
            };
            commands::cycle::create(store, cycle, output).await
        }
        CycleCommands::Update {
            id,
            name,
            start,
            end,
            notes,
        } => {
            let update = CycleUpdate {
                name,
                start_date: start,
                end_date: end,
                notes,
            };
            commands::cycle::update(store, id, update, output).await
        }
        CycleCommands::Delete { id, yes } => commands::cycle::delete(store, id, yes, output).await,
        CycleCommands::Duration { start, end } => commands::cycle::duration(start, end, output),
    }
}

async fn handle_task_command(
    command: TaskCommands,
    store: &TaskStore,
    output: &Output,
) -> Result<()> {
    match command {
        TaskCommands::List { cycle, day, date } => {
            commands::task::list(store, cycle, day, date, output).await
        }
        TaskCommands::Show { id } => commands::task::show(store, id, output).await,
        TaskCommands::Create {
            cycle,
            exercise,
            time,
            sets,
            day,
            date,
        } => {
            let task = NewTask {
                cycle_id: cycle,
                exercise_id: exercise,
                scheduled_time: time,
                sets,
                day_of_week: day,
                specific_date: date,
            };
            commands::task::create(store, task, output).await
        }
        TaskCommands::Update {
            id,
            cycle,
            exercise,
            time,
            sets,
            day,
            date,
            completed,
        } => {
            let update = TaskUpdate {
                cycle_id: cycle,
                exercise_id: exercise,
                scheduled_time: time,
                sets,
                day_of_week: day,
                specific_date: date,
                is_completed: completed,
            };
            commands::task::update(store, id, update, output).await
        }
        TaskCommands::Complete {
            id,
            cycle,
            sets,
            notes,
        } => {
            let completion = TaskCompletion {
                actual_sets: sets,
                notes,
            };
            commands::task::complete(store, id, cycle, completion, output).await
        }
        TaskCommands::Today { cycle } => commands::task::today(store, cycle, output).await,
    }
}

async fn handle_exercise_command(
    command: ExerciseCommands,
    store: &ExerciseStore,
    output: &Output,
) -> Result<()> {
    match command {
        ExerciseCommands::List => commands::exercise::list(store, output).await,
        ExerciseCommands::Show { id } => commands::exercise::show(store, id, output).await,
        ExerciseCommands::Create {
            name,
            duration,
            rest,
            description,
        } => {
            let exercise = NewExercise {
                name,
                duration_sec: duration,
                rest_sec: rest,
                description,
            };
            commands::exercise::create(store, exercise, output).await
        }
        ExerciseCommands::Update {
            id,
            name,
            duration,
            rest,
            description,
        } => {
            let update = ExerciseUpdate {
                name,
                duration_sec: duration,
                rest_sec: rest,
                description,
            };
            commands::exercise::update(store, id, update, output).await
        }
        ExerciseCommands::Delete { id, yes } => {
            commands::exercise::delete(store, id, yes, output).await
        }
    }
}

async fn handle_completion_command(
    command: CompletionCommands,
    store: &CompletionStore,
    output: &Output,
) -> Result<()> {
    match command {
        CompletionCommands::List { query } => {
            commands::completion::list(store, query.into(), output).await
        }
        CompletionCommands::Show { id } => commands::completion::show(store, id, output).await,
        CompletionCommands::Create {
            task,
            cycle,
            sets,
            notes,
        } => {
            let completion = NewCompletion {
                task_id: task,
                cycle_id: cycle,
                actual_sets: sets,
                notes,
            };
            commands::completion::create(store, completion, output).await
        }
        CompletionCommands::Update {
            id,
            cycle,
            sets,
            notes,
        } => {
            let update = CompletionUpdate {
                cycle_id: cycle,
                actual_sets: sets,
                notes,
            };
            commands::completion::update(store, id, update, output).await
        }
        CompletionCommands::Delete { id, cycle, yes } => {
            commands::completion::delete(store, id, cycle, yes, output).await
        }
        CompletionCommands::Stats { query } => {
            commands::completion::stats(store, query.into(), output).await
        }
    }
}

/// Initialize logging
///
/// Only initializes if SALUS_LOG environment variable is set.
/// Logs to config.log_file when set, otherwise to stderr.
fn init_logging(config: &Config) {
    let Ok(log_level) = std::env::var("SALUS_LOG") else {
        return;
    };

    let env_filter = EnvFilter::new(format!(
        "salus_core={},salus_cli={}",
        log_level, log_level
    ));

    match config.log_file {
        Some(ref log_path) => {
            let log_file = match File::create(log_path) {
                Ok(f) => f,
                Err(e) => {
                    eprintln!("Warning: Could not create log file {:?}: {}", log_path, e);
                    return;
                }
            };

            let _ = tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(log_file))
                .try_init();

            debug!("Logging to {:?}", log_path);
        }
        None => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .try_init();
        }
    }
}
