mod commands;
mod dates;
mod render;

use anyhow::Result;
use clap::{Parser, Subcommand};
use planner_core::controller::Controller;
use planner_core::error::PlannerError;
use planner_core::planner_config::{BackendKind, PlannerConfig};
use planner_core::store::PlannerBackend;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "planner")]
#[command(about = "Month calendar with per-day tasks and notes, plus general notes")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show a month (the current one by default)
    Month {
        #[arg(short, long)]
        year: Option<i32>,

        #[arg(short, long)]
        month: Option<u32>,

        /// Months to move from the shown month (e.g. -1 for the previous one)
        #[arg(long, allow_hyphen_values = true, default_value_t = 0)]
        offset: i32,

        /// Highlight a date and show its tasks and note (DD-MM-YYYY, "today", ...)
        #[arg(short, long)]
        select: Option<String>,
    },
    /// Show tasks and the note for a date
    Day { date: String },
    /// Add a task to a date
    Add {
        date: String,
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },
    /// Mark a task done, or not done again
    Toggle { date: String, task: String },
    /// Delete a task
    Rm { date: String, task: String },
    /// Print the note for a date, or replace it
    Note { date: String, body: Option<String> },
    /// General notes
    Notes {
        #[command(subcommand)]
        action: Option<NotesCommand>,
    },
}

#[derive(Subcommand)]
pub enum NotesCommand {
    /// List all notes
    List,
    /// Create a note (prompts for missing fields)
    Add {
        #[arg(short, long)]
        title: Option<String>,
        #[arg(short, long)]
        body: Option<String>,
    },
    /// Replace the body of a note
    Edit { note: String, body: Option<String> },
    /// Delete a note
    Rm {
        note: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();
    let config = PlannerConfig::load()?;

    tracing::debug!(backend = ?config.backend, "using backend");

    let result = match config.backend {
        BackendKind::Local => run(cli.command, Controller::new(config.local_planner()?, config.week_start)).await,
        BackendKind::Remote => run(cli.command, Controller::new(config.remote_client()?, config.week_start)).await,
    };

    result.map_err(explain)
}

async fn run<B: PlannerBackend>(command: Commands, controller: Controller<B>) -> Result<()> {
    match command {
        Commands::Month {
            year,
            month,
            offset,
            select,
        } => commands::month::run(controller, year, month, offset, select).await,
        Commands::Day { date } => commands::tasks::show(controller, &date).await,
        Commands::Add { date, text } => commands::tasks::add(controller, &date, &text.join(" ")).await,
        Commands::Toggle { date, task } => commands::tasks::toggle(controller, &date, &task).await,
        Commands::Rm { date, task } => commands::tasks::delete(controller, &date, &task).await,
        Commands::Note { date, body } => commands::note::run(controller, &date, body).await,
        Commands::Notes { action } => commands::notes::run(controller, action.unwrap_or(NotesCommand::List)).await,
    }
}

/// Add a hint for errors the user can act on.
fn explain(err: anyhow::Error) -> anyhow::Error {
    match err.downcast_ref::<PlannerError>() {
        Some(PlannerError::Authentication) => err.context(
            "The planner server rejected the request.\n\
            Set `token` in ~/.config/planner/config.toml (or PLANNER_TOKEN).",
        ),
        Some(PlannerError::Network(_)) => err.context(
            "Could not reach the planner server.\n\
            Check `server_url`, or set `backend = \"local\"` to work offline.",
        ),
        _ => err,
    }
}
