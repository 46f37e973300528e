//! Instructor-led training CLI library

pub mod app;
pub mod attendance;
pub mod question;
pub mod roster;
pub mod schedule;
pub mod upload;

use std::path::PathBuf;

use chrono::NaiveDateTime;
use il_api_contract::Role;
use tracing_subscriber::EnvFilter;

pub use app::App;

// Re-export CLI types for testing
pub use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "il")]
#[command(about = "Instructor-led training: attendance, questions and schedules")]
#[command(version, author, long_about = None)]
pub struct Cli {
    /// Configuration file (defaults to $IL_HOME/config.json when present)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// SQLite database path, overriding the configuration
    #[arg(long, global = true, env = "IL_DB", value_name = "FILE")]
    pub db: Option<PathBuf>,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, global = true, env = "IL_LOG", default_value = "warn")]
    pub log_level: String,

    /// User id of the caller
    #[arg(long = "as", global = true, env = "IL_USER", value_name = "USER_ID")]
    pub user_id: Option<String>,

    /// Role of the caller
    #[arg(long, global = true, env = "IL_ROLE")]
    pub role: Option<Role>,

    /// Pin the clock, e.g. "2024-03-11 20:00:00"
    #[arg(long, global = true, env = "IL_NOW", hide = true, value_parser = parse_now)]
    pub now: Option<NaiveDateTime>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Attendance placeholders, outcomes and daily summary
    Attendance {
        #[command(subcommand)]
        subcommand: attendance::AttendanceCommands,
    },
    /// Questions between participants and trainers
    Question {
        #[command(subcommand)]
        subcommand: question::QuestionCommands,
    },
    /// Upload proof of activity for the latest started session
    Upload(upload::UploadArgs),
    /// Schedule administration
    Schedule {
        #[command(subcommand)]
        subcommand: schedule::ScheduleCommands,
    },
    /// Participant and user profile updates
    Roster {
        #[command(subcommand)]
        subcommand: roster::RosterCommands,
    },
}

fn parse_now(value: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S"))
}

impl Cli {
    /// Run the selected command and return its JSON result.
    pub async fn execute(self) -> anyhow::Result<serde_json::Value> {
        let app = App::from_cli(&self)?;
        match self.command {
            Commands::Attendance { subcommand } => subcommand.run(&app).await,
            Commands::Question { subcommand } => subcommand.run(&app).await,
            Commands::Upload(args) => args.run(&app).await,
            Commands::Schedule { subcommand } => subcommand.run(&app).await,
            Commands::Roster { subcommand } => subcommand.run(&app).await,
        }
    }
}

/// Initialise the global subscriber; RUST_LOG wins over `level`.
pub fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
