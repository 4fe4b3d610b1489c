//! Command-line arguments for the attendance front end.

use attendance_core::{parse_selection_label, AttendanceStatus, PersonId, Role};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub const DB_PATH_ENV: &str = "ATTENDANCE_DB_PATH";
const DEFAULT_DB_PATH: &str = "attendance.db";

/// Record and report daily attendance
#[derive(Parser, Debug)]
#[command(name = "attendance")]
#[command(about = "Record and report daily attendance for students, staff and workers")]
#[command(version)]
pub struct Cli {
    /// SQLite database file (falls back to $ATTENDANCE_DB_PATH, then ./attendance.db)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Absolute directory for rolling log files; logging is off when omitted
    #[arg(long, global = true)]
    pub log_dir: Option<String>,

    /// trace|debug|info|warn|error
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    #[command(flatten)]
    Store(StoreCommand),
    /// Print the core version
    Version,
}

/// Subcommands that need the attendance database.
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum StoreCommand {
    /// Register a person
    Add {
        name: String,
        #[arg(long, default_value = "Student")]
        role: Role,
    },
    /// List people as picker labels, sorted by name
    People,
    /// Mark attendance for one person on one day
    Mark {
        /// Person id, or a label printed by `people`
        person: String,
        /// YYYY-MM-DD, defaults to today
        #[arg(long)]
        date: Option<String>,
        #[arg(long, default_value = "Present")]
        status: AttendanceStatus,
    },
    /// Print the attendance report, most recent day first
    Report {
        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    pub fn db_path(&self) -> PathBuf {
        resolve_db_path(self.db.clone(), std::env::var(DB_PATH_ENV).ok())
    }
}

/// Flag wins over environment; blank environment values are ignored.
pub fn resolve_db_path(flag: Option<PathBuf>, env: Option<String>) -> PathBuf {
    flag.or_else(|| {
        env.map(|raw| raw.trim().to_string())
            .filter(|raw| !raw.is_empty())
            .map(PathBuf::from)
    })
    .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_PATH))
}

/// Accepts a bare id or a `"<name> (ID:<id>)"` label.
pub fn resolve_person_arg(text: &str) -> Option<PersonId> {
    text.trim()
        .parse::<PersonId>()
        .ok()
        .or_else(|| parse_selection_label(text))
}
