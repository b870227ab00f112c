//! Command-line interface definition.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use icsimport_core::TracingOutputFormat;
use icsimport_engine::{DuplicateHandling, ImportOptions};

/// icsimport - Import iCalendar files into a calendar store
#[derive(Debug, Parser)]
#[command(name = "icsimport")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, short, env = "ICSIMPORT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Path to the JSON store file
    #[arg(long, env = "ICSIMPORT_STORE")]
    pub store: Option<PathBuf>,

    /// Enable debug output
    #[arg(long, short = 'v')]
    pub verbose: bool,

    /// Log line format
    #[arg(long, value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Import the events of an .ics file into a calendar
    Import(ImportArgs),

    /// Delete the stored copies of the events of an .ics file
    Delete(ImportArgs),

    /// Calendar commands
    Calendars {
        #[command(subcommand)]
        action: Option<CalendarAction>,
    },

    /// Configuration commands
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Arguments shared by `import` and `delete`.
#[derive(Debug, Args)]
pub struct ImportArgs {
    /// The .ics file to read
    pub file: PathBuf,

    /// Destination calendar id
    #[arg(long, short = 'C')]
    pub calendar: String,

    /// What to do with events that already exist
    #[arg(long, value_enum)]
    pub duplicates: Option<DuplicatePolicy>,

    /// Match existing events by UID
    #[arg(long)]
    pub match_uids: Option<bool>,

    /// Treat UIDs as unique across all calendars
    #[arg(long)]
    pub global_uids: Option<bool>,

    /// Keep the alarms of imported events
    #[arg(long)]
    pub import_reminders: Option<bool>,

    /// Reminder minutes for events without alarms (can be repeated)
    #[arg(long = "default-reminder", action = clap::ArgAction::Append)]
    pub default_reminders: Vec<u32>,
}

impl ImportArgs {
    /// Applies the flags given on the command line on top of `options`.
    pub fn apply_to(&self, mut options: ImportOptions) -> ImportOptions {
        if let Some(policy) = self.duplicates {
            options.duplicate_handling = policy.into();
        }
        if let Some(match_uids) = self.match_uids {
            options.match_uids = match_uids;
        }
        if let Some(global_uids) = self.global_uids {
            options.global_uids = global_uids;
        }
        if let Some(import_reminders) = self.import_reminders {
            options.import_reminders = import_reminders;
        }
        if !self.default_reminders.is_empty() {
            options.default_reminders = self.default_reminders.clone();
        }
        options
    }
}

/// Duplicate handling policy names on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DuplicatePolicy {
    DontCheck,
    Ignore,
    Replace,
    ReplaceAny,
}

impl From<DuplicatePolicy> for DuplicateHandling {
    fn from(policy: DuplicatePolicy) -> Self {
        match policy {
            DuplicatePolicy::DontCheck => Self::DontCheck,
            DuplicatePolicy::Ignore => Self::Ignore,
            DuplicatePolicy::Replace => Self::Replace,
            DuplicatePolicy::ReplaceAny => Self::ReplaceAny,
        }
    }
}

/// Log line formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

impl From<LogFormat> for TracingOutputFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Compact => Self::Compact,
            LogFormat::Pretty => Self::Pretty,
            LogFormat::Json => Self::Json,
        }
    }
}

/// Calendar actions.
#[derive(Debug, Subcommand)]
pub enum CalendarAction {
    /// List calendars (default)
    List,

    /// Create a calendar
    Add {
        /// Calendar id
        id: String,
        /// Display name
        name: String,
    },
}

/// Configuration actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Dump current configuration
    Dump,

    /// Show configuration file path
    Path,
}
