//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Subcommand, ValueEnum};

use crate::record::Shift;

/// Check-in command arguments.
#[derive(Debug, Args)]
pub struct CheckInCommand {
    /// Driver's full name
    #[arg(short, long)]
    pub driver: String,

    /// Shift the driver is working
    #[arg(short, long, value_enum)]
    pub shift: ShiftArg,

    /// Car number handed to the driver (1-1000)
    #[arg(long)]
    pub car: Option<String>,

    /// Log entry for the check-in
    #[arg(short, long)]
    pub log: String,

    /// Attendance day (defaults to today, UTC)
    #[arg(long, value_name = "YYYY-MM-DD")]
    pub date: Option<NaiveDate>,
}

/// Check-out command arguments.
#[derive(Debug, Args)]
pub struct CheckOutCommand {
    /// Driver's full name
    #[arg(short, long)]
    pub driver: String,

    /// Shift, needed only when the driver has no record for the day
    #[arg(short, long, value_enum)]
    pub shift: Option<ShiftArg>,

    /// Log entry for the check-out
    #[arg(short, long)]
    pub log: String,

    /// Attendance day (defaults to today, UTC)
    #[arg(long, value_name = "YYYY-MM-DD")]
    pub date: Option<NaiveDate>,
}

/// Direct car edit arguments.
#[derive(Debug, Args)]
pub struct SetCarCommand {
    /// Record identifier (shown by `list`)
    pub id: String,

    /// New car value, stored as given
    pub car: String,
}

/// List command arguments.
#[derive(Debug, Args)]
pub struct ListCommand {
    /// Day to list (defaults to today, UTC)
    #[arg(long, value_name = "YYYY-MM-DD")]
    pub date: Option<NaiveDate>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

/// Stats command arguments.
#[derive(Debug, Args)]
pub struct StatsCommand {
    /// Day to count (defaults to today, UTC)
    #[arg(long, value_name = "YYYY-MM-DD")]
    pub date: Option<NaiveDate>,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Admin commands.
#[derive(Debug, Subcommand)]
pub enum AdminCommand {
    /// Delete every attendance record
    Clear {
        /// Admin password
        #[arg(short, long)]
        password: String,

        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Shift argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ShiftArg {
    /// 7:00 AM - 4:00 PM
    #[value(name = "7am-4pm")]
    Morning,
    /// 4:00 PM - 1:00 AM
    #[value(name = "4pm-1am")]
    Evening,
    /// 8:00 AM - 5:00 PM
    #[value(name = "8am-5pm")]
    Day,
    /// 5:00 PM - 2:00 AM
    #[value(name = "5pm-2am")]
    Night,
}

impl From<ShiftArg> for Shift {
    fn from(arg: ShiftArg) -> Self {
        match arg {
            ShiftArg::Morning => Self::Morning,
            ShiftArg::Evening => Self::Evening,
            ShiftArg::Day => Self::Day,
            ShiftArg::Night => Self::Night,
        }
    }
}

/// Output format for commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Plain text output
    #[default]
    Plain,
    /// Formatted table
    Table,
    /// JSON output
    Json,
}
