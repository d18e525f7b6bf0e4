//! Command-line interface for driver-attendance.
//!
//! This module provides the CLI structure for the `attendance` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    AdminCommand, CheckInCommand, CheckOutCommand, ConfigCommand, ListCommand, OutputFormat,
    SetCarCommand, ShiftArg, StatsCommand,
};

use crate::logging::Verbosity;

/// attendance - Driver check-in and check-out log
///
/// Records when each driver starts and ends their shift, which car they
/// took, and what they noted, one record per driver per day.
#[derive(Debug, Parser)]
#[command(name = "attendance")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Check a driver in
    CheckIn(CheckInCommand),

    /// Check a driver out
    CheckOut(CheckOutCommand),

    /// Change the car recorded on a record
    SetCar(SetCarCommand),

    /// Show the attendance table for a day
    List(ListCommand),

    /// Show attendance counters for a day
    Stats(StatsCommand),

    /// Administrative actions
    #[command(subcommand)]
    Admin(AdminCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> Verbosity {
        if self.quiet {
            Verbosity::Quiet
        } else {
            match self.verbose {
                0 => Verbosity::Normal,
                1 => Verbosity::Verbose,
                _ => Verbosity::Trace,
            }
        }
    }
}
