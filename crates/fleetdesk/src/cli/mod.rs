//! Command-line interface for fleetdesk.
//!
//! This module provides the CLI structure for the `fleetdesk` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    AccountArgs, AddArgs, ConfigCommand, OpenCommand, OutputFormat, SearchArgs, StatusArg,
    UpdateArgs, VehicleCommand,
};

/// fleetdesk - Vehicle rental desk
///
/// Register and log in, then list, add, edit, search and remove rental
/// vehicles. Everything is kept in a local database file.
#[derive(Debug, Parser)]
#[command(name = "fleetdesk")]
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

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value = "plain")]
    pub format: OutputFormat,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create an account
    Register(AccountArgs),

    /// Log in and remember the session
    Login(AccountArgs),

    /// End the current session
    Logout,

    /// Show the logged-in user
    Whoami,

    /// Navigate to a route and report where the guard lands
    Open(OpenCommand),

    /// Manage rental vehicles
    #[command(subcommand)]
    Vehicle(VehicleCommand),

    /// View configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        if self.quiet {
            crate::logging::Verbosity::Quiet
        } else {
            match self.verbose {
                0 => crate::logging::Verbosity::Normal,
                1 => crate::logging::Verbosity::Verbose,
                _ => crate::logging::Verbosity::Trace,
            }
        }
    }
}
