//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

use crate::model::{NewVehicle, SearchCriteria, VehiclePatch, VehicleStatus};

/// Username and password pair.
#[derive(Debug, Args)]
pub struct AccountArgs {
    /// Account name (case-sensitive)
    pub username: String,

    /// Account password
    pub password: String,
}

/// Navigation command arguments.
#[derive(Debug, Args)]
pub struct OpenCommand {
    /// Route path, e.g. /vehicle
    pub path: String,
}

/// Vehicle management commands. All of them require a logged-in session.
#[derive(Debug, Subcommand)]
pub enum VehicleCommand {
    /// List every vehicle
    List,

    /// Add a vehicle
    Add(AddArgs),

    /// Change fields of a vehicle
    Update(UpdateArgs),

    /// Delete a vehicle
    Delete {
        /// Vehicle id
        id: i64,
    },

    /// Filter vehicles by plate, brand and status
    Search(SearchArgs),

    /// Show available/rented counts and the average price
    Stats,
}

/// Arguments of `vehicle add`.
#[derive(Debug, Args)]
pub struct AddArgs {
    /// License plate
    #[arg(short, long)]
    pub plate: String,

    /// Manufacturer
    #[arg(short, long)]
    pub brand: String,

    /// Daily price
    #[arg(long, allow_negative_numbers = true)]
    pub price: f64,

    /// Initial status
    #[arg(short, long, value_enum, default_value = "available")]
    pub status: StatusArg,

    /// Use this id instead of a generated one
    #[arg(long)]
    pub id: Option<i64>,
}

impl From<AddArgs> for NewVehicle {
    fn from(args: AddArgs) -> Self {
        Self {
            id: args.id,
            plate_number: args.plate,
            brand: args.brand,
            price: args.price,
            status: args.status.into(),
        }
    }
}

/// Arguments of `vehicle update`.
#[derive(Debug, Args)]
pub struct UpdateArgs {
    /// Vehicle id
    pub id: i64,

    /// New license plate
    #[arg(short, long)]
    pub plate: Option<String>,

    /// New manufacturer
    #[arg(short, long)]
    pub brand: Option<String>,

    /// New daily price
    #[arg(long, allow_negative_numbers = true)]
    pub price: Option<f64>,

    /// New status
    #[arg(short, long, value_enum)]
    pub status: Option<StatusArg>,
}

impl UpdateArgs {
    /// The fields to change.
    #[must_use]
    pub fn patch(&self) -> VehiclePatch {
        VehiclePatch {
            plate_number: self.plate.clone(),
            brand: self.brand.clone(),
            price: self.price,
            status: self.status.map(Into::into),
        }
    }
}

/// Arguments of `vehicle search`.
#[derive(Debug, Args)]
pub struct SearchArgs {
    /// Plate number substring (case-insensitive)
    #[arg(short, long)]
    pub plate: Option<String>,

    /// Brand substring (case-insensitive)
    #[arg(short, long)]
    pub brand: Option<String>,

    /// Exact status
    #[arg(short, long, value_enum)]
    pub status: Option<StatusArg>,
}

impl From<SearchArgs> for SearchCriteria {
    fn from(args: SearchArgs) -> Self {
        Self {
            plate_number: args.plate,
            brand: args.brand,
            status: args.status.map(Into::into),
        }
    }
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show,

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(long)]
        file: Option<PathBuf>,
    },
}

/// Vehicle status argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StatusArg {
    /// Can be rented
    Available,
    /// Out with a customer
    Rented,
    /// Off the rental line
    Unavailable,
}

impl From<StatusArg> for VehicleStatus {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::Available => Self::Available,
            StatusArg::Rented => Self::Rented,
            StatusArg::Unavailable => Self::Unavailable,
        }
    }
}

/// Output format for commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Plain text output
    #[default]
    Plain,
    /// JSON output
    Json,
}
