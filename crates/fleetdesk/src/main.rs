//! `fleetdesk` - CLI for the vehicle rental desk
//!
//! This binary is the user-facing surface: it opens the local database, runs
//! one command against the session or fleet store, and prints the result as
//! text or as a JSON outcome object.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use serde::Serialize;
use tracing::warn;

use fleetdesk::cli::{Cli, Command, ConfigCommand, OutputFormat, VehicleCommand};
use fleetdesk::{init_logging, App, Config, Navigation, Outcome, Route, User, Vehicle};

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let config = Config::load_from(cli.config.clone()).context("failed to load configuration")?;
    let format = cli.format;

    match cli.command {
        Command::Config(cmd) => handle_config(&config, cmd),
        Command::Register(args) => {
            let mut app = open_app(&config)?;
            let result = app
                .session_mut()
                .register(&args.username, &args.password);
            report(format, result, "registration successful", |user: &User| {
                format!("Registered {} (id {})", user.username, user.id)
            })
        }
        Command::Login(args) => {
            let mut app = open_app(&config)?;
            let result = app.session_mut().login(&args.username, &args.password);
            report(format, result, "login successful", |user: &User| {
                format!("Logged in as {}", user.username)
            })
        }
        Command::Logout => {
            let mut app = open_app(&config)?;
            let result = app.session_mut().logout();
            report(format, result, "logged out", |()| "Logged out".to_string())
        }
        Command::Whoami => {
            let app = open_app(&config)?;
            let result = app
                .session()
                .is_logged_in()
                .map(|logged_in| app.session().current_user().filter(|_| logged_in).cloned());
            report(format, result, "session", |user: &Option<User>| match user {
                Some(user) => format!("{} (id {})", user.username, user.id),
                None => "Not logged in".to_string(),
            })
        }
        Command::Open(cmd) => {
            let app = open_app(&config)?;
            let result = app.navigate(&cmd.path);
            report(format, result, "navigation", render_navigation)
        }
        Command::Vehicle(cmd) => {
            let mut app = open_app(&config)?;
            handle_vehicle(&mut app, cmd, format)
        }
    }
}

fn open_app(config: &Config) -> anyhow::Result<App> {
    App::open(config).with_context(|| {
        format!(
            "failed to open database at {}",
            config.database_path().display()
        )
    })
}

fn handle_vehicle(
    app: &mut App,
    cmd: VehicleCommand,
    format: OutputFormat,
) -> anyhow::Result<ExitCode> {
    if let Err(err) = app.enter(Route::VehicleManagement) {
        return report(format, Err::<(), _>(err), "", |()| String::new());
    }
    let fleet = app.fleet().context("failed to load the vehicle fleet")?;

    match cmd {
        VehicleCommand::List => {
            let result = fleet.get_all_vehicles().map(<[Vehicle]>::to_vec);
            report(format, result, "vehicles", |vehicles: &Vec<Vehicle>| {
                render_table(vehicles)
            })
        }
        VehicleCommand::Add(args) => {
            let result = fleet.add_vehicle(args.into());
            report(format, result, "vehicle added", |vehicle: &Vehicle| {
                format!("Added {}", render_vehicle(vehicle))
            })
        }
        VehicleCommand::Update(args) => {
            let patch = args.patch();
            if patch.is_empty() {
                warn!("No fields given, vehicle {} is saved unchanged", args.id);
            }
            let result = fleet.update_vehicle(args.id, &patch);
            report(format, result, "vehicle updated", |vehicle: &Vehicle| {
                format!("Updated {}", render_vehicle(vehicle))
            })
        }
        VehicleCommand::Delete { id } => {
            let result = fleet.delete_vehicle(id);
            report(format, result, "vehicle deleted", |vehicle: &Vehicle| {
                format!("Deleted {}", render_vehicle(vehicle))
            })
        }
        VehicleCommand::Search(args) => {
            let found = fleet.search_vehicles(&args.into());
            report(format, Ok(found), "search results", |vehicles: &Vec<Vehicle>| {
                render_table(vehicles)
            })
        }
        VehicleCommand::Stats => {
            let stats = fleet.stats();
            report(format, Ok(stats), "fleet statistics", |stats| {
                format!(
                    "Total:          {}\nAvailable:      {}\nRented:         {}\nAverage price:  {:.2}",
                    stats.total, stats.available, stats.rented, stats.average_price
                )
            })
        }
    }
}

/// Print `result` and pick the exit code.
///
/// Domain failures are reported, not propagated; anything else (storage,
/// I/O) becomes a fatal error.
fn report<T: Serialize>(
    format: OutputFormat,
    result: fleetdesk::Result<T>,
    message: &str,
    render: impl FnOnce(&T) -> String,
) -> anyhow::Result<ExitCode> {
    match result {
        Ok(data) => {
            match format {
                OutputFormat::Plain => println!("{}", render(&data)),
                OutputFormat::Json => print_json(&Outcome::ok(message, data))?,
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(err) if err.failure_kind().is_some() || err.is_authentication_required() => {
            match format {
                OutputFormat::Plain => eprintln!("{err}"),
                OutputFormat::Json => print_json(&Outcome::<T>::failed(&err))?,
            }
            Ok(ExitCode::FAILURE)
        }
        Err(err) => Err(err.into()),
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn render_navigation(navigation: &Navigation) -> String {
    match navigation {
        Navigation::Proceed { route } => format!("Opened {} ({})", route.path(), route.name()),
        Navigation::Redirect { from, to } => {
            format!("Redirected from {} to {}", from.path(), to.path())
        }
        Navigation::NotFound { path } => format!("No route matches {path}"),
    }
}

fn render_vehicle(vehicle: &Vehicle) -> String {
    format!(
        "{:>13}  {:<12}  {:<8}  {:>9.2}  {}",
        vehicle.id, vehicle.plate_number, vehicle.brand, vehicle.price, vehicle.status
    )
}

fn render_table(vehicles: &[Vehicle]) -> String {
    if vehicles.is_empty() {
        return "No vehicles".to_string();
    }
    let mut lines = vec![format!(
        "{:>13}  {:<12}  {:<8}  {:>9}  {}",
        "ID", "PLATE", "BRAND", "PRICE", "STATUS"
    )];
    lines.extend(vehicles.iter().map(render_vehicle));
    lines.join("\n")
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<ExitCode> {
    match cmd {
        ConfigCommand::Show => {
            println!("{}", serde_json::to_string_pretty(config)?);
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => {
                    println!("Configuration error: {e}");
                    return Ok(ExitCode::FAILURE);
                }
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}
