//! `fleetdesk` - A small vehicle rental desk
//!
//! This library provides account registration and login, a vehicle fleet with
//! create/read/update/delete and search, and a route guard, all persisted in a
//! local string-keyed store.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod fleet;
pub mod guard;
pub mod logging;
pub mod model;
pub mod outcome;
pub mod session;
pub mod storage;

pub use app::App;
pub use config::Config;
pub use error::{Error, FailureKind, Result};
pub use fleet::{FleetStats, FleetStore};
pub use guard::{Navigation, NavigationGuard, Route};
pub use logging::init_logging;
pub use model::{NewVehicle, SearchCriteria, User, Vehicle, VehiclePatch, VehicleStatus};
pub use outcome::Outcome;
pub use session::SessionStore;
pub use storage::Storage;
