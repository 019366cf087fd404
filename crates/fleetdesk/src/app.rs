//! Application context.
//!
//! Owns the storage handle and the components built on it. Every test and
//! every command constructs its own `App`; nothing is process-global.
//!
//! The session store is loaded up front. The fleet store is loaded on first
//! use, so a damaged `vehicles` value only fails vehicle operations.

use std::rc::Rc;

use tracing::debug;

use crate::config::{Config, SeedConfig};
use crate::error::{Error, Result};
use crate::fleet::FleetStore;
use crate::guard::{Navigation, NavigationGuard, Route};
use crate::model::{default_vehicles, Vehicle};
use crate::session::SessionStore;
use crate::storage::Storage;

/// The assembled application.
#[derive(Debug)]
pub struct App {
    storage: Rc<Storage>,
    session: SessionStore,
    fleet: Option<FleetStore>,
    vehicle_seed: Vec<Vehicle>,
    guard: NavigationGuard,
}

impl App {
    /// Open the database named by `config` and load the session store.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or the session store
    /// fails to load.
    pub fn open(config: &Config) -> Result<Self> {
        let storage = Storage::open(config.database_path())?;
        Self::with_storage(storage, &config.seed)
    }

    /// Build an application on a fresh in-memory database.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory(seed: &SeedConfig) -> Result<Self> {
        Self::with_storage(Storage::open_in_memory()?, seed)
    }

    /// Build an application on an already opened storage.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails to load or seed.
    pub fn with_storage(storage: Storage, seed: &SeedConfig) -> Result<Self> {
        let storage = Rc::new(storage);
        let session = SessionStore::open(Rc::clone(&storage), seed.admin())?;

        let vehicle_seed = if seed.default_vehicles {
            default_vehicles()
        } else {
            Vec::new()
        };
        let guard = NavigationGuard::new(Rc::clone(&storage));

        debug!("Application ready on {}", storage.path().display());
        Ok(Self {
            storage,
            session,
            fleet: None,
            vehicle_seed,
            guard,
        })
    }

    /// The shared storage.
    #[must_use]
    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    /// Account and session operations.
    #[must_use]
    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    /// Mutable account and session operations.
    pub fn session_mut(&mut self) -> &mut SessionStore {
        &mut self.session
    }

    /// Vehicle operations, loading (and seeding) the fleet on first call.
    ///
    /// # Errors
    ///
    /// Returns an error if the persisted fleet cannot be read or seeded. A
    /// failed load is retried on the next call.
    pub fn fleet(&mut self) -> Result<&mut FleetStore> {
        let fleet = match self.fleet.take() {
            Some(fleet) => fleet,
            None => FleetStore::open(Rc::clone(&self.storage), &self.vehicle_seed)?,
        };
        Ok(self.fleet.insert(fleet))
    }

    /// Run the navigation guard for `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the logged-in flag cannot be read.
    pub fn navigate(&self, path: &str) -> Result<Navigation> {
        self.guard.navigate(path)
    }

    /// Enter `route`, failing if the guard redirects.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AuthenticationRequired`] when redirected to login.
    pub fn enter(&self, route: Route) -> Result<()> {
        if self.guard.check(route)?.is_proceed() {
            Ok(())
        } else {
            Err(Error::AuthenticationRequired {
                path: route.path().to_string(),
            })
        }
    }
}
