//! Route table and navigation guard.
//!
//! Three routes exist; only vehicle management requires a logged-in session.
//! The guard consults the persisted logged-in flag, not the session store, so
//! it works from any handle onto the same storage.

use std::rc::Rc;

use serde::Serialize;
use tracing::debug;

use crate::error::Result;
use crate::session;
use crate::storage::Storage;

/// A screen of the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Route {
    /// Login form.
    Login,
    /// Registration form.
    Register,
    /// Vehicle list and editor.
    VehicleManagement,
}

/// Every route in table order.
pub const ROUTES: &[Route] = &[Route::Login, Route::Register, Route::VehicleManagement];

impl Route {
    /// URL path of the route.
    #[must_use]
    pub fn path(self) -> &'static str {
        match self {
            Self::Login => "/login",
            Self::Register => "/register",
            Self::VehicleManagement => "/vehicle",
        }
    }

    /// Display name of the route.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Login => "Login",
            Self::Register => "Register",
            Self::VehicleManagement => "VehicleManagement",
        }
    }

    /// Whether navigating here needs a logged-in session.
    #[must_use]
    pub fn requires_auth(self) -> bool {
        matches!(self, Self::VehicleManagement)
    }

    /// Look up a route by path.
    ///
    /// A single trailing slash is ignored. `/` is not a route of its own; see
    /// [`resolve_path`].
    #[must_use]
    pub fn from_path(path: &str) -> Option<Self> {
        let path = normalize(path);
        ROUTES.iter().copied().find(|route| route.path() == path)
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path())
    }
}

/// Map a path onto a route, applying the table's static redirects.
#[must_use]
pub fn resolve_path(path: &str) -> Option<Route> {
    if normalize(path) == "/" {
        return Some(Route::Login);
    }
    Route::from_path(path)
}

fn normalize(path: &str) -> &str {
    match path.strip_suffix('/') {
        Some("") | None => path,
        Some(trimmed) => trimmed,
    }
}

/// Outcome of a navigation attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Navigation {
    /// The transition is allowed.
    Proceed {
        /// Route being entered.
        route: Route,
    },
    /// The guard sent the user elsewhere.
    Redirect {
        /// Route that was asked for.
        from: Route,
        /// Route actually entered.
        to: Route,
    },
    /// No route has this path.
    NotFound {
        /// The unmatched path.
        path: String,
    },
}

impl Navigation {
    /// The route that ends up active, if any.
    #[must_use]
    pub fn route(&self) -> Option<Route> {
        match self {
            Self::Proceed { route } => Some(*route),
            Self::Redirect { to, .. } => Some(*to),
            Self::NotFound { .. } => None,
        }
    }

    /// Whether the requested route was entered as asked.
    #[must_use]
    pub fn is_proceed(&self) -> bool {
        matches!(self, Self::Proceed { .. })
    }
}

/// Pre-navigation check against the persisted logged-in flag.
#[derive(Debug)]
pub struct NavigationGuard {
    storage: Rc<Storage>,
}

impl NavigationGuard {
    /// Create a guard reading from `storage`.
    #[must_use]
    pub fn new(storage: Rc<Storage>) -> Self {
        Self { storage }
    }

    /// Decide whether `route` may be entered.
    ///
    /// # Errors
    ///
    /// Returns an error if the logged-in flag cannot be read.
    pub fn check(&self, route: Route) -> Result<Navigation> {
        if route.requires_auth() && !session::is_logged_in(&self.storage)? {
            debug!("Redirecting {} to {}", route, Route::Login);
            return Ok(Navigation::Redirect {
                from: route,
                to: Route::Login,
            });
        }
        Ok(Navigation::Proceed { route })
    }

    /// Resolve `path` through the route table, then run [`NavigationGuard::check`].
    ///
    /// # Errors
    ///
    /// Returns an error if the logged-in flag cannot be read.
    pub fn navigate(&self, path: &str) -> Result<Navigation> {
        match resolve_path(path) {
            Some(route) => self.check(route),
            None => Ok(Navigation::NotFound {
                path: path.to_string(),
            }),
        }
    }
}
