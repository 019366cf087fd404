//! Session store: registration, login and logout.
//!
//! Keeps an in-memory copy of the persisted user list and the current user.
//! Every change is written back as the whole `users` collection.

use std::rc::Rc;

use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::model::User;
use crate::storage::{Storage, CURRENT_USER_KEY, IS_LOGGED_IN_KEY, USERS_KEY};

/// Value of the logged-in flag while a session is active.
pub const LOGGED_IN: &str = "true";

/// Manages accounts and the authenticated session.
#[derive(Debug)]
pub struct SessionStore {
    storage: Rc<Storage>,
    users: Vec<User>,
    current_user: Option<User>,
}

impl SessionStore {
    /// Load the store, seeding `default_admin` into an empty user list.
    ///
    /// # Errors
    ///
    /// Returns an error if the persisted values cannot be read or written.
    pub fn open(storage: Rc<Storage>, default_admin: User) -> Result<Self> {
        let mut store = Self {
            storage,
            users: Vec::new(),
            current_user: None,
        };
        store.reload()?;

        if store.users.is_empty() {
            info!("Seeding default account {}", default_admin.username);
            store.users.push(default_admin);
            store.save()?;
        }

        Ok(store)
    }

    /// Register a new account.
    ///
    /// The user list is not reloaded first, so changes written by another
    /// handle since this one loaded are overwritten.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateUsername`] if the username is taken.
    pub fn register(&mut self, username: &str, password: &str) -> Result<User> {
        if self.users.iter().any(|user| user.username == username) {
            debug!("Registration rejected for existing username {}", username);
            return Err(Error::duplicate_username(username));
        }

        let id = i64::try_from(self.users.len()).unwrap_or(i64::MAX - 1) + 1;
        let user = User {
            id,
            username: username.to_string(),
            password: password.to_string(),
        };
        self.users.push(user.clone());
        self.save()?;

        info!("Registered user {} with id {}", username, id);
        Ok(user)
    }

    /// Log in with an exact username and password match.
    ///
    /// Reloads the persisted users first so registrations made through
    /// another handle are honored.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCredentials`] if no account matches.
    pub fn login(&mut self, username: &str, password: &str) -> Result<User> {
        self.reload()?;

        let Some(user) = self
            .users
            .iter()
            .find(|user| user.username == username && user.password == password)
            .cloned()
        else {
            warn!("Failed login attempt for {}", username);
            return Err(Error::InvalidCredentials);
        };

        self.storage.set_item(IS_LOGGED_IN_KEY, LOGGED_IN)?;
        self.storage.save_json(CURRENT_USER_KEY, &user)?;
        self.current_user = Some(user.clone());

        info!("User {} logged in", user.username);
        Ok(user)
    }

    /// Clear the session. Succeeds whether or not anyone was logged in.
    ///
    /// # Errors
    ///
    /// Returns an error if the persisted keys cannot be removed.
    pub fn logout(&mut self) -> Result<()> {
        self.current_user = None;
        self.storage.remove_item(IS_LOGGED_IN_KEY)?;
        self.storage.remove_item(CURRENT_USER_KEY)?;
        info!("Session cleared");
        Ok(())
    }

    /// The logged-in (or restored) user.
    #[must_use]
    pub fn current_user(&self) -> Option<&User> {
        self.current_user.as_ref()
    }

    /// All known accounts, as of the last load or registration.
    #[must_use]
    pub fn users(&self) -> &[User] {
        &self.users
    }

    /// Check the persisted logged-in flag.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be read.
    pub fn is_logged_in(&self) -> Result<bool> {
        is_logged_in(&self.storage)
    }

    fn reload(&mut self) -> Result<()> {
        if let Some(users) = self.storage.load_json::<Vec<User>>(USERS_KEY)? {
            self.users = users;
        }
        if let Some(user) = self.storage.load_json::<User>(CURRENT_USER_KEY)? {
            self.current_user = Some(user);
        }
        debug!("Loaded {} users", self.users.len());
        Ok(())
    }

    fn save(&self) -> Result<()> {
        self.storage.save_json(USERS_KEY, &self.users)
    }
}

/// Check the persisted logged-in flag. Only the exact string `"true"` counts.
///
/// # Errors
///
/// Returns an error if storage cannot be read.
pub fn is_logged_in(storage: &Storage) -> Result<bool> {
    Ok(storage.get_item(IS_LOGGED_IN_KEY)?.as_deref() == Some(LOGGED_IN))
}
