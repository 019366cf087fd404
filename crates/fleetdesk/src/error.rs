//! Error types for fleetdesk.
//!
//! This module defines all error types used throughout the fleetdesk crate.
//! Domain failures (duplicate usernames, bad credentials, missing vehicles) are
//! ordinary variants so callers branch on them like any other `Result`.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for fleetdesk operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Domain Failures ===
    /// Registration attempted with a username that is already taken.
    #[error("username already exists: {username}")]
    DuplicateUsername {
        /// The rejected username.
        username: String,
    },

    /// Login failed. Deliberately does not say which field was wrong.
    #[error("username or password incorrect")]
    InvalidCredentials,

    /// Update or delete targeted a vehicle id that is not in the fleet.
    #[error("vehicle not found: {id}")]
    RecordNotFound {
        /// The id that was looked up.
        id: i64,
    },

    /// A guarded route was requested without a logged-in session.
    #[error("authentication required to open {path}")]
    AuthenticationRequired {
        /// The route that was refused.
        path: String,
    },

    // === Storage Errors ===
    /// Failed to open or create the database.
    #[error("failed to open database at {path}: {source}")]
    DatabaseOpen {
        /// Path to the database file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// A database query failed.
    #[error("database query failed: {0}")]
    DatabaseQuery(#[from] rusqlite::Error),

    /// Failed to run database migrations.
    #[error("database migration failed: {message}")]
    DatabaseMigration {
        /// Description of what went wrong.
        message: String,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// A persisted value could not be encoded or decoded as JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for fleetdesk operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

/// The caller-correctable failures a store operation can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// See [`Error::DuplicateUsername`].
    DuplicateUsername,
    /// See [`Error::InvalidCredentials`].
    InvalidCredentials,
    /// See [`Error::RecordNotFound`].
    RecordNotFound,
}

impl Error {
    /// Create a duplicate username error.
    #[must_use]
    pub fn duplicate_username(username: impl Into<String>) -> Self {
        Self::DuplicateUsername {
            username: username.into(),
        }
    }

    /// Create a record-not-found error for a vehicle id.
    #[must_use]
    pub fn record_not_found(id: i64) -> Self {
        Self::RecordNotFound { id }
    }

    /// Classify this error as a domain failure, if it is one.
    ///
    /// Returns `None` for storage, configuration and I/O errors.
    #[must_use]
    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            Self::DuplicateUsername { .. } => Some(FailureKind::DuplicateUsername),
            Self::InvalidCredentials => Some(FailureKind::InvalidCredentials),
            Self::RecordNotFound { .. } => Some(FailureKind::RecordNotFound),
            _ => None,
        }
    }

    /// Check if this error is a redirect to the login route.
    #[must_use]
    pub fn is_authentication_required(&self) -> bool {
        matches!(self, Self::AuthenticationRequired { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidCredentials;
        assert_eq!(err.to_string(), "username or password incorrect");

        let err = Error::duplicate_username("admin");
        assert_eq!(err.to_string(), "username already exists: admin");

        let err = Error::record_not_found(42);
        assert_eq!(err.to_string(), "vehicle not found: 42");
    }

    #[test]
    fn test_failure_kind() {
        assert_eq!(
            Error::duplicate_username("x").failure_kind(),
            Some(FailureKind::DuplicateUsername)
        );
        assert_eq!(
            Error::InvalidCredentials.failure_kind(),
            Some(FailureKind::InvalidCredentials)
        );
        assert_eq!(
            Error::record_not_found(1).failure_kind(),
            Some(FailureKind::RecordNotFound)
        );
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        assert_eq!(Error::from(io_err).failure_kind(), None);
    }

    #[test]
    fn test_authentication_required() {
        let err = Error::AuthenticationRequired {
            path: "/vehicle".to_string(),
        };
        assert!(err.is_authentication_required());
        assert!(err.to_string().contains("/vehicle"));
        assert!(!Error::InvalidCredentials.is_authentication_required());
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_from_rusqlite_error() {
        let result = rusqlite::Connection::open_with_flags(
            "/nonexistent/path/db.sqlite",
            rusqlite::OpenFlags::SQLITE_OPEN_READ_ONLY,
        );
        if let Err(sqlite_err) = result {
            let err: Error = sqlite_err.into();
            assert!(matches!(err, Error::DatabaseQuery(_)));
        }
    }

    #[test]
    fn test_from_json_error() {
        let json_result: std::result::Result<Vec<i32>, serde_json::Error> =
            serde_json::from_str("[1, 2");
        if let Err(json_err) = json_result {
            let err: Error = json_err.into();
            assert!(matches!(err, Error::Json(_)));
        }
    }

    #[test]
    fn test_config_validation_error_display() {
        let err = Error::ConfigValidation {
            message: "admin_username must not be empty".to_string(),
        };
        assert!(err.to_string().contains("admin_username"));
    }

    #[test]
    fn test_directory_create_error_display() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = Error::DirectoryCreate {
            path: PathBuf::from("/root/forbidden"),
            source: io_err,
        };
        assert!(err.to_string().contains("/root/forbidden"));
    }
}
