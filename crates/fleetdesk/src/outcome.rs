//! Structured operation results for the user-facing surface.
//!
//! Store operations return `Result`; this wraps either side into one
//! serializable shape carrying a success flag and a human-readable message.

use serde::Serialize;

use crate::error::{Error, FailureKind};

/// Result of one user-facing operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Outcome<T> {
    /// Whether the operation succeeded.
    pub success: bool,
    /// Message suitable for showing to the user.
    pub message: String,
    /// Failure classification, for domain failures only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<&'static str>,
    /// Payload of a successful operation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> Outcome<T> {
    /// A success carrying `data`.
    #[must_use]
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            failure: None,
            data: Some(data),
        }
    }

    /// A failure built from `error`.
    #[must_use]
    pub fn failed(error: &Error) -> Self {
        Self {
            success: false,
            message: error.to_string(),
            failure: error.failure_kind().map(FailureKind::as_str),
            data: None,
        }
    }
}

impl FailureKind {
    /// Stable name used in structured output.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::DuplicateUsername => "DuplicateUsername",
            Self::InvalidCredentials => "InvalidCredentials",
            Self::RecordNotFound => "RecordNotFound",
        }
    }
}
