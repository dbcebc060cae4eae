//! Error types for the idserver library.
//!
//! A single error hierarchy covers pool construction, request decoding on
//! the server side, and transport/remote failures on the client side, using
//! `thiserror` for the boilerplate.

use thiserror::Error;

/// Result type alias for operations that may fail with an idserver error.
///
/// # Examples
///
/// ```
/// use idserver::{Error, Result};
///
/// fn example_operation() -> Result<String> {
///     Ok("name-0".to_string())
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for the idserver library.
///
/// Ordinary lease outcomes ("no identifier free", "nothing to release") are
/// not errors; they are expressed through `Option` and no-ops on
/// [`IdPool`](crate::IdPool).
#[derive(Debug, Error)]
pub enum Error {
    /// A validation error occurred.
    #[error("validation error for '{field}': {message}")]
    Validation {
        /// The field that failed validation.
        field: String,
        /// A description of the validation failure.
        message: String,
    },

    /// A configuration file could not be parsed.
    #[error("configuration error: {0}")]
    Configuration(#[from] serde_yaml::Error),

    /// A server-side I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A request was missing a required field.
    #[error("{field} missing")]
    MissingField {
        /// Name of the missing field.
        field: &'static str,
    },

    /// A request named an action the server does not implement.
    #[error("action \"{action}\" is not recognized")]
    UnknownAction {
        /// The offending action.
        action: String,
    },

    /// A request could not be decoded.
    #[error("invalid request: {0}")]
    InvalidRequest(#[source] serde_json::Error),

    /// The pool lock was poisoned by a panicking thread.
    #[error("lease pool unavailable")]
    PoolUnavailable,

    /// The server answered with a non-zero error code.
    #[error("remote error: {message}")]
    Remote {
        /// The message returned by the server, verbatim.
        message: String,
    },

    /// The send/receive primitive failed (timeout, reset, refused).
    #[error("transport error: {0}")]
    Transport(#[source] std::io::Error),

    /// The server reply was not a valid response envelope.
    #[error("malformed response: {details}")]
    MalformedResponse {
        /// What was wrong with the reply.
        details: String,
    },
}

impl Error {
    /// Check if the error was reported by the remote server.
    ///
    /// # Examples
    ///
    /// ```
    /// use idserver::Error;
    ///
    /// let err = Error::Remote { message: "id exhausted".to_string() };
    /// assert!(err.is_remote());
    /// assert!(!err.is_transport());
    /// ```
    #[must_use]
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote { .. })
    }

    /// Check if the error came from the transport rather than the server.
    ///
    /// Transport failures are the ones worth retrying; the request may or
    /// may not have reached the server.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}
