//! CLI-specific error types with exit codes.
//!
//! This module defines error types specific to the CLI layer,
//! wrapping library errors and providing appropriate exit codes.

use idserver::Error as LibError;
use std::fmt;

/// CLI-specific error type with exit code mapping.
#[derive(Debug)]
pub enum CliError {
    /// Library error (wrapped).
    Library(LibError),

    /// Invalid command-line arguments.
    InvalidArguments(String),

    /// I/O error.
    Io(std::io::Error),

    /// Configuration error.
    Config(String),
}

impl CliError {
    /// Get the appropriate exit code for this error.
    ///
    /// Exit codes:
    /// - 0: Success (not an error)
    /// - 1: The server refused the request (e.g. id exhausted)
    /// - 2: Transport failure or timeout talking to the server
    /// - 4: Invalid arguments
    /// - 5: I/O error
    /// - 6: Other library error
    /// - 7: Configuration error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Library(lib_err) if lib_err.is_remote() => 1,
            CliError::Library(lib_err) if lib_err.is_transport() => 2,
            CliError::Library(_) => 6,
            CliError::InvalidArguments(_) => 4,
            CliError::Io(_) => 5,
            CliError::Config(_) => 7,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Library(e) => write!(f, "{e}"),
            CliError::InvalidArguments(msg) => write!(f, "Invalid arguments: {msg}"),
            CliError::Io(e) => write!(f, "I/O error: {e}"),
            CliError::Config(msg) => write!(f, "Configuration error: {msg}"),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Library(e) => Some(e),
            CliError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<LibError> for CliError {
    fn from(e: LibError) -> Self {
        // Socket failures on the server side are plain I/O errors
        match e {
            LibError::Io(io) => CliError::Io(io),
            LibError::Configuration(_) => CliError::Config(e.to_string()),
            e => CliError::Library(e),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_exit_codes() {
        let remote = CliError::from(LibError::Remote {
            message: "id exhausted".into(),
        });
        assert_eq!(remote.exit_code(), 1);
        assert_eq!(remote.to_string(), "remote error: id exhausted");

        let transport = CliError::from(LibError::Transport(io::Error::new(
            io::ErrorKind::TimedOut,
            "timed out",
        )));
        assert_eq!(transport.exit_code(), 2);

        assert_eq!(CliError::InvalidArguments("x".into()).exit_code(), 4);
        assert_eq!(
            CliError::from(LibError::Io(io::Error::new(io::ErrorKind::AddrInUse, "busy")))
                .exit_code(),
            5
        );
        assert_eq!(
            CliError::from(LibError::MalformedResponse {
                details: "?".into()
            })
            .exit_code(),
            6
        );
        assert_eq!(CliError::Config("bad".into()).exit_code(), 7);
    }
}
