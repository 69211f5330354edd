// Error types for the critter CLI.
//
// Every failure a command can hit, from a mistyped line to a dropped
// connection, is a `CritterError`. The shell renders most of them and
// keeps going; see `CritterError::is_fatal`.

use thiserror::Error;

use crate::api::RequestLine;

#[derive(Error, Debug)]
pub enum CritterError {
    /// Blank input line.
    #[error("Invalid command")]
    Invalid,

    /// Wrong argument count for a known command; carries the usage text.
    #[error("Usage: {0}")]
    Usage(&'static str),

    #[error("Invalid user id '{0}'")]
    InvalidUserId(String),

    /// A friends command was issued before a successful login.
    #[error("You are not logged in. Use 'critter login <username> <password>' first.")]
    AuthRequired,

    #[error("Unknown command '{0}'")]
    UnknownCommand(String),

    /// The server answered with a non-success status.
    #[error("Request failed: {status} {reason}")]
    Remote {
        request: RequestLine,
        status: u16,
        reason: String,
        body: String,
    },

    /// The request never produced a usable response.
    #[error("Request error: {0}")]
    Transport(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Console error: {0}")]
    Io(#[from] std::io::Error),
}

impl CritterError {
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Fatal errors end the input loop instead of being printed.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Io(_) | Self::Config(_))
    }
}

pub type Result<T> = std::result::Result<T, CritterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_command_echoes_input() {
        let err = CritterError::UnknownCommand("critter dance".into());
        assert_eq!(err.to_string(), "Unknown command 'critter dance'");
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_remote_display_has_status_and_reason() {
        let err = CritterError::Remote {
            request: RequestLine::new("GET", "http://localhost/admin/users", "HTTP/1.1"),
            status: 403,
            reason: "Forbidden".into(),
            body: "nope".into(),
        };
        assert_eq!(err.to_string(), "Request failed: 403 Forbidden");
    }

    #[test]
    fn test_fatal_classification() {
        let io = CritterError::from(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"));
        assert!(io.is_fatal());
        assert!(CritterError::config("bad url").is_fatal());
        assert!(!CritterError::AuthRequired.is_fatal());
        assert!(!CritterError::transport("refused").is_fatal());
    }
}
