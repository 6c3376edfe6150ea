//! Application error types with rich context

use std::path::PathBuf;
use thiserror::Error;

use crate::validation::ValidationErrors;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Application error types organized by layer/domain
#[derive(Debug, Error)]
pub enum Error {
    // ─────────────────────────────────────────────────────────────
    // Common/Infrastructure Errors
    // ─────────────────────────────────────────────────────────────
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    // ─────────────────────────────────────────────────────────────
    // Terminal/TUI Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Terminal error: {message}")]
    Terminal { message: String },

    #[error("Failed to initialize terminal: {0}")]
    TerminalInit(String),

    // ─────────────────────────────────────────────────────────────
    // Backend/HTTP Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Could not reach backend: {message}")]
    Transport { message: String },

    #[error("Backend returned {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Request timed out after {secs}s")]
    Timeout { secs: u64 },

    #[error("Unexpected response from backend: {message}")]
    Decode { message: String },

    #[error("Invalid backend URL: {url}")]
    InvalidUrl { url: String },

    // ─────────────────────────────────────────────────────────────
    // Configuration / Credential Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: PathBuf },

    #[error("Credential store error: {message}")]
    Credentials { message: String },

    // ─────────────────────────────────────────────────────────────
    // Client-side validation
    // ─────────────────────────────────────────────────────────────
    #[error("{0}")]
    Validation(ValidationErrors),

    #[error("Export failed: {message}")]
    Export { message: String },

    /// A headless command finished with an error notification
    #[error("{message}")]
    Command { message: String },

    // ─────────────────────────────────────────────────────────────
    // Channel/Communication Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Channel send error: {message}")]
    ChannelSend { message: String },

    #[error("Channel closed unexpectedly")]
    ChannelClosed,
}

// ─────────────────────────────────────────────────────────────────
// Convenience Constructors
// ─────────────────────────────────────────────────────────────────

impl Error {
    pub fn terminal(message: impl Into<String>) -> Self {
        Self::Terminal {
            message: message.into(),
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::Http {
            status,
            message: message.into(),
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn credentials(message: impl Into<String>) -> Self {
        Self::Credentials {
            message: message.into(),
        }
    }

    pub fn export(message: impl Into<String>) -> Self {
        Self::Export {
            message: message.into(),
        }
    }

    pub fn command(message: impl Into<String>) -> Self {
        Self::Command {
            message: message.into(),
        }
    }

    pub fn channel_send(message: impl Into<String>) -> Self {
        Self::ChannelSend {
            message: message.into(),
        }
    }

    /// Check if this is a recoverable error
    ///
    /// Every backend failure is scoped to the single user action that
    /// triggered it, so all of them are recoverable.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::Transport { .. }
                | Error::Http { .. }
                | Error::Timeout { .. }
                | Error::Decode { .. }
                | Error::Validation(_)
                | Error::Export { .. }
                | Error::Command { .. }
                | Error::Credentials { .. }
        )
    }

    /// Check if this error should trigger application exit
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Error::TerminalInit(_) | Error::InvalidUrl { .. } | Error::ChannelClosed
        )
    }
}

// ─────────────────────────────────────────────────────────────────
// Error Context Extensions
// ─────────────────────────────────────────────────────────────────

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let err = e.into();
            tracing::error!("{}: {:?}", context.into(), err);
            err
        })
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| {
            let err = e.into();
            tracing::error!("{}: {:?}", f(), err);
            err
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::Field;

    #[test]
    fn test_error_display_messages() {
        let err = Error::http(404, "Prompt not found");
        assert_eq!(err.to_string(), "Backend returned 404: Prompt not found");

        let err = Error::Timeout { secs: 30 };
        assert!(err.to_string().contains("30s"));
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_error_is_fatal() {
        assert!(Error::TerminalInit("no tty".into()).is_fatal());
        assert!(Error::InvalidUrl {
            url: "::".to_string()
        }
        .is_fatal());
        assert!(!Error::transport("refused").is_fatal());
    }

    #[test]
    fn test_backend_errors_are_recoverable() {
        assert!(Error::transport("connection refused").is_recoverable());
        assert!(Error::http(500, "boom").is_recoverable());
        assert!(Error::Timeout { secs: 5 }.is_recoverable());
        assert!(Error::decode("missing field").is_recoverable());
        assert!(!Error::ChannelClosed.is_recoverable());
    }

    #[test]
    fn test_validation_error_displays_first_message() {
        let mut errors = ValidationErrors::default();
        errors.push(Field::Name, "Prompt name is required");
        let err = Error::Validation(errors);
        assert_eq!(err.to_string(), "Prompt name is required");
        assert!(err.is_recoverable());
    }
}
