//! Error types for the service control daemon.

use thiserror::Error;

/// Main error type for the daemon.
#[derive(Error, Debug)]
pub enum DaemonError {
    /// Configuration-related errors. Surfaced once at startup.
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Failures opening or using the remote session.
    #[error("Session error: {kind}")]
    Session { kind: SessionErrorKind },

    /// Failures reported by a command executed on the managed host.
    #[error("Execution error: {kind}")]
    Execution { kind: ExecutionErrorKind },

    /// Local validation errors. No remote call has been made.
    #[error("Validation error: {kind}")]
    Validation { kind: ValidationErrorKind },

    /// Command dispatch errors.
    #[error("Command error: {kind}")]
    Command { kind: CommandErrorKind },

    /// I/O errors.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Session layer error kinds.
#[derive(Error, Debug)]
pub enum SessionErrorKind {
    #[error("Could not connect to {host}: {message}")]
    ConnectionFailed { host: String, message: String },

    #[error("Authentication failed for {username}@{host}. Check username and password.")]
    AuthenticationFailed { host: String, username: String },

    #[error("SSH error: {message}")]
    TransportError { message: String },
}

/// Execution layer error kinds.
#[derive(Error, Debug)]
pub enum ExecutionErrorKind {
    #[error("Invalid sudo password")]
    InvalidElevationCredential,

    #[error("Command not available on host: {detail}")]
    CommandUnavailable { detail: String },

    #[error("{stderr}")]
    RemoteCommandError { stderr: String },
}

/// Validation error kinds.
#[derive(Error, Debug)]
pub enum ValidationErrorKind {
    #[error("Invalid action: {action}")]
    InvalidAction { action: String },

    #[error("Missing required parameter: {param}")]
    MissingParameter { param: String },

    #[error("Invalid parameter value for '{param}': {message}")]
    InvalidParameter { param: String, message: String },
}

/// Command error kinds.
#[derive(Error, Debug)]
pub enum CommandErrorKind {
    #[error("Unknown command: {name}")]
    UnknownCommand { name: String },
}

impl DaemonError {
    /// Build a generic remote command failure from raw stderr text.
    pub fn remote(stderr: impl Into<String>) -> Self {
        DaemonError::Execution {
            kind: ExecutionErrorKind::RemoteCommandError {
                stderr: stderr.into(),
            },
        }
    }

    /// Stable error kind identifier reported to callers.
    pub fn code(&self) -> &'static str {
        match self {
            DaemonError::Config { .. } => "CONFIG_ERROR",
            DaemonError::Session { kind } => match kind {
                SessionErrorKind::ConnectionFailed { .. } => "CONNECTION_FAILED",
                SessionErrorKind::AuthenticationFailed { .. } => "AUTHENTICATION_FAILED",
                SessionErrorKind::TransportError { .. } => "TRANSPORT_ERROR",
            },
            DaemonError::Execution { kind } => match kind {
                ExecutionErrorKind::InvalidElevationCredential => "INVALID_ELEVATION_CREDENTIAL",
                ExecutionErrorKind::CommandUnavailable { .. } => "COMMAND_UNAVAILABLE",
                ExecutionErrorKind::RemoteCommandError { .. } => "REMOTE_COMMAND_ERROR",
            },
            DaemonError::Validation { kind } => match kind {
                ValidationErrorKind::InvalidAction { .. } => "INVALID_ACTION",
                ValidationErrorKind::MissingParameter { .. }
                | ValidationErrorKind::InvalidParameter { .. } => "VALIDATION_ERROR",
            },
            DaemonError::Command { .. } => "UNKNOWN_COMMAND",
            DaemonError::Io(_) | DaemonError::Serialization(_) => "INTERNAL_ERROR",
        }
    }

    /// HTTP-equivalent status for a transport layer placed in front of the engine.
    pub fn status_code(&self) -> u16 {
        match self {
            DaemonError::Session { .. } => 503,
            DaemonError::Execution { kind } => match kind {
                ExecutionErrorKind::InvalidElevationCredential
                | ExecutionErrorKind::CommandUnavailable { .. } => 503,
                ExecutionErrorKind::RemoteCommandError { .. } => 400,
            },
            DaemonError::Validation { .. } => 400,
            DaemonError::Command { .. } => 404,
            DaemonError::Config { .. } | DaemonError::Io(_) | DaemonError::Serialization(_) => 500,
        }
    }

    /// Whether this error comes from the session or elevation layer rather
    /// than from the command itself. Such errors always abort an operation.
    pub fn is_session_or_elevation(&self) -> bool {
        matches!(
            self,
            DaemonError::Session { .. }
                | DaemonError::Execution {
                    kind: ExecutionErrorKind::InvalidElevationCredential
                        | ExecutionErrorKind::CommandUnavailable { .. }
                }
        )
    }
}

/// Result type alias for daemon operations.
pub type DaemonResult<T> = Result<T, DaemonError>;
