//! Error types for the application.

use thiserror::Error;

/// Top-level application error.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Bridge error: {0}")]
    Bridge(#[from] BridgeError),
}

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {message}")]
    ParseError { message: String },

    #[error("Config validation failed: {message}")]
    ValidationError { message: String },
}

/// Errors reported by the room network gateway.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RoomError {
    /// The gateway lost its connection to the homeserver.
    #[error("Room network unreachable: {message}")]
    Connectivity { message: String },

    /// A single request was refused or failed.
    #[error("Room request failed: {message}")]
    Request { message: String },
}

/// Errors reported by the contact network gateway.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ContactError {
    #[error("Contact network connection failed: {message}")]
    Connection { message: String },

    #[error("Contact request failed: {message}")]
    Request { message: String },
}

/// Errors raised by the bridge core.
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error(transparent)]
    Room(#[from] RoomError),

    #[error(transparent)]
    Contact(#[from] ContactError),

    /// The contact account exposed zero or several independent rosters.
    #[error("Expected exactly one roster source, got {count}")]
    RosterSources { count: usize },

    /// The room gateway reported that its event stream broke.
    #[error("Room network connectivity lost: {reason}")]
    ConnectivityLost { reason: String },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// How the dispatch loop and the supervisor react to a [`BridgeError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Log it and keep handling events.
    Recoverable,
    /// Tear the bridge down and rebuild it from the gateways.
    Reinitialize,
    /// Stop the bridge.
    Fatal,
}

impl BridgeError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            BridgeError::Room(RoomError::Connectivity { .. }) => ErrorCategory::Reinitialize,
            BridgeError::ConnectivityLost { .. } => ErrorCategory::Reinitialize,
            BridgeError::RosterSources { .. } => ErrorCategory::Fatal,
            BridgeError::Config(_) => ErrorCategory::Fatal,
            BridgeError::Room(RoomError::Request { .. }) => ErrorCategory::Recoverable,
            BridgeError::Contact(_) => ErrorCategory::Recoverable,
        }
    }
}

/// Result type alias for room gateway operations.
pub type RoomResult<T> = std::result::Result<T, RoomError>;

/// Result type alias for contact gateway operations.
pub type ContactResult<T> = std::result::Result<T, ContactError>;

/// Result type alias for bridge core operations.
pub type BridgeResult<T> = std::result::Result<T, BridgeError>;
