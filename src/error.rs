//! Unified error types for the controller.

use crate::tasks::TaskKind;
use std::fmt;

// ---------------------------------------------------------------------------
// InputError
// ---------------------------------------------------------------------------

/// Operator input that could not be turned into a command.
///
/// Always recoverable: the session reports it and re-prompts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    InvalidChoice,
    InvalidAmount(String),
    InvalidDirection(String),
    InvalidDistance(String),
    EmptyField(&'static str),
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidChoice => write!(f, "Invalid choice."),
            Self::InvalidAmount(raw) => write!(f, "Invalid amount `{raw}`."),
            Self::InvalidDirection(raw) => write!(f, "Invalid direction `{raw}`."),
            Self::InvalidDistance(raw) => write!(f, "Invalid block distance `{raw}`."),
            Self::EmptyField(field) => write!(f, "Invalid {field}."),
        }
    }
}

impl std::error::Error for InputError {}

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Errors when loading or parsing configuration.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Toml(toml::de::Error),
    /// No config file was found in any searched location.
    Missing(Vec<String>),
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "io: {e}"),
            Self::Toml(e) => write!(f, "toml: {e}"),
            Self::Missing(searched) => {
                write!(f, "no config file found (searched: {})", searched.join(", "))
            }
            Self::Invalid(msg) => write!(f, "invalid config: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        Self::Toml(e)
    }
}

// ---------------------------------------------------------------------------
// ApiError
// ---------------------------------------------------------------------------

/// Errors from the remote statistics API.
#[derive(Debug)]
pub enum ApiError {
    /// Network / reqwest-level error.
    Http(reqwest::Error),
    /// Non-2xx status from the API, with the best available message.
    Status(u16, String),
    /// Body was not the JSON shape a query expected.
    Decode(String),
}

impl ApiError {
    /// HTTP status code when this error came from a non-2xx response.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status(code, _) => Some(*code),
            _ => None,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http(e) => write!(f, "http: {e}"),
            Self::Status(code, body) => write!(f, "status {code}: {body}"),
            Self::Decode(msg) => write!(f, "unexpected response: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        Self::Http(e)
    }
}

// ---------------------------------------------------------------------------
// WorldError
// ---------------------------------------------------------------------------

/// Errors from the world connection.
#[derive(Debug)]
pub enum WorldError {
    Io(std::io::Error),
    /// The agent sent something that does not fit the line protocol.
    Protocol(String),
    /// The connection is gone; fatal for the session.
    Disconnected(String),
    /// The agent refused or failed one request (navigation, dig, ...).
    Rejected(String),
}

impl WorldError {
    /// True when the error means the connection itself is lost.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Io(_) | Self::Disconnected(_))
    }
}

impl fmt::Display for WorldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "io: {e}"),
            Self::Protocol(msg) => write!(f, "protocol: {msg}"),
            Self::Disconnected(reason) => write!(f, "disconnected: {reason}"),
            Self::Rejected(msg) => write!(f, "rejected: {msg}"),
        }
    }
}

impl std::error::Error for WorldError {}

impl From<std::io::Error> for WorldError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for WorldError {
    fn from(e: serde_json::Error) -> Self {
        Self::Protocol(e.to_string())
    }
}

// ---------------------------------------------------------------------------
// BridgeError / StartError
// ---------------------------------------------------------------------------

/// Errors from the event bridge subscription slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BridgeError {
    /// A subscriber is still attached.
    Occupied,
}

impl fmt::Display for BridgeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Occupied => write!(f, "event bridge already has a subscriber"),
        }
    }
}

impl std::error::Error for BridgeError {}

/// Reasons the supervisor refused to start a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartError {
    AlreadyRunning(TaskKind),
    BridgeBusy,
}

impl fmt::Display for StartError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyRunning(kind) => write!(f, "{kind} is already running"),
            Self::BridgeBusy => write!(f, "previous task has not released its subscription"),
        }
    }
}

impl std::error::Error for StartError {}

impl From<BridgeError> for StartError {
    fn from(_: BridgeError) -> Self {
        Self::BridgeBusy
    }
}

// ---------------------------------------------------------------------------
// AppError
// ---------------------------------------------------------------------------

/// Errors that end the session loop.
#[derive(Debug)]
pub enum AppError {
    World(WorldError),
    /// Reading operator input failed.
    Input(std::io::Error),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::World(e) => write!(f, "world: {e}"),
            Self::Input(e) => write!(f, "input: {e}"),
        }
    }
}

impl std::error::Error for AppError {}

impl From<WorldError> for AppError {
    fn from(e: WorldError) -> Self {
        Self::World(e)
    }
}
