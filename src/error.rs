//! Error types and exit codes
//!
//! Exit codes:
//! - 0: Success
//! - 1: General error
//! - 2: Credentials file missing or unreadable
//! - 3: Credentials file content invalid

use std::path::PathBuf;

use thiserror::Error;

pub type AdminResult<T> = Result<T, AdminError>;

#[derive(Debug, Error)]
pub enum AdminError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),

    #[error("Backend unavailable: {0}")]
    BackendUnavailable(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Terminal error: {0}")]
    Terminal(String),
}

impl AdminError {
    /// Whether the session can continue after reporting this error
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, AdminError::Configuration(_) | AdminError::Terminal(_))
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            AdminError::Configuration(err) => err.exit_code(),
            _ => 1,
        }
    }
}

impl From<reqwest::Error> for AdminError {
    fn from(err: reqwest::Error) -> Self {
        AdminError::BackendUnavailable(err.to_string())
    }
}

impl From<dialoguer::Error> for AdminError {
    fn from(err: dialoguer::Error) -> Self {
        AdminError::Terminal(err.to_string())
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("credentials file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("cannot read credentials file {}: {source}", .path.display())]
    Unreadable {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("credentials file {} is not a JSON object: {reason}", .path.display())]
    Malformed { path: PathBuf, reason: String },

    #[error("credentials file is missing required field '{0}'")]
    MissingField(&'static str),

    #[error("credentials private key is unusable: {0}")]
    InvalidPrivateKey(String),
}

impl ConfigError {
    pub fn exit_code(&self) -> i32 {
        match self {
            ConfigError::NotFound(_) | ConfigError::Unreadable { .. } => 2,
            ConfigError::Malformed { .. }
            | ConfigError::MissingField(_)
            | ConfigError::InvalidPrivateKey(_) => 3,
        }
    }
}
