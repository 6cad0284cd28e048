//! Error handling and custom error types
//!
//! Every failure of an upload is terminal for that call. Callers branch on
//! [`Error::kind`] instead of matching on message text.

use std::path::PathBuf;
use thiserror::Error;

/// Coarse classification of an upload failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    FileNotFound,
    InvalidJson,
    NetworkError,
    HttpError,
    InvalidResponse,
    UnrecognizedResponseShape,
    Configuration,
    Io,
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("File not found at {}: {source}", .path.display())]
    FileNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON file at {}: {reason}", .path.display())]
    InvalidJson { path: PathBuf, reason: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Publisher returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Invalid publisher response: {0}")]
    InvalidResponse(String),

    #[error("Unrecognized publisher response: {0}")]
    UnrecognizedResponseShape(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Environment variable error: {0}")]
    EnvVar(#[from] dotenvy::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::FileNotFound { .. } => ErrorKind::FileNotFound,
            Error::InvalidJson { .. } => ErrorKind::InvalidJson,
            Error::Network(_) => ErrorKind::NetworkError,
            Error::Http { .. } => ErrorKind::HttpError,
            Error::InvalidResponse(_) => ErrorKind::InvalidResponse,
            Error::UnrecognizedResponseShape(_) => ErrorKind::UnrecognizedResponseShape,
            Error::Config(_) | Error::EnvVar(_) => ErrorKind::Configuration,
            Error::Io(_) => ErrorKind::Io,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
