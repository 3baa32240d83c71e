// src/errors.rs

//! Crate-wide error type.
//!
//! Every variant is fatal to the watch loop: the top level prints it and
//! exits non-zero. A child command that exits with a failure is *not* an
//! error; it is only reported through logging.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum InlError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid {flag} pattern '{pattern}': {source}")]
    InvalidPattern {
        flag: &'static str,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Cannot watch {path:?}: {source}")]
    WatchError {
        path: PathBuf,
        #[source]
        source: notify::Error,
    },

    #[error("Cannot walk {path:?}: {message}")]
    WalkError { path: PathBuf, message: String },

    #[error("File watch delivery failed: {0}")]
    WatchDelivery(#[source] notify::Error),

    #[error("File watch channel closed unexpectedly")]
    WatchClosed,

    #[error("Failed to spawn `{command}`: {source}")]
    SpawnError {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid orchestrator transition: {0}")]
    InvalidTransition(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, InlError>;
