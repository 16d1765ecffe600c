//! Error types for autorun-core

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for startup item operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("Startup item not found: {0}")]
    NotFound(String),

    #[error("Startup item '{0}' exists in both an active and a disabled store; resolve it manually first")]
    Ambiguous(String),

    #[error("'{0}' matches a protected system entry and cannot be modified")]
    Protected(String),

    #[error("Startup item already exists: {0}")]
    AlreadyExists(String),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Store error for '{name}': {message}")]
    Store { name: String, message: String },

    #[error("Failed to write snapshot {path}: {message}")]
    Persist { path: PathBuf, message: String },

    #[error("Corrupt snapshot {path}: {message}")]
    CorruptSnapshot { path: PathBuf, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for startup item operations
pub type Result<T> = std::result::Result<T, Error>;
