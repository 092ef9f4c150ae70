//! Error types for the OS namespace

use std::io;
use thiserror::Error;

/// Result type for OS namespace operations
pub type Result<T> = std::result::Result<T, OsNsError>;

/// Errors that can occur in the OS namespace
#[derive(Error, Debug)]
pub enum OsNsError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid environment key: {0:?}")]
    InvalidKey(String),

    #[error("Invalid environment value for {0:?}")]
    InvalidValue(String),

    #[error("Host operation failed: {0}")]
    HostOp(String),

    #[error("Exit handler already installed")]
    HandlerInstalled,

    #[error("Failed to read host facts: {0}")]
    ProcRead(String),
}
