//! Error types for PermWatch Core

use thiserror::Error;

/// Main error type for PermWatch operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Watch error: {0}")]
    Watch(#[from] notify::Error),
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;
