//! Error types for PrismPlayer
//!
//! This module defines custom error types used throughout the crate.
//! We use thiserror for convenient error type definitions and anyhow for
//! application-level error handling in the binary.
//!
//! Fatal playback failures are deliberately NOT represented here: the
//! controller translates engine error codes into a session-state error kind
//! (see `player::PlaybackErrorKind`) and never propagates them as `Err`.

use thiserror::Error;

/// Main error type for PrismPlayer
#[derive(Error, Debug)]
pub enum PlayerError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Library import errors
    #[error("Library error: {0}")]
    Library(String),

    /// File I/O errors
    #[error("File error: {0}")]
    FileIO(#[from] std::io::Error),

    /// Invalid input errors
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Resource not found
    #[error("Resource not found: {0}")]
    NotFound(String),
}

/// Convenience type alias for Results in PrismPlayer
pub type Result<T> = std::result::Result<T, PlayerError>;

/// Extension trait for converting other errors to PlayerError
pub trait IntoPlayerError<T> {
    /// Convert this error into a PlayerError with the given context
    fn config_err(self, context: &str) -> Result<T>;
    fn library_err(self, context: &str) -> Result<T>;
}

impl<T, E: std::fmt::Display> IntoPlayerError<T> for std::result::Result<T, E> {
    fn config_err(self, context: &str) -> Result<T> {
        self.map_err(|e| PlayerError::Config(format!("{}: {}", context, e)))
    }

    fn library_err(self, context: &str) -> Result<T> {
        self.map_err(|e| PlayerError::Library(format!("{}: {}", context, e)))
    }
}
