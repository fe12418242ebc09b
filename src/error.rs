//! Error types for pointer automation.

use thiserror::Error;

/// Result type alias for iocane operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while driving the display session.
#[derive(Debug, Error)]
pub enum Error {
    /// The X display could not be opened.
    #[error("cannot open display")]
    DisplayOpen,

    /// A display-protocol call failed.
    #[error("display call failed: {0}")]
    Platform(String),

    /// The blocking event wait failed.
    #[error("event wait failed: {0}")]
    EventWait(String),

    /// No configuration file was found at any default location.
    #[error("no iocanerc file found")]
    ConfigMissing,

    /// Reading a configuration file or batch source failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// The dispatch loop was started outside interactive mode.
    #[error("not in interactive mode")]
    NotInteractive,
}
