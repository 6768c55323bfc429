use thiserror::Error;

/// Unified error type for the application.
#[derive(Error, Debug)]
pub enum Error {
    /// No song file was chosen before an upload was requested
    #[error("Please select a song file.")]
    NoFileSelected,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The request never produced a response (connection refused, reset, ...)
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The backend answered, but not with something we can use
    #[error("Invalid response from the server: {0}")]
    Format(String),

    /// The backend answered with a non-success status
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;
