//! Error types for the mdstudio library.

use std::io;
use thiserror::Error;

/// Result type alias for mdstudio operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while exporting documents or handling settings.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Error building or serializing the PDF object tree.
    #[error("PDF error: {0}")]
    Pdf(String),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The requested font family is not available on the output surface.
    #[error("Unsupported font: {0}")]
    UnsupportedFont(String),

    /// No exporter is registered for the requested format.
    #[error("Unsupported export format: {0}")]
    UnsupportedFormat(String),

    /// Error while laying out or drawing content.
    #[error("Rendering error: {0}")]
    Render(String),

    /// Settings could not be stored or read.
    #[error("Settings error: {0}")]
    Settings(String),

    /// The settings envelope could not be encrypted or decrypted.
    #[error("Cipher error: {0}")]
    Cipher(String),

    /// The assistant API key is blank.
    #[error("Invalid API key")]
    InvalidApiKey,

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            _ => Error::Pdf(err.to_string()),
        }
    }
}
