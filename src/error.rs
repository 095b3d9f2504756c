//! Error types for doc2pdf library.

use std::io;
use thiserror::Error;

/// Result type alias for doc2pdf operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur during conversion.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Not enough bytes to classify the input.
    #[error("Insufficient data: need 8 header bytes, got {available}")]
    InsufficientData {
        /// Number of bytes that were available
        available: usize,
    },

    /// The header matches neither the DOC nor the DOCX signature.
    #[error("Unrecognized format: not a DOC or DOCX document")]
    UnrecognizedFormat,

    /// The content extractor failed on a malformed container.
    #[error("Extraction error: {0}")]
    Extraction(String),

    /// The document is encrypted and cannot be read.
    #[error("Document is encrypted")]
    Encrypted,

    /// An embedded picture could not be decoded.
    #[error("Image error: {0}")]
    Image(String),

    /// The PDF emitter failed.
    #[error("PDF emission error: {0}")]
    Emission(String),

    /// Layout or conversion options are invalid.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            _ => Error::Emission(err.to_string()),
        }
    }
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        Error::Extraction(format!("zip: {}", err))
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::Extraction(format!("xml: {}", err))
    }
}

impl From<image::ImageError> for Error {
    fn from(err: image::ImageError) -> Self {
        Error::Image(err.to_string())
    }
}
