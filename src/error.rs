//! Error types for aviqr operations

use thiserror::Error;

/// Result type alias using aviqr's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for aviqr operations
#[derive(Error, Debug)]
pub enum Error {
    /// Payload does not fit any version the encoder may choose
    #[error(
        "Payload of {len} bytes does not fit QR version {max_version} at error correction {ec_level}"
    )]
    DataTooLong {
        /// Payload length in bytes
        len: usize,
        /// Largest version that was tried
        max_version: i16,
        /// Requested error correction level
        ec_level: char,
    },

    /// QR code encoding failed for a reason other than capacity
    #[error("Failed to encode QR code: {0}")]
    QrEncode(String),

    /// QR code decoding failed
    #[error("Failed to decode QR code: {0}")]
    QrDecode(String),

    /// No QR code found in image
    #[error("No QR code found in image")]
    NoQrCodeFound,

    /// Decoded content differs from what was encoded
    #[error("Decoded payload {found:?} does not match expected {expected:?}")]
    PayloadMismatch {
        /// Payload that was encoded
        expected: String,
        /// Payload read back from the image
        found: String,
    },

    /// Colour string could not be parsed
    #[error("Invalid colour '{0}'")]
    InvalidColor(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Image processing error
    #[error("Image processing error: {0}")]
    Image(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<image::ImageError> for Error {
    fn from(e: image::ImageError) -> Self {
        match e {
            // Unwritable paths and full disks stay filesystem errors
            image::ImageError::IoError(io) => Error::Io(io),
            other => Error::Image(other.to_string()),
        }
    }
}
