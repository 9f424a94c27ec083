//! QR code encoding, rendering and decoding
//!
//! Symbol construction is delegated to the `qrcode` crate and reading images
//! back to `rqrr`. This module only chooses the version, lays modules out on a
//! bitmap and carries the payload between those steps.

mod decoder;
mod encoder;
mod render;

pub use decoder::QrDecoder;
pub use encoder::{EncodedQr, MAX_VERSION, MIN_VERSION, QrEncoder};
pub use render::{Color, MAX_SIDE, QrRenderer};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Text payload carried by a QR symbol
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrPayload {
    /// The raw data
    pub data: Vec<u8>,
    /// String representation if valid UTF-8
    pub text: Option<String>,
}

impl QrPayload {
    /// Create a new QR payload from raw bytes
    pub fn from_bytes(data: Vec<u8>) -> Self {
        let text = String::from_utf8(data.clone()).ok();
        Self { data, text }
    }

    /// Create a new QR payload from a string
    pub fn from_string(s: String) -> Self {
        Self {
            data: s.as_bytes().to_vec(),
            text: Some(s),
        }
    }

    /// Get the payload as a string, if valid UTF-8
    pub fn as_str(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Get the raw bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Length in bytes
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True when there is nothing to encode
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// The four standard error correction levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCorrection {
    /// Recovers about 7% of damaged modules
    #[serde(alias = "l", alias = "low")]
    L,
    /// Recovers about 15%
    #[serde(alias = "m", alias = "medium")]
    M,
    /// Recovers about 25%
    #[serde(alias = "q", alias = "quartile")]
    Q,
    /// Recovers about 30%
    #[serde(alias = "h", alias = "high")]
    H,
}

impl ErrorCorrection {
    /// Single-letter name of the level
    pub fn as_char(self) -> char {
        match self {
            Self::L => 'L',
            Self::M => 'M',
            Self::Q => 'Q',
            Self::H => 'H',
        }
    }

    /// Parse a level name (case-insensitive, letter or word)
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "l" | "low" => Some(Self::L),
            "m" | "medium" => Some(Self::M),
            "q" | "quartile" => Some(Self::Q),
            "h" | "high" => Some(Self::H),
            _ => None,
        }
    }
}

impl From<ErrorCorrection> for qrcode::EcLevel {
    fn from(level: ErrorCorrection) -> Self {
        match level {
            ErrorCorrection::L => qrcode::EcLevel::L,
            ErrorCorrection::M => qrcode::EcLevel::M,
            ErrorCorrection::Q => qrcode::EcLevel::Q,
            ErrorCorrection::H => qrcode::EcLevel::H,
        }
    }
}

impl fmt::Display for ErrorCorrection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

impl FromStr for ErrorCorrection {
    type Err = String;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        Self::parse(value).ok_or_else(|| {
            format!("Unsupported error correction '{value}', expected L, M, Q or H")
        })
    }
}
