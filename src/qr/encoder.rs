//! QR code encoder

use crate::error::{Error, Result};
use crate::qr::{ErrorCorrection, QrPayload};
use qrcode::types::QrError;
use qrcode::{QrCode, Version};

/// Smallest normal QR version
pub const MIN_VERSION: i16 = 1;
/// Largest normal QR version
pub const MAX_VERSION: i16 = 40;

/// QR code encoder
///
/// With `fit` enabled the requested version is a lower bound: the encoder
/// walks upwards from it and keeps the first version that holds the payload.
#[derive(Debug, Clone, Copy)]
pub struct QrEncoder {
    version: i16,
    ec_level: ErrorCorrection,
    fit: bool,
}

impl QrEncoder {
    /// Create an encoder for the given version, error correction and fit mode
    pub fn new(version: i16, ec_level: ErrorCorrection, fit: bool) -> Self {
        Self {
            version,
            ec_level,
            fit,
        }
    }

    /// Encode a payload into a module matrix
    pub fn encode(&self, payload: &QrPayload) -> Result<EncodedQr> {
        if payload.is_empty() {
            return Err(Error::QrEncode("payload is empty".to_string()));
        }
        if !(MIN_VERSION..=MAX_VERSION).contains(&self.version) {
            return Err(Error::QrEncode(format!(
                "version {} outside {MIN_VERSION}..={MAX_VERSION}",
                self.version
            )));
        }

        let last = if self.fit { MAX_VERSION } else { self.version };
        for version in self.version..=last {
            match QrCode::with_version(
                payload.as_bytes(),
                Version::Normal(version),
                self.ec_level.into(),
            ) {
                Ok(code) => {
                    tracing::debug!(
                        requested = self.version,
                        version,
                        ecc_level = %self.ec_level,
                        length = payload.len(),
                        "Encoded QR payload"
                    );
                    return Ok(EncodedQr {
                        code,
                        version,
                        ec_level: self.ec_level,
                    });
                }
                Err(QrError::DataTooLong) => continue,
                Err(e) => return Err(Error::QrEncode(e.to_string())),
            }
        }

        Err(Error::DataTooLong {
            len: payload.len(),
            max_version: last,
            ec_level: self.ec_level.as_char(),
        })
    }
}

/// A constructed QR symbol together with the version it ended up using
pub struct EncodedQr {
    code: QrCode,
    version: i16,
    ec_level: ErrorCorrection,
}

impl EncodedQr {
    /// Effective symbol version
    pub fn version(&self) -> i16 {
        self.version
    }

    /// Modules per side, excluding the quiet zone
    pub fn width(&self) -> usize {
        self.code.width()
    }

    /// Error correction level used
    pub fn error_correction(&self) -> ErrorCorrection {
        self.ec_level
    }

    /// Row-major module colours
    pub fn modules(&self) -> Vec<qrcode::Color> {
        self.code.to_colors()
    }
}
