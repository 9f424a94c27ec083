//! aviqr - writes the American Aviators QR code to disk
//!
//! Encodes `https://american-aviators.thorvaldrovers.com` at error correction
//! level H, lets the encoder grow the symbol version until the URL fits,
//! paints 10-pixel modules inside a 4-module quiet zone and saves the result
//! as `american_aviators_qrcode.png`.
//!
//! # Example
//!
//! ```no_run
//! use aviqr::{GeneratorConfig, generate};
//!
//! fn main() -> anyhow::Result<()> {
//!     let generated = generate(&GeneratorConfig::default())?;
//!     for line in generated.status_lines() {
//!         println!("{line}");
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs, rust_2024_compatibility)]

pub mod config;
pub mod error;
pub mod generator;
pub mod logging;
pub mod qr;

// Re-exports for convenience
pub use error::{Error, Result};

pub use config::{AviqrConfig, GeneratorConfig, LogRotation, LoggingOptions};
pub use generator::{Generated, generate};
pub use qr::{Color, EncodedQr, ErrorCorrection, QrDecoder, QrEncoder, QrPayload, QrRenderer};
