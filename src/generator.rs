//! The generation pipeline: encode, render, save

use crate::config::GeneratorConfig;
use crate::error::Result;
use std::path::PathBuf;
use tracing::info;

/// Outcome of a successful run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generated {
    /// Where the image was written
    pub output: PathBuf,
    /// The encoded text
    pub url: String,
    /// Version chosen by the encoder
    pub version: i16,
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
}

impl Generated {
    /// The two lines printed after a successful run
    pub fn status_lines(&self) -> [String; 2] {
        [
            format!(
                "QR code generated successfully and saved as '{}'",
                self.output.display()
            ),
            format!("QR code links to: {}", self.url),
        ]
    }
}

/// Encode `config.url`, render it and write the image to `config.output`.
///
/// An existing file at the output path is overwritten. Nothing is printed.
pub fn generate(config: &GeneratorConfig) -> Result<Generated> {
    config.validate()?;

    let renderer = config.renderer()?;
    let qr = config.encoder().encode(&config.payload())?;
    let image = renderer.render(&qr);

    image.save(&config.output)?;

    info!(
        output = %config.output.display(),
        version = qr.version(),
        width = image.width(),
        "Saved QR code"
    );

    Ok(Generated {
        output: config.output.clone(),
        url: config.url.clone(),
        version: qr.version(),
        width: image.width(),
        height: image.height(),
    })
}
