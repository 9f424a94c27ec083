//! aviqr entrypoint

use anyhow::Context;
use aviqr::{AviqrConfig, ErrorCorrection, QrDecoder, generate, logging};
use clap::Parser;
use std::path::PathBuf;
use tracing::{debug, info};

#[derive(Parser, Debug)]
#[command(
    name = "aviqr",
    version,
    about = "Write the American Aviators QR code to a PNG file"
)]
struct Cli {
    /// Optional configuration file (toml/yaml). Defaults to aviqr.{toml,yaml} in cwd/XDG config.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Text to encode instead of the built-in URL
    #[arg(long)]
    url: Option<String>,

    /// Output image path; the extension selects the format
    #[arg(long, short, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Requested symbol version (1-40), a lower bound unless --no-fit is given
    #[arg(long = "qr-version", value_name = "N")]
    qr_version: Option<i16>,

    /// Error correction level (L, M, Q or H)
    #[arg(long, value_name = "LEVEL")]
    error_correction: Option<ErrorCorrection>,

    /// Pixels per module
    #[arg(long, value_name = "PX")]
    box_size: Option<u32>,

    /// Quiet zone width in modules
    #[arg(long, value_name = "MODULES")]
    border: Option<u32>,

    /// Use the requested version as-is instead of growing it to fit
    #[arg(long)]
    no_fit: bool,

    /// Colour of dark modules (name or #rrggbb)
    #[arg(long, value_name = "COLOR")]
    fill_color: Option<String>,

    /// Background colour (name or #rrggbb)
    #[arg(long, value_name = "COLOR")]
    back_color: Option<String>,

    /// Read the written image back and fail unless it decodes to the payload
    #[arg(long)]
    verify: bool,
}

impl Cli {
    fn apply(self, config: &mut AviqrConfig) {
        let generator = &mut config.generator;
        if let Some(url) = self.url {
            generator.url = url;
        }
        if let Some(output) = self.output {
            generator.output = output;
        }
        if let Some(version) = self.qr_version {
            generator.version = version;
        }
        if let Some(level) = self.error_correction {
            generator.error_correction = level;
        }
        if let Some(size) = self.box_size {
            generator.box_size = size;
        }
        if let Some(border) = self.border {
            generator.border = border;
        }
        if self.no_fit {
            generator.fit = false;
        }
        if let Some(color) = self.fill_color {
            generator.fill_color = color;
        }
        if let Some(color) = self.back_color {
            generator.back_color = color;
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let verify = cli.verify;

    let mut config = AviqrConfig::load(cli.config.as_deref())?;
    cli.apply(&mut config);

    logging::init(&config.logging)?;
    if let Some(path) = &config.source {
        info!("Using configuration file: {}", path.display());
    }
    debug!(?config, "Resolved configuration");

    let generated = generate(&config.generator).with_context(|| {
        format!(
            "failed to generate {}",
            config.generator.output.display()
        )
    })?;

    if verify {
        QrDecoder::new().verify_file(&generated.output, &generated.url)?;
    }

    for line in generated.status_lines() {
        println!("{line}");
    }

    Ok(())
}
