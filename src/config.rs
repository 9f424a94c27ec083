//! aviqr runtime configuration handling
//!
//! Every setting has a literal default; a config file, `AVIQR_*` environment
//! variables and command-line flags may override them in that order.

use crate::error::{Error, Result};
use crate::qr::{Color, ErrorCorrection, MAX_VERSION, MIN_VERSION, QrEncoder, QrPayload, QrRenderer};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// URL encoded when nothing overrides it
pub const DEFAULT_URL: &str = "https://american-aviators.thorvaldrovers.com";
/// File written when nothing overrides it
pub const DEFAULT_OUTPUT: &str = "american_aviators_qrcode.png";

/// Top-level configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AviqrConfig {
    /// What to encode and how to draw it
    pub generator: GeneratorConfig,
    /// Logging configuration
    pub logging: LoggingOptions,
    /// File the settings were read from, if any
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

impl AviqrConfig {
    /// Load configuration from an explicit path or fall back to discovered defaults.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        let source = match explicit_path {
            Some(path) => Some(path.to_path_buf()),
            None => Self::discover_file()?,
        };
        let mut config = match source.as_deref() {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };

        config.source = source;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Attempt to locate a configuration file in common locations.
    fn discover_file() -> Result<Option<PathBuf>> {
        let cwd =
            env::current_dir().map_err(|e| Error::Config(format!("Failed to read cwd: {e}")))?;
        for candidate in ["aviqr.toml", "aviqr.yaml", "aviqr.yml"] {
            let path = cwd.join(candidate);
            if path.exists() {
                return Ok(Some(path));
            }
        }

        if let Some(xdg_config) = env::var_os("XDG_CONFIG_HOME") {
            let base = PathBuf::from(xdg_config).join("aviqr");
            for candidate in ["config.toml", "config.yaml"] {
                let path = base.join(candidate);
                if path.exists() {
                    return Ok(Some(path));
                }
            }
        }

        Ok(None)
    }

    /// Read configuration from a concrete file path.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read {}: {e}", path.display())))?;

        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("")
            .to_ascii_lowercase()
            .as_str()
        {
            "toml" => toml::from_str(&contents).map_err(|e| {
                Error::Config(format!("Failed to parse TOML {}: {e}", path.display()))
            }),
            "yaml" | "yml" => serde_yaml::from_str(&contents).map_err(|e| {
                Error::Config(format!("Failed to parse YAML {}: {e}", path.display()))
            }),
            other => Err(Error::Config(format!(
                "Unsupported config format '{}', expected toml/yaml",
                other
            ))),
        }
    }

    fn apply_env_overrides(&mut self) {
        self.generator.apply_env_overrides();
        self.logging.apply_env_overrides();
    }
}

/// Payload, encoding parameters, colours and output path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Text to encode
    pub url: String,
    /// Image path; the extension selects the file format
    pub output: PathBuf,
    /// Requested symbol version, a lower bound when `fit` is on
    pub version: i16,
    /// Error correction level
    pub error_correction: ErrorCorrection,
    /// Pixels per module
    pub box_size: u32,
    /// Quiet zone width in modules
    pub border: u32,
    /// Grow the version until the payload fits
    pub fit: bool,
    /// Colour of dark modules
    pub fill_color: String,
    /// Colour of light modules and the quiet zone
    pub back_color: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            output: PathBuf::from(DEFAULT_OUTPUT),
            version: 1,
            error_correction: ErrorCorrection::H,
            box_size: 10,
            border: 4,
            fit: true,
            fill_color: "black".to_string(),
            back_color: "white".to_string(),
        }
    }
}

impl GeneratorConfig {
    pub(crate) fn apply_env_overrides(&mut self) {
        if let Ok(url) = env::var("AVIQR_URL") {
            self.url = url;
        }
        if let Ok(output) = env::var("AVIQR_OUTPUT") {
            self.output = PathBuf::from(output);
        }
        if let Ok(version) = env::var("AVIQR_VERSION") {
            if let Ok(parsed) = version.parse::<i16>() {
                self.version = parsed;
            }
        }
        if let Ok(level) = env::var("AVIQR_ERROR_CORRECTION") {
            if let Some(parsed) = ErrorCorrection::parse(&level) {
                self.error_correction = parsed;
            }
        }
        if let Ok(size) = env::var("AVIQR_BOX_SIZE") {
            if let Ok(parsed) = size.parse::<u32>() {
                self.box_size = parsed;
            }
        }
        if let Ok(border) = env::var("AVIQR_BORDER") {
            if let Ok(parsed) = border.parse::<u32>() {
                self.border = parsed;
            }
        }
        if let Ok(fit) = env::var("AVIQR_FIT") {
            if let Some(parsed) = parse_flag(&fit) {
                self.fit = parsed;
            }
        }
        if let Ok(color) = env::var("AVIQR_FILL_COLOR") {
            self.fill_color = color;
        }
        if let Ok(color) = env::var("AVIQR_BACK_COLOR") {
            self.back_color = color;
        }
    }

    /// Check ranges and colours before any work is done.
    pub fn validate(&self) -> Result<()> {
        if self.url.is_empty() {
            return Err(Error::Config("url must not be empty".to_string()));
        }
        if !(MIN_VERSION..=MAX_VERSION).contains(&self.version) {
            return Err(Error::Config(format!(
                "version {} must be between {MIN_VERSION} and {MAX_VERSION}",
                self.version
            )));
        }
        self.renderer().map(|_| ())
    }

    /// Payload built from `url`
    pub fn payload(&self) -> QrPayload {
        QrPayload::from_string(self.url.clone())
    }

    /// Encoder for the configured version, level and fit mode
    pub fn encoder(&self) -> QrEncoder {
        QrEncoder::new(self.version, self.error_correction, self.fit)
    }

    /// Renderer for the configured box size, border and colours
    pub fn renderer(&self) -> Result<QrRenderer> {
        QrRenderer::new(
            self.box_size,
            self.border,
            Color::parse(&self.fill_color)?,
            Color::parse(&self.back_color)?,
        )
    }
}

/// Structured logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingOptions {
    /// Default log level (overridable via `AVIQR_LOG_LEVEL`)
    pub level: String,
    /// Optional log file path for teeing structured logs
    pub file: Option<PathBuf>,
    /// Force ANSI colors in stderr logging
    pub color: bool,
    /// Optional log rotation strategy applied to `file`
    pub rotation: Option<LogRotation>,
}

impl Default for LoggingOptions {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            file: None,
            color: true,
            rotation: None,
        }
    }
}

impl LoggingOptions {
    pub(crate) fn apply_env_overrides(&mut self) {
        if let Ok(level) = env::var("AVIQR_LOG_LEVEL") {
            self.level = level;
        }
        if let Ok(file) = env::var("AVIQR_LOG_FILE") {
            self.file = Some(PathBuf::from(file));
        }
        if let Ok(color) = env::var("AVIQR_LOG_COLOR") {
            if let Some(parsed) = parse_flag(&color) {
                self.color = parsed;
            }
        }
        if let Ok(rotation) = env::var("AVIQR_LOG_ROTATION") {
            if let Some(parsed) = LogRotation::from_str(&rotation) {
                self.rotation = Some(parsed);
            }
        }
    }
}

/// Supported log rotation policies for file sinks
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogRotation {
    /// Rotate log files once per hour
    Hourly,
    /// Rotate log files once per day
    Daily,
}

impl LogRotation {
    fn from_str(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "hourly" => Some(Self::Hourly),
            "daily" => Some(Self::Daily),
            _ => None,
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" => Some(false),
        _ => None,
    }
}
