//! Logging utilities wrapping `tracing` initialisation
//!
//! Log lines go to stderr; stdout is reserved for the status lines. A copy
//! can be teed to a file, optionally rotated hourly or daily.

use crate::config::{LogRotation, LoggingOptions};
use crate::error::{Error, Result};
use std::fs::OpenOptions;
use std::io;
use std::path::Path;
use std::sync::OnceLock;
use tracing::Subscriber;
use tracing_appender::non_blocking::{NonBlocking, NonBlockingBuilder, WorkerGuard};
use tracing_appender::rolling;
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt};

static FILE_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

type BoxedLayer<S> = Box<dyn Layer<S> + Send + Sync + 'static>;

/// Initialise the global tracing subscriber according to the provided logging options.
///
/// Subsequent calls are ignored to avoid reinitialisation panics.
pub fn init(options: &LoggingOptions) -> Result<()> {
    if tracing::dispatcher::has_been_set() {
        return Ok(());
    }

    let level = options.level.as_str();
    let filter = EnvFilter::try_new(level)
        .map_err(|e| Error::Config(format!("Invalid log level '{level}': {e}")))?;

    let mut layers: Vec<BoxedLayer<Registry>> = vec![stderr_layer(options.color)];
    if let Some(writer) = file_writer(options)? {
        layers.push(file_layer(writer));
    }

    Registry::default()
        .with(layers)
        .with(filter)
        .try_init()
        .map_err(|e| Error::Config(format!("Failed to install tracing subscriber: {e}")))
}

/// Open the configured log file, creating its directory. `None` when no file is set.
fn file_writer(options: &LoggingOptions) -> Result<Option<NonBlocking>> {
    let Some(path) = options.file.as_deref() else {
        return Ok(None);
    };

    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(dir).map_err(|e| {
        Error::Config(format!("Failed to create log directory {}: {e}", dir.display()))
    })?;

    let builder = NonBlockingBuilder::default().lossy(false);
    let (writer, guard) = match options.rotation {
        Some(rotation) => {
            let file_name = path.file_name().ok_or_else(|| {
                Error::Config(format!(
                    "Log file path '{}' must include a filename when rotation is enabled",
                    path.display()
                ))
            })?;
            let appender = match rotation {
                LogRotation::Hourly => rolling::hourly(dir, file_name),
                LogRotation::Daily => rolling::daily(dir, file_name),
            };
            builder.finish(appender)
        }
        None => {
            let file = OpenOptions::new()
                .append(true)
                .create(true)
                .open(path)
                .map_err(|e| {
                    Error::Config(format!("Failed to open log file {}: {e}", path.display()))
                })?;
            builder.finish(file)
        }
    };

    // Only the first guard is kept; it flushes the writer thread at exit.
    let _ = FILE_GUARD.set(guard);
    Ok(Some(writer))
}

fn file_layer<S>(writer: NonBlocking) -> BoxedLayer<S>
where
    S: Subscriber + for<'span> LookupSpan<'span> + Send + Sync + 'static,
{
    fmt::layer()
        .with_timer(UtcTime::rfc_3339())
        .with_ansi(false)
        .with_writer(writer)
        .with_target(true)
        .boxed()
}

fn stderr_layer<S>(color: bool) -> BoxedLayer<S>
where
    S: Subscriber + for<'span> LookupSpan<'span> + Send + Sync + 'static,
{
    fmt::layer()
        .with_timer(UtcTime::rfc_3339())
        .with_writer(io::stderr)
        .with_ansi(color)
        .with_target(true)
        .boxed()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn file_options(path: &Path, rotation: Option<LogRotation>) -> LoggingOptions {
        LoggingOptions {
            file: Some(path.to_path_buf()),
            rotation,
            color: false,
            ..LoggingOptions::default()
        }
    }

    #[test]
    fn test_invalid_level_rejected() {
        let options = LoggingOptions {
            level: "aviqr=notalevel".to_string(),
            ..LoggingOptions::default()
        };
        if tracing::dispatcher::has_been_set() {
            return;
        }
        assert!(matches!(init(&options), Err(Error::Config(_))));
    }

    #[test]
    fn test_no_file_configured() {
        assert!(file_writer(&LoggingOptions::default()).unwrap().is_none());
    }

    #[test]
    fn test_plain_file_created_with_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("nested").join("aviqr.log");

        let writer = file_writer(&file_options(&path, None)).unwrap();
        assert!(writer.is_some());
        assert!(path.is_file());
    }

    #[test]
    fn test_daily_rotation_creates_dated_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("aviqr.log");

        let writer = file_writer(&file_options(&path, Some(LogRotation::Daily))).unwrap();
        assert!(writer.is_some());

        let names: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert!(
            names.iter().any(|name| name.starts_with("aviqr.log.")),
            "no rotated log file in {names:?}"
        );
    }

    #[test]
    fn test_events_reach_log_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.log");

        let file = fs::File::create(&path).unwrap();
        let (writer, guard) = NonBlockingBuilder::default().lossy(false).finish(file);
        let subscriber = Registry::default().with(file_layer(writer));
        tracing::subscriber::with_default(subscriber, || {
            tracing::warn!(version = 5, "Saved QR code");
        });
        drop(guard);

        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.contains("Saved QR code"), "log was {contents:?}");
        assert!(contents.contains("version=5"));
    }

    #[test]
    fn test_rotation_requires_file_name() {
        let options = file_options(Path::new("/"), Some(LogRotation::Hourly));
        assert!(matches!(file_writer(&options), Err(Error::Config(_))));
    }
}
