use std::io;
use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing::level_filters::LevelFilter;
use tracing::{Level, Subscriber};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

use super::rotation::{RotatingFileWriter, RotationPolicy};
use crate::domain::models::{LogFormat, LogSettings};

/// Logger implementation using tracing
///
/// Holds the worker guard of the non-blocking file writer; dropping it
/// flushes pending records.
#[derive(Debug)]
pub struct LoggerImpl {
    _guard: Option<WorkerGuard>,
    log_file: PathBuf,
    file_output: bool,
    installed: bool,
}

impl LoggerImpl {
    /// Install the process-wide subscriber described by `settings`.
    ///
    /// Never fails: an unknown level falls back to info, an unopenable log
    /// file leaves stdout as the only sink, and an already installed
    /// subscriber is kept as is.
    pub fn init(settings: &LogSettings) -> Self {
        let level = effective_level(settings);
        let format = settings.format();
        let log_file = log_file_path(&settings.path, &settings.file_name);

        let (file_writer, guard, open_error) =
            match RotatingFileWriter::open(&log_file, RotationPolicy::from_settings(settings)) {
                Ok(writer) => {
                    let (non_blocking, guard) = tracing_appender::non_blocking(writer);
                    (Some(non_blocking), Some(guard), None)
                }
                Err(e) => (None, None, Some(e)),
            };
        let file_output = file_writer.is_some();

        let mut layers: Vec<Box<dyn Layer<Registry> + Send + Sync>> = vec![fmt_layer(
            format,
            io::stdout,
            true,
        )
        .with_filter(level_filter(level))
        .boxed()];
        if let Some(writer) = file_writer {
            layers.push(
                fmt_layer(format, writer, false)
                    .with_filter(level_filter(level))
                    .boxed(),
            );
        }

        let installed = tracing_subscriber::registry()
            .with(layers)
            .try_init()
            .is_ok();

        if !installed {
            tracing::warn!("a global subscriber is already installed, keeping it");
        }
        if let Some(e) = open_error {
            tracing::warn!(
                path = %log_file.display(),
                error = %e,
                "failed to open log file, logging to stdout only"
            );
        }

        tracing::info!(
            level = %level,
            format = ?format,
            file = %log_file.display(),
            file_output,
            "logger initialized"
        );

        Self {
            _guard: guard,
            log_file,
            file_output,
            installed,
        }
    }

    /// Path of the rotating log file
    pub fn log_file(&self) -> &Path {
        &self.log_file
    }

    /// Whether records are also written to the log file
    pub const fn file_output(&self) -> bool {
        self.file_output
    }

    /// Whether this call installed the global subscriber
    pub const fn installed(&self) -> bool {
        self.installed
    }
}

fn level_filter(level: Level) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(level).into())
        .from_env_lossy()
}

/// Formatting layer with caller file and line on every record
fn fmt_layer<S, W>(format: LogFormat, writer: W, ansi: bool) -> Box<dyn Layer<S> + Send + Sync>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let layer = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_ansi(ansi)
        .with_target(true)
        .with_file(true)
        .with_line_number(true);

    match format {
        LogFormat::Json => layer.json().with_current_span(true).boxed(),
        LogFormat::Text => layer.boxed(),
    }
}

/// Parse log level string to Level
///
/// Accepts the usual tracing names plus `warning`, and maps `fatal` and
/// `panic` to error.
pub fn parse_log_level(level: &str) -> Result<Level> {
    match level.trim().to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" | "warning" => Ok(Level::WARN),
        "error" | "fatal" | "panic" => Ok(Level::ERROR),
        _ => anyhow::bail!("Invalid log level: {level}"),
    }
}

/// Minimum severity for `settings`; unparseable names mean info
pub fn effective_level(settings: &LogSettings) -> Level {
    parse_log_level(&settings.level).unwrap_or(Level::INFO)
}

/// Join the log directory and file name as `path/fileName.log`,
/// dropping one trailing `/` and then one trailing `\` from the directory.
pub fn log_file_path(path: &str, file_name: &str) -> PathBuf {
    let dir = path.strip_suffix('/').unwrap_or(path);
    let dir = dir.strip_suffix('\\').unwrap_or(dir);
    PathBuf::from(format!("{dir}/{file_name}.log"))
}
