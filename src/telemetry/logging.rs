//! Logging configuration and initialization
//!
//! Console output is compact text by default or JSON for log aggregation;
//! an optional file sink is written through a non-blocking appender.

use std::path::PathBuf;

pub use tracing_appender::non_blocking::WorkerGuard as LogGuard;
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

use crate::settings::ServerSettings;

/// Environment variable holding the filter directive
pub const LOG_ENV: &str = "OVERLAY_FX_LOG";
/// Environment variable selecting the output format (`json` or `text`)
pub const LOG_FORMAT_ENV: &str = "OVERLAY_FX_LOG_FORMAT";

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Enable console output (default: true)
    pub console_enabled: bool,
    /// Mirror logs to this file when set
    pub file_path: Option<PathBuf>,
    /// Use JSON format on the console (default: false)
    pub json_format: bool,
    /// Filter used when neither environment variable is set (default: "info")
    pub default_level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            console_enabled: true,
            file_path: None,
            json_format: false,
            default_level: "info".to_string(),
        }
    }
}

impl From<&ServerSettings> for LogConfig {
    fn from(settings: &ServerSettings) -> Self {
        Self {
            console_enabled: true,
            file_path: settings.log_file.as_ref().map(PathBuf::from),
            json_format: settings.log_json,
            default_level: settings.log_level.clone(),
        }
    }
}

impl LogConfig {
    /// Filter from `OVERLAY_FX_LOG`, then `RUST_LOG`, then the configured level
    fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_from_env(LOG_ENV)
            .or_else(|_| EnvFilter::try_from_env("RUST_LOG"))
            .unwrap_or_else(|_| EnvFilter::new(&self.default_level))
    }

    fn use_json(&self) -> bool {
        std::env::var(LOG_FORMAT_ENV)
            .map(|v| v.eq_ignore_ascii_case("json"))
            .unwrap_or(self.json_format)
    }
}

/// Install the global subscriber
///
/// The returned guard flushes the file sink on drop, so the caller keeps it
/// alive for the lifetime of the program.
///
/// ```no_run
/// use overlay_fx::telemetry::{init_logging, LogConfig};
///
/// let _guard = init_logging(&LogConfig::default()).expect("logging");
/// ```
pub fn init_logging(config: &LogConfig) -> Result<Option<LogGuard>, Box<dyn std::error::Error + Send + Sync>> {
    let use_json = config.use_json();

    let mut file_guard = None;
    let file_layer = match &config.file_path {
        Some(path) => {
            let file = std::fs::File::create(path)?;
            let (writer, guard) = tracing_appender::non_blocking(file);
            file_guard = Some(guard);
            Some(
                fmt::layer()
                    .with_writer(writer)
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true)
                    .with_ansi(false),
            )
        }
        None => None,
    };

    let console_json = (config.console_enabled && use_json).then(|| {
        fmt::layer()
            .json()
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
    });
    let console_text = (config.console_enabled && !use_json).then(|| {
        fmt::layer()
            .with_target(true)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
            .compact()
    });

    tracing_subscriber::registry()
        .with(config.env_filter())
        .with(file_layer)
        .with(console_json)
        .with(console_text)
        .try_init()?;

    tracing::info!(
        target: "overlay_fx",
        version = env!("CARGO_PKG_VERSION"),
        json_format = use_json,
        file = ?config.file_path,
        "Logging initialized"
    );

    Ok(file_guard)
}
