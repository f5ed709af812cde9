//! Logging infrastructure for the Get Notes RAG service.
//!
//! This module initializes the tracing subscriber for structured logging.
//! All logs are emitted to stderr to keep stdout clean for answers; a log
//! file can be added alongside it.

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::config::AppConfig;
use crate::error::{AppError, AppResult};

/// Options for [`init_logging`].
#[derive(Debug, Clone, Default)]
pub struct LoggingOptions {
    /// Filter directive (e.g., "debug", "getnote_knowledge=trace")
    pub level: Option<String>,

    /// Disable ANSI colors on stderr
    pub no_color: bool,

    /// Emit JSON lines instead of human-readable output
    pub json: bool,

    /// Also append logs to this file
    pub file: Option<PathBuf>,
}

impl From<&AppConfig> for LoggingOptions {
    fn from(config: &AppConfig) -> Self {
        Self {
            level: config.log_level.clone(),
            no_color: config.no_color,
            json: config.log_json,
            file: config.log_file.clone(),
        }
    }
}

/// Initialize the tracing subscriber.
///
/// This sets up structured logging with:
/// - Output to stderr (stdout is reserved for data)
/// - Environment-based filtering (provided level, `RUST_LOG`, or `info`)
/// - Human-readable or JSON format
/// - Optional append-mode log file without ANSI codes
///
/// Call once at process start.
///
/// # Example
/// ```no_run
/// use getnote_core::logging::{init_logging, LoggingOptions};
///
/// init_logging(&LoggingOptions::default()).expect("Failed to initialize logging");
/// ```
pub fn init_logging(options: &LoggingOptions) -> AppResult<()> {
    let filter_str = options
        .level
        .clone()
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| "info".to_string());

    let env_filter = EnvFilter::try_new(&filter_str)
        .map_err(|e| AppError::Config(format!("Invalid log filter: {}", e)))?;

    let ansi = !options.no_color && supports_color();

    let stderr_layer = if options.json {
        fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_target(true)
            .boxed()
    } else {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_level(true)
            .with_ansi(ansi)
            .boxed()
    };

    let file_layer = match &options.file {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| {
                    AppError::Config(format!("Failed to open log file {:?}: {}", path, e))
                })?;
            Some(
                fmt::layer()
                    .with_writer(Mutex::new(file))
                    .with_target(true)
                    .with_ansi(false)
                    .boxed(),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| AppError::Config(format!("Failed to init logging: {}", e)))?;

    Ok(())
}

/// Check if the terminal supports color output.
fn supports_color() -> bool {
    std::env::var("NO_COLOR").is_err()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_from_config() {
        let mut config = AppConfig::default();
        config.log_level = Some("warn".to_string());
        config.log_json = true;

        let options = LoggingOptions::from(&config);
        assert_eq!(options.level.as_deref(), Some("warn"));
        assert!(options.json);
        assert!(options.file.is_none());
    }

    #[test]
    fn test_invalid_filter_is_config_error() {
        let options = LoggingOptions {
            level: Some("getnote=notalevel".to_string()),
            ..Default::default()
        };
        assert!(matches!(init_logging(&options), Err(AppError::Config(_))));
    }
}
