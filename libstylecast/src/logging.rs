//! Logging setup shared by the Stylecast binaries
//!
//! The CLIs log to stderr in one of three formats chosen by
//! `STYLECAST_LOG_FORMAT`; `RUST_LOG` overrides the level when present.
//! The TUI draws on the terminal, so it logs to a file or not at all.
//!
//! ```no_run
//! use libstylecast::logging;
//!
//! // style-transform: warnings by default, debug with --verbose
//! logging::config_from_env("warn", true).init();
//!
//! // style-tui: only when STYLECAST_LOG_FILE is set
//! logging::config_from_env("info", false)
//!     .with_file("/tmp/style-tui.log")
//!     .init();
//! ```

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Mutex;

/// Selects the log output format
pub const LOG_FORMAT_ENV: &str = "STYLECAST_LOG_FORMAT";

/// Selects the minimum log level
pub const LOG_LEVEL_ENV: &str = "STYLECAST_LOG_LEVEL";

/// Redirects logs to a file (the TUI only logs when this is set)
pub const LOG_FILE_ENV: &str = "STYLECAST_LOG_FILE";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Plain lines without colors, suitable for piping
    #[default]
    Text,
    /// One JSON object per line
    Json,
    /// Multi-line colored output for development
    Pretty,
}

impl LogFormat {
    const ALL: [LogFormat; 3] = [LogFormat::Text, LogFormat::Json, LogFormat::Pretty];

    pub fn as_str(self) -> &'static str {
        match self {
            LogFormat::Text => "text",
            LogFormat::Json => "json",
            LogFormat::Pretty => "pretty",
        }
    }
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|format| format.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown log format '{}' (expected text, json or pretty)", s))
    }
}

impl std::fmt::Display for LogFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where and how much to log
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub format: LogFormat,
    pub level: String,
    pub verbose: bool,
    pub file: Option<PathBuf>,
}

impl LoggingConfig {
    /// `verbose` raises the fallback level to debug; `RUST_LOG` still wins
    pub fn new(format: LogFormat, level: String, verbose: bool) -> Self {
        Self {
            format,
            level,
            verbose,
            file: None,
        }
    }

    /// Write logs to `path` (appending) instead of stderr
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        self.file = Some(path.as_ref().to_path_buf());
        self
    }

    fn filter(&self) -> tracing_subscriber::EnvFilter {
        use tracing_subscriber::EnvFilter;

        let fallback = if self.verbose { "debug" } else { self.level.as_str() };
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback))
    }

    /// Install the global subscriber
    ///
    /// A second call is ignored, as is a log file that cannot be opened.
    pub fn init(&self) {
        if let Some(ref path) = self.file {
            let file = match std::fs::OpenOptions::new().create(true).append(true).open(path) {
                Ok(file) => file,
                Err(e) => {
                    eprintln!("Warning: cannot open log file {}: {}", path.display(), e);
                    return;
                }
            };
            let _ = tracing_subscriber::fmt()
                .with_env_filter(self.filter())
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_target(true)
                .try_init();
            return;
        }

        let result = match self.format {
            LogFormat::Json => {
                // One JSON object per line on stderr
                tracing_subscriber::fmt()
                    .json()
                    .with_env_filter(self.filter())
                    .with_writer(std::io::stderr)
                    .with_current_span(true)
                    .with_span_list(true)
                    .flatten_event(true)
                    .with_target(true)
                    .with_line_number(true)
                    .with_file(true)
                    .try_init()
            }
            LogFormat::Pretty => tracing_subscriber::fmt()
                .pretty()
                .with_env_filter(self.filter())
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_line_number(true)
                .with_file(true)
                .try_init(),
            LogFormat::Text => tracing_subscriber::fmt()
                .with_env_filter(self.filter())
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_level(true)
                .try_init(),
        };

        if result.is_err() {
            tracing::debug!("Logging already initialized");
        }
    }
}

/// Read `STYLECAST_LOG_FORMAT` and `STYLECAST_LOG_LEVEL`, falling back to
/// text output at `default_level`
pub fn config_from_env(default_level: &str, verbose: bool) -> LoggingConfig {
    let format = std::env::var(LOG_FORMAT_ENV)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or_default();

    let level = std::env::var(LOG_LEVEL_ENV).unwrap_or_else(|_| default_level.to_string());

    LoggingConfig::new(format, level, verbose)
}

/// Environment-driven setup at info level
pub fn init_default() {
    config_from_env("info", false).init();
}
