//! Subscriber setup for applications that embed the client
//!
//! The library only emits `tracing` events under the `callmgr_client`
//! target. Applications with a subscriber of their own need nothing from
//! this module; the rest can call [`setup_logging`] once at startup.
//!
//! Unless `RUST_LOG` says otherwise, only this crate's events at or above
//! the configured level are kept.

use std::str::FromStr;
use tracing::{Level, Subscriber};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{fmt, EnvFilter};

use crate::error::{CallManagerError, ClientResult};

/// Target prefix of every event the library emits
pub const LOG_TARGET: &str = "callmgr_client";

/// Output encoding of log lines
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human readable single lines
    #[default]
    Text,
    /// One JSON object per event, for log collectors
    Json,
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Minimum level of the library's own events
    pub level: Level,
    pub format: LogFormat,
    /// Include source file and line in every event
    pub source_location: bool,
    /// Let `RUST_LOG` replace the default filter when it is set
    pub honor_rust_log: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            format: LogFormat::Text,
            source_location: false,
            honor_rust_log: true,
        }
    }
}

impl LoggingConfig {
    pub fn new(level: Level) -> Self {
        Self {
            level,
            ..Default::default()
        }
    }

    pub fn with_json(mut self) -> Self {
        self.format = LogFormat::Json;
        self
    }

    pub fn with_source_location(mut self) -> Self {
        self.source_location = true;
        self
    }

    /// Ignore `RUST_LOG` and always apply the default filter
    pub fn ignore_rust_log(mut self) -> Self {
        self.honor_rust_log = false;
        self
    }

    /// The filter directive applied when `RUST_LOG` is not used
    pub fn default_directive(&self) -> String {
        format!("{}={}", LOG_TARGET, self.level.as_str().to_ascii_lowercase())
    }

    fn env_filter(&self) -> EnvFilter {
        let from_env = if self.honor_rust_log {
            EnvFilter::try_from_default_env().ok()
        } else {
            None
        };
        from_env.unwrap_or_else(|| EnvFilter::new(self.default_directive()))
    }
}

/// Build a subscriber for `config` writing to `writer`
///
/// Use with [`tracing::subscriber::with_default`] to scope it, or install it
/// globally through [`setup_logging`].
pub fn build_subscriber<W>(config: &LoggingConfig, writer: W) -> Box<dyn Subscriber + Send + Sync>
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let builder = fmt::Subscriber::builder()
        .with_env_filter(config.env_filter())
        .with_writer(writer)
        .with_file(config.source_location)
        .with_line_number(config.source_location);

    match config.format {
        LogFormat::Text => Box::new(builder.finish()),
        LogFormat::Json => Box::new(builder.json().finish()),
    }
}

/// Install a stdout subscriber as the global default
///
/// Fails with `OperationFailed` if a global subscriber is already set.
pub fn setup_logging(config: LoggingConfig) -> ClientResult<()> {
    let subscriber = build_subscriber(&config, std::io::stdout);
    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| CallManagerError::operation_failed(format!("logging setup failed: {}", e)))?;

    tracing::info!(
        target: LOG_TARGET,
        version = crate::VERSION,
        format = ?config.format,
        "Call manager client logging enabled"
    );
    Ok(())
}

/// Parse a level name such as `debug` or `WARN`
pub fn parse_log_level(level: &str) -> ClientResult<Level> {
    Level::from_str(level)
        .map_err(|_| CallManagerError::invalid_parameter(format!("unknown log level {:?}", level)))
}
