//! Tracing subscriber setup.
//!
//! The library itself only emits `tracing` events; applications that want
//! them printed call [`init_tracing`] (or [`init_tracing_with_config`]) once at
//! startup.
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | `RUST_LOG` | | full `EnvFilter` directives, wins over the level below |
//! | `ROUTESTACK_LOG_LEVEL` | `info` | trace/debug/info/warn/error |
//! | `ROUTESTACK_LOG_FORMAT` | `json` | `json` or `pretty` |
//! | `ROUTESTACK_LOG_TARGET_FILTER` | | extra comma separated directives |
//! | `ROUTESTACK_LOG_INCLUDE_LOCATION` | `false` | add file and line |

use anyhow::{Context, Result};
use std::env;
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Log format: JSON for production, pretty-print for development
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

impl LogFormat {
    /// Anything other than `pretty` is JSON.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "pretty" => LogFormat::Pretty,
            _ => LogFormat::Json,
        }
    }

    pub fn from_env() -> Self {
        env::var("ROUTESTACK_LOG_FORMAT")
            .map(|s| Self::parse(&s))
            .unwrap_or(LogFormat::Json)
    }
}

#[derive(Debug, Clone)]
pub struct LogConfig {
    pub log_level: String,
    pub format: LogFormat,
    /// Comma separated `EnvFilter` directives added on top of the level
    pub target_filter: Option<String>,
    pub include_location: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            format: LogFormat::Json,
            target_filter: None,
            include_location: false,
        }
    }
}

impl LogConfig {
    pub fn from_env() -> Self {
        Self {
            log_level: env::var("ROUTESTACK_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            format: LogFormat::from_env(),
            target_filter: env::var("ROUTESTACK_LOG_TARGET_FILTER").ok(),
            include_location: env::var("ROUTESTACK_LOG_INCLUDE_LOCATION")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(false),
        }
    }

    fn level(&self) -> Level {
        match self.log_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        }
    }

    fn env_filter(&self) -> EnvFilter {
        let mut filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.level().as_str()));
        if let Some(target_filter) = &self.target_filter {
            for directive in target_filter.split(',').map(str::trim).filter(|d| !d.is_empty()) {
                match directive.parse() {
                    Ok(directive) => filter = filter.add_directive(directive),
                    Err(_) => eprintln!("Warning: Invalid log filter directive: {directive}"),
                }
            }
        }
        filter
    }
}

/// Install a global subscriber with the given format and default settings.
pub fn init_tracing(format: LogFormat) -> Result<()> {
    init_tracing_with_config(&LogConfig {
        format,
        ..LogConfig::default()
    })
}

/// Install a global subscriber. Fails if one is already installed.
pub fn init_tracing_with_config(config: &LogConfig) -> Result<()> {
    let fmt_layer = match config.format {
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_current_span(true)
            .with_target(true)
            .with_file(config.include_location)
            .with_line_number(config.include_location)
            .boxed(),
        LogFormat::Pretty => tracing_subscriber::fmt::layer()
            .pretty()
            .with_target(true)
            .with_file(config.include_location)
            .with_line_number(config.include_location)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(config.env_filter())
        .with(fmt_layer)
        .try_init()
        .context("Failed to initialize tracing subscriber")
}
