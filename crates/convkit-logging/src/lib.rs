//! Logging configuration and utilities for convkit.
//!
//! Library crates only emit `tracing` events. The binary calls [`init`]
//! once to install a subscriber on stderr, so converter output on stdout
//! stays clean.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use tracing_subscriber::EnvFilter;

/// Environment variable that overrides the configured filter
pub const LOG_ENV: &str = "RUST_LOG";

/// Log level for filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    #[default]
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Check if this level should log messages at the given level
    pub fn should_log(&self, level: LogLevel) -> bool {
        *self >= level
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Plain,
    #[default]
    Compact,
    Json,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Minimum log level to output
    pub level: LogLevel,
    /// Output format
    pub format: LogFormat,
    /// Enable timestamps
    pub timestamps: bool,
    /// Component-specific log levels, keyed by crate name
    pub component_levels: BTreeMap<String, LogLevel>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Warn,
            format: LogFormat::Compact,
            timestamps: false,
            component_levels: BTreeMap::new(),
        }
    }
}

impl LoggingConfig {
    /// Create a new logging config with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the log level
    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    /// Set the log format
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Set a component-specific log level
    pub fn with_component_level(mut self, component: impl Into<String>, level: LogLevel) -> Self {
        self.component_levels
            .insert(target_name(&component.into()), level);
        self
    }

    /// Get the effective log level for a component
    pub fn effective_level(&self, component: Option<&str>) -> LogLevel {
        let Some(target) = component.map(target_name) else {
            return self.level;
        };
        self.component_levels
            .iter()
            .find(|(name, _)| target_name(name) == target)
            .map_or(self.level, |(_, level)| *level)
    }

    /// `EnvFilter` directive for this config, e.g. `warn,convkit_hex=debug`.
    ///
    /// Component names may use dashes; tracing targets use underscores.
    pub fn filter_directive(&self) -> String {
        // Keys read from a config file may still be in dashed form
        let targets: BTreeMap<String, LogLevel> = self
            .component_levels
            .iter()
            .map(|(component, level)| (target_name(component), *level))
            .collect();
        let mut directive = self.level.to_string();
        for (target, level) in &targets {
            directive.push_str(&format!(",{target}={level}"));
        }
        directive
    }
}

fn target_name(component: &str) -> String {
    component.replace('-', "_")
}

/// Install the global subscriber writing to stderr.
///
/// `RUST_LOG`, when set, replaces the configured directive.
pub fn init(config: &LoggingConfig) -> anyhow::Result<()> {
    let filter = match std::env::var(LOG_ENV) {
        Ok(env) if !env.trim().is_empty() => EnvFilter::try_new(&env)
            .map_err(|e| anyhow::anyhow!("invalid {LOG_ENV} '{env}': {e}"))?,
        _ => EnvFilter::try_new(config.filter_directive())
            .map_err(|e| anyhow::anyhow!("invalid log filter: {e}"))?,
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true);
    let installed = match (config.format, config.timestamps) {
        (LogFormat::Plain, true) => builder.try_init(),
        (LogFormat::Plain, false) => builder.without_time().try_init(),
        (LogFormat::Compact, true) => builder.compact().try_init(),
        (LogFormat::Compact, false) => builder.compact().without_time().try_init(),
        (LogFormat::Json, true) => builder.json().try_init(),
        (LogFormat::Json, false) => builder.json().without_time().try_init(),
    };
    installed.map_err(|e| anyhow::anyhow!("failed to install logger: {e}"))?;

    tracing::debug!(
        version = env!("CARGO_PKG_VERSION"),
        format = ?config.format,
        "logging initialised"
    );
    Ok(())
}
