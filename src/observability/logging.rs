//! Logging configuration
//!
//! Installs a global `tracing` subscriber. The executor emits spans and
//! events whether or not one is installed; embedders that already own a
//! subscriber should skip [`LogConfig::init`].

use thiserror::Error;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Log format style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable multi-line format
    Pretty,
    /// Compact single-line format
    #[default]
    Compact,
}

/// Failure to install the global subscriber
#[derive(Debug, Error)]
pub enum LogInitError {
    #[error("Invalid log level '{level}': {message}")]
    InvalidLevel { level: String, message: String },

    #[error("Global subscriber already installed: {0}")]
    AlreadyInstalled(String),
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Minimum level filter, in `EnvFilter` directive syntax
    pub level: String,
    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl LogConfig {
    pub fn info() -> Self {
        Self::default()
    }

    pub fn debug() -> Self {
        Self::default().with_level("debug")
    }

    pub fn with_level<S: Into<String>>(mut self, level: S) -> Self {
        self.level = level.into();
        self
    }

    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Builds the level filter. `RUST_LOG` wins over the configured level.
    pub fn filter(&self) -> Result<EnvFilter, LogInitError> {
        EnvFilter::try_from_default_env().or_else(|_| {
            EnvFilter::try_new(&self.level).map_err(|e| LogInitError::InvalidLevel {
                level: self.level.clone(),
                message: e.to_string(),
            })
        })
    }

    /// Initializes global logging with this configuration.
    ///
    /// Fails instead of panicking when a subscriber is already installed.
    pub fn init(&self) -> Result<(), LogInitError> {
        let filter = self.filter()?;
        let registry = tracing_subscriber::registry().with(filter);

        let installed = match self.format {
            LogFormat::Pretty => registry.with(fmt::layer().pretty()).try_init(),
            LogFormat::Compact => registry
                .with(fmt::layer().compact().with_target(true))
                .try_init(),
        };

        installed.map_err(|e| LogInitError::AlreadyInstalled(e.to_string()))
    }
}
