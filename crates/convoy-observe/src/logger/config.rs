use std::{env, io::IsTerminal};

use crate::logger::{error::LoggerError, format::LoggerFormat};

/// Filter directive, e.g. `info` or `convoy_core=debug,warn`.
pub const ENV_LEVEL: &str = "CONVOY_LOG";
/// One of `text`, `json`, `journald`.
pub const ENV_FORMAT: &str = "CONVOY_LOG_FORMAT";

#[derive(Debug, Clone)]
pub struct LoggerConfig {
    pub format: LoggerFormat,
    /// `EnvFilter` directive.
    pub level: String,
    pub with_targets: bool,
    pub use_color: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            format: LoggerFormat::Text,
            level: "info".to_string(),
            with_targets: true,
            use_color: std::io::stderr().is_terminal(),
        }
    }
}

impl LoggerConfig {
    /// Defaults overridden by `CONVOY_LOG` and `CONVOY_LOG_FORMAT`.
    pub fn from_env() -> Result<Self, LoggerError> {
        Self::from_env_or(None, None)
    }

    /// Like [`from_env`](Self::from_env), but explicit values win and their variables are not read.
    pub fn from_env_or(
        level: Option<String>,
        format: Option<LoggerFormat>,
    ) -> Result<Self, LoggerError> {
        Self::from_lookup(|key| env::var(key).ok(), level, format)
    }

    fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
        level: Option<String>,
        format: Option<LoggerFormat>,
    ) -> Result<Self, LoggerError> {
        let mut cfg = Self::default();

        let level = level.or_else(|| lookup(ENV_LEVEL).filter(|v| !v.trim().is_empty()));
        if let Some(level) = level {
            cfg.level = level;
        }

        let format = match format {
            Some(format) => Some(format),
            None => lookup(ENV_FORMAT)
                .filter(|v| !v.trim().is_empty())
                .map(|v| v.parse::<LoggerFormat>())
                .transpose()?,
        };
        if let Some(format) = format {
            cfg = cfg.with_format(format);
        }
        Ok(cfg)
    }

    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = level.into();
        self
    }

    pub fn with_format(mut self, format: LoggerFormat) -> Self {
        self.format = format;
        if format != LoggerFormat::Text {
            self.use_color = false;
        }
        self
    }
}
