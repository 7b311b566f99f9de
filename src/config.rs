//! Configuration loading and logging setup.
//!
//! Config lives in a TOML file (default `~/.bankroll/config.toml`). Every
//! section is optional; a missing file yields the defaults. CLI flags and
//! the `BANKROLL_DB` environment variable take precedence over the file.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing_subscriber::EnvFilter;

use crate::error::{ConfigError, Result};

#[derive(Debug, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    pub seed: SeedConfig,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file. Overridden by `--db` and
    /// `BANKROLL_DB`.
    pub path: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// Base log level when no `-v` flags or `RUST_LOG` are given.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".into(),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct SeedConfig {
    /// Names inserted by `bankroll db init` into an empty persons table.
    pub people: Vec<String>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        let config: Config = toml::from_str(&content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration, falling back to defaults when the file does
    /// not exist. Parse errors in an existing file still fail.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    fn validate(&self) -> Result<()> {
        match self.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
            other => Err(ConfigError::InvalidValue {
                field: "logging.level",
                reason: format!("unknown log level '{other}'"),
            }
            .into()),
        }
    }

    /// Initialize tracing output. `-v` flags raise the level above the
    /// configured base; `RUST_LOG` wins over both.
    pub fn init_logging(&self, verbosity: u8) {
        let level = match verbosity {
            0 => self.logging.level.as_str(),
            1 => "info",
            2 => "debug",
            _ => "trace",
        };
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(level));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
}
