//! Path utilities for bankroll.
//!
//! All data lives under `~/.bankroll/`:
//! - `~/.bankroll/config.toml` - main configuration
//! - `~/.bankroll/bankroll.db` - ledger database

use std::path::PathBuf;

/// Returns the bankroll home directory (`~/.bankroll/`).
pub fn home_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".bankroll")
}

/// Returns the default config file path (`~/.bankroll/config.toml`).
pub fn default_config() -> PathBuf {
    home_dir().join("config.toml")
}

/// Returns the default database path (`~/.bankroll/bankroll.db`).
pub fn default_database() -> PathBuf {
    home_dir().join("bankroll.db")
}
