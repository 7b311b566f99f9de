//! Terminal output formatting.
//!
//! Provides consistent terminal output with support for JSON mode (for
//! scripting) and quiet mode. Human-readable output uses colored symbols
//! and aligned fields; JSON mode emits one structured line per event.

use std::fmt::Display;
use std::sync::{OnceLock, RwLock};

use owo_colors::OwoColorize;
use serde_json::json;

/// Runtime output configuration shared by CLI handlers.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputConfig {
    /// Emit machine-readable JSON output instead of human-readable text.
    pub json: bool,
    /// Suppress non-essential output.
    pub quiet: bool,
}

impl OutputConfig {
    #[must_use]
    pub const fn new(json: bool, quiet: bool) -> Self {
        Self { json, quiet }
    }
}

static OUTPUT_CONFIG: OnceLock<RwLock<OutputConfig>> = OnceLock::new();

fn config_cell() -> &'static RwLock<OutputConfig> {
    OUTPUT_CONFIG.get_or_init(|| RwLock::new(OutputConfig::default()))
}

fn read_config() -> OutputConfig {
    match config_cell().read() {
        Ok(config) => *config,
        Err(poisoned) => *poisoned.into_inner(),
    }
}

fn regular_output_suppressed(config: OutputConfig) -> bool {
    !config.json && config.quiet
}

fn emit_json_line(kind: &str, payload: serde_json::Value) {
    println!(
        "{}",
        json!({
            "type": kind,
            "payload": payload,
        })
    );
}

/// Apply output settings from global CLI flags. Call this early in the
/// CLI entry point.
pub fn configure(config: OutputConfig) {
    match config_cell().write() {
        Ok(mut current) => *current = config,
        Err(poisoned) => *poisoned.into_inner() = config,
    }
}

/// Return whether machine-readable JSON output is enabled.
#[must_use]
pub fn is_json() -> bool {
    read_config().json
}

/// Return whether quiet mode is enabled.
#[must_use]
pub fn is_quiet() -> bool {
    read_config().quiet
}

/// Print a labeled value.
pub fn field(label: &str, value: impl Display) {
    let config = read_config();
    let value = value.to_string();

    if config.json {
        emit_json_line(
            "field",
            json!({
                "label": label,
                "value": value,
            }),
        );
        return;
    }
    if regular_output_suppressed(config) {
        return;
    }

    println!("  {:<12} {}", label.dimmed(), value);
}

/// Print a success line.
pub fn success(message: &str) {
    let config = read_config();

    if config.json {
        emit_json_line("success", json!({ "message": message }));
        return;
    }
    if regular_output_suppressed(config) {
        return;
    }

    println!("  {} {}", "✓".green(), message);
}

/// Print a warning line.
pub fn warning(message: &str) {
    let config = read_config();

    if config.json {
        emit_json_line("warning", json!({ "message": message }));
        return;
    }

    println!("  {} {}", "⚠".yellow(), message);
}

/// Print an error line.
pub fn error(message: &str) {
    let config = read_config();

    if config.json {
        eprintln!(
            "{}",
            json!({
                "type": "error",
                "payload": { "message": message },
            })
        );
        return;
    }

    eprintln!("  {} {}", "×".red(), message);
}

/// Print a section header.
pub fn section(title: &str) {
    let config = read_config();

    if config.json {
        emit_json_line("section", json!({ "title": title }));
        return;
    }
    if regular_output_suppressed(config) {
        return;
    }

    println!();
    println!("{}", title.bold());
}

/// Print a note/hint.
pub fn note(message: &str) {
    let config = read_config();

    if config.json {
        emit_json_line("note", json!({ "message": message }));
        return;
    }
    if regular_output_suppressed(config) {
        return;
    }

    println!("  {}", message.dimmed());
}

/// Format a gain in green.
pub fn positive(value: impl Display) -> String {
    let value = value.to_string();
    if is_json() {
        return value;
    }
    format!("{}", value.green())
}

/// Format a loss in red.
pub fn negative(value: impl Display) -> String {
    let value = value.to_string();
    if is_json() {
        return value;
    }
    format!("{}", value.red())
}

/// Emit a JSON value directly (for commands with custom JSON output).
pub fn json_output(value: serde_json::Value) {
    println!("{value}");
}

/// Print a table header row.
pub fn table_header(columns: &[(&str, usize)]) {
    let config = read_config();

    if config.json {
        let cols: Vec<&str> = columns.iter().map(|(name, _)| *name).collect();
        emit_json_line("table_header", json!({ "columns": cols }));
        return;
    }
    if regular_output_suppressed(config) {
        return;
    }

    let mut line = String::from("  ");
    for (name, width) in columns {
        line.push_str(&format!("{:>width$} ", name, width = *width));
    }
    println!("{}", line.dimmed());
}

/// Print a table separator line.
pub fn table_separator(widths: &[usize]) {
    let config = read_config();

    if config.json {
        return;
    }
    if regular_output_suppressed(config) {
        return;
    }

    let mut line = String::from("  ");
    for width in widths {
        line.push_str(&"─".repeat(*width));
        line.push(' ');
    }
    println!("{}", line.dimmed());
}

/// Print a table data row.
pub fn table_row(cells: &[String], widths: &[usize]) {
    let config = read_config();

    if config.json {
        emit_json_line("table_row", json!({ "cells": cells }));
        return;
    }
    if regular_output_suppressed(config) {
        return;
    }

    let mut line = String::from("  ");
    for (cell, width) in cells.iter().zip(widths.iter()) {
        line.push_str(&format!("{:>width$} ", cell, width = *width));
    }
    println!("{line}");
}
