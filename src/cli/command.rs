//! Command-line interface definitions.
//!
//! Defines the CLI structure for the bankroll application using `clap`.
//! The CLI supports subcommands for the dashboard, bet creation and
//! settlement, money transactions, bet history, people management, and
//! database maintenance.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::domain::bet::{BetStatus, TransactionKind};

/// Shared betting-pool ledger and parlay settlement CLI
#[derive(Parser, Debug)]
#[command(name = "bankroll")]
#[command(version)]
pub struct Cli {
    /// JSON output for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Decrease output verbosity
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase log verbosity
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Path to the SQLite database file
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Path to the configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands for the bankroll CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show per-person ownership, open bets, and exposure
    Dashboard,

    /// Create, inspect, preview, and settle bets
    #[command(subcommand)]
    Bet(BetCommand),

    /// Record money moved into or out of the pool
    #[command(subcommand)]
    Tx(TxCommand),

    /// View and export bet history
    #[command(subcommand)]
    History(HistoryCommand),

    /// Manage pool members
    #[command(subcommand)]
    People(PeopleCommand),

    /// Database maintenance
    #[command(subcommand)]
    Db(DbCommand),
}

/// Subcommands for `bankroll bet`.
#[derive(Subcommand, Debug)]
pub enum BetCommand {
    /// Place a new bet with one or more legs and participants.
    New(BetNewArgs),
    /// Compute potential payout for a bet without saving it.
    Preview(BetNewArgs),
    /// Show a bet with its legs, participants, and settlements.
    Show {
        /// Bet id.
        id: i64,
    },
    /// Submit leg results and settle the bet when they are conclusive.
    Settle(BetSettleArgs),
}

/// Arguments shared by `bet new` and `bet preview`.
#[derive(Parser, Debug)]
pub struct BetNewArgs {
    /// Leg spec `matchup|description|odds`, e.g. "Lakers vs Celtics|Lakers -2.5|-110". Repeatable.
    #[arg(long = "leg", required = true)]
    pub legs: Vec<String>,

    /// Stake spec `person=dollars`, e.g. "Ryan=60". Repeatable.
    #[arg(long = "stake", required = true)]
    pub stakes: Vec<String>,
}

/// Arguments for `bet settle`.
#[derive(Parser, Debug)]
pub struct BetSettleArgs {
    /// Bet id.
    pub id: i64,

    /// Result spec `leg_id=won|lost|void`, repeatable. Legs omitted here
    /// stay pending.
    #[arg(long = "leg", required = true)]
    pub legs: Vec<String>,
}

/// Subcommands for `bankroll tx`.
#[derive(Subcommand, Debug)]
pub enum TxCommand {
    /// Record a deposit, withdrawal, or adjustment.
    Add(TxAddArgs),
    /// List transactions, newest first.
    List(TxListArgs),
}

/// Arguments for `tx add`.
#[derive(Parser, Debug)]
pub struct TxAddArgs {
    /// Person name or id.
    #[arg(long)]
    pub person: String,

    /// Transaction kind.
    #[arg(long)]
    pub kind: TransactionKind,

    /// Amount in dollars, e.g. "100" or "12.50". Withdrawals are
    /// recorded with the sign as given.
    #[arg(long)]
    pub amount: String,

    /// Optional free-form note.
    #[arg(long)]
    pub note: Option<String>,
}

/// Arguments for `tx list`.
#[derive(Parser, Debug)]
pub struct TxListArgs {
    /// Restrict to one person (name or id).
    #[arg(long)]
    pub person: Option<String>,
}

/// Subcommands for `bankroll history`.
#[derive(Subcommand, Debug)]
pub enum HistoryCommand {
    /// List bets, newest first, with optional filters.
    List(HistoryArgs),
    /// Export bet history as CSV.
    Export(HistoryExportArgs),
}

/// Filter arguments for `history list`.
#[derive(Parser, Debug)]
pub struct HistoryArgs {
    /// Restrict to bets involving this person (name or id).
    #[arg(long)]
    pub person: Option<String>,

    /// Restrict to one bet status.
    #[arg(long)]
    pub status: Option<BetStatus>,

    /// Earliest placement date (YYYY-MM-DD, inclusive).
    #[arg(long)]
    pub from: Option<String>,

    /// Latest placement date (YYYY-MM-DD, inclusive).
    #[arg(long)]
    pub to: Option<String>,
}

/// Arguments for `history export`.
#[derive(Parser, Debug)]
pub struct HistoryExportArgs {
    /// Output file path (writes to stdout if not specified).
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Subcommands for `bankroll people`.
#[derive(Subcommand, Debug)]
pub enum PeopleCommand {
    /// List pool members.
    List,
    /// Add a pool member.
    Add {
        /// Display name.
        name: String,
    },
    /// Rename a pool member.
    Rename {
        /// Person id.
        id: i64,
        /// New display name.
        name: String,
    },
}

/// Subcommands for `bankroll db`.
#[derive(Subcommand, Debug)]
pub enum DbCommand {
    /// Create the database, run migrations, and seed configured people.
    Init,
    /// Rewrite legacy lowercase enum tokens to their canonical names.
    Normalize,
}
