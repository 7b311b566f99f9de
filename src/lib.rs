//! Shared betting-pool ledger.
//!
//! Tracks a pot of money owned by several people, records parlay bets
//! placed against it, and settles those bets into per-person nets when
//! results come in. All money is stored as integer cents and all odds
//! math happens on decimal odds converted from American prices.

pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod store;

pub use error::{Error, Result};
