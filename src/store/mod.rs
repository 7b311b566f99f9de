//! Diesel/SQLite persistence for the ledger.

pub mod db;
pub mod ledger;
pub mod model;
pub mod schema;

pub use db::{create_pool, run_migrations, DbPool};
pub use ledger::{BetDetail, HistoryFilter, OwnershipRecord, SqliteLedger};
