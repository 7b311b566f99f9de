//! Command-line interface for the bankroll ledger.
//!
//! `run` is the entry point: it loads configuration, wires up logging
//! and output settings, opens the ledger, and dispatches to the handler
//! for the parsed subcommand.

pub mod bet;
pub mod command;
pub mod dashboard;
pub mod history;
pub mod maintenance;
pub mod output;
pub mod paths;
pub mod people;
pub mod transaction;

use std::path::PathBuf;

use crate::config::Config;
use crate::error::Result;
use crate::store::SqliteLedger;

use command::{BetCommand, Cli, Commands, DbCommand, HistoryCommand, PeopleCommand, TxCommand};
use output::OutputConfig;

/// Resolve the database path. CLI flag wins, then the `BANKROLL_DB`
/// environment variable, then the config file, then the default under
/// the home directory.
fn resolve_db_path(cli: &Cli, config: &Config) -> PathBuf {
    if let Some(path) = &cli.db {
        return path.clone();
    }
    if let Ok(path) = std::env::var("BANKROLL_DB") {
        if !path.is_empty() {
            return PathBuf::from(path);
        }
    }
    if let Some(path) = &config.database.path {
        return path.clone();
    }
    paths::default_database()
}

/// Run the parsed CLI command to completion.
pub fn run(cli: Cli) -> Result<()> {
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(paths::default_config);
    let config = Config::load_or_default(&config_path)?;
    config.init_logging(cli.verbose);
    output::configure(OutputConfig::new(cli.json, cli.quiet));

    let db_path = resolve_db_path(&cli, &config);

    // `bet preview` is pure math and must work without a database.
    if let Commands::Bet(BetCommand::Preview(args)) = &cli.command {
        return bet::execute_preview(args);
    }

    let ledger = SqliteLedger::open(&db_path)?;
    match &cli.command {
        Commands::Dashboard => dashboard::execute(&ledger),
        Commands::Bet(BetCommand::New(args)) => bet::execute_new(&ledger, args),
        Commands::Bet(BetCommand::Preview(_)) => unreachable!("handled above"),
        Commands::Bet(BetCommand::Show { id }) => bet::execute_show(&ledger, *id),
        Commands::Bet(BetCommand::Settle(args)) => bet::execute_settle(&ledger, args),
        Commands::Tx(TxCommand::Add(args)) => transaction::execute_add(&ledger, args),
        Commands::Tx(TxCommand::List(args)) => transaction::execute_list(&ledger, args),
        Commands::History(HistoryCommand::List(args)) => history::execute_list(&ledger, args),
        Commands::History(HistoryCommand::Export(args)) => history::execute_export(&ledger, args),
        Commands::People(PeopleCommand::List) => people::execute_list(&ledger),
        Commands::People(PeopleCommand::Add { name }) => people::execute_add(&ledger, name),
        Commands::People(PeopleCommand::Rename { id, name }) => {
            people::execute_rename(&ledger, *id, name)
        }
        Commands::Db(DbCommand::Init) => maintenance::execute_init(&ledger, &config.seed.people),
        Commands::Db(DbCommand::Normalize) => maintenance::execute_normalize(&ledger),
    }
}
