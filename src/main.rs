use clap::Parser;

use bankroll::cli::{self, command::Cli, output};

fn main() {
    // Load .env if present; missing files are fine.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    if let Err(err) = cli::run(cli) {
        output::error(&err.to_string());
        std::process::exit(1);
    }
}
