//! Handlers for the `db` command group.

use serde_json::json;

use crate::cli::output;
use crate::error::Result;
use crate::store::SqliteLedger;

/// Execute `db init`. Opening the ledger already created the file and
/// ran migrations; this seeds configured people into an empty pool.
pub fn execute_init(ledger: &SqliteLedger, seed_people: &[String]) -> Result<()> {
    let seeded = ledger.seed_people(seed_people)?;

    if output::is_json() {
        output::json_output(json!({
            "command": "db.init",
            "seeded": seeded,
        }));
        return Ok(());
    }

    output::success("Database ready");
    if seeded > 0 {
        output::field("People seeded", seeded);
    } else if !seed_people.is_empty() {
        output::note("People already exist; seed skipped.");
    }
    Ok(())
}

/// Execute `db normalize`.
pub fn execute_normalize(ledger: &SqliteLedger) -> Result<()> {
    let rewritten = ledger.normalize_legacy_enums()?;

    if output::is_json() {
        output::json_output(json!({
            "command": "db.normalize",
            "rows_rewritten": rewritten,
        }));
        return Ok(());
    }

    if rewritten == 0 {
        output::success("All enum tokens already canonical");
    } else {
        output::success(&format!("Rewrote {rewritten} legacy enum value(s)"));
    }
    Ok(())
}
