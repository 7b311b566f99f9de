//! Handlers for the `people` command group.

use serde_json::json;

use crate::cli::output;
use crate::error::Result;
use crate::store::SqliteLedger;

/// Execute `people list`.
pub fn execute_list(ledger: &SqliteLedger) -> Result<()> {
    let people = ledger.list_people()?;

    if output::is_json() {
        output::json_output(json!({
            "command": "people.list",
            "people": people
                .iter()
                .map(|p| json!({ "id": p.id, "name": p.name }))
                .collect::<Vec<_>>(),
        }));
        return Ok(());
    }

    if people.is_empty() {
        output::note("No people yet. Add one with `bankroll people add <name>`.");
        return Ok(());
    }
    for person in &people {
        output::note(&format!("[{}] {}", person.id, person.name));
    }
    Ok(())
}

/// Execute `people add <name>`.
pub fn execute_add(ledger: &SqliteLedger, name: &str) -> Result<()> {
    let person = ledger.add_person(name)?;

    if output::is_json() {
        output::json_output(json!({
            "command": "people.add",
            "id": person.id,
            "name": person.name,
        }));
        return Ok(());
    }

    output::success(&format!("Added {} (id {})", person.name, person.id));
    Ok(())
}

/// Execute `people rename <id> <name>`.
pub fn execute_rename(ledger: &SqliteLedger, id: i64, name: &str) -> Result<()> {
    let person = ledger.rename_person(id, name)?;

    if output::is_json() {
        output::json_output(json!({
            "command": "people.rename",
            "id": person.id,
            "name": person.name,
        }));
        return Ok(());
    }

    output::success(&format!("Renamed person {} to {}", person.id, person.name));
    Ok(())
}
