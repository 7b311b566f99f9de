//! Handlers for the `tx` command group.

use serde_json::json;

use crate::cli::output;
use crate::domain::money::{format_dollars, parse_dollars};
use crate::error::Result;
use crate::store::SqliteLedger;

use super::command::{TxAddArgs, TxListArgs};

/// Execute `tx add`.
pub fn execute_add(ledger: &SqliteLedger, args: &TxAddArgs) -> Result<()> {
    let person = ledger.find_person(&args.person)?;
    let amount_cents = parse_dollars(&args.amount)?;
    let transaction =
        ledger.record_transaction(person.id, args.kind, amount_cents, args.note.clone())?;

    if output::is_json() {
        output::json_output(json!({
            "command": "tx.add",
            "transaction_id": transaction.id,
            "person_id": person.id,
            "person": person.name,
            "kind": transaction.kind.as_str(),
            "amount_cents": transaction.amount_cents,
        }));
        return Ok(());
    }

    output::success(&format!(
        "Recorded {} of {} for {}",
        transaction.kind.as_str().to_lowercase(),
        format_dollars(transaction.amount_cents),
        person.name
    ));
    Ok(())
}

/// Execute `tx list`.
pub fn execute_list(ledger: &SqliteLedger, args: &TxListArgs) -> Result<()> {
    let person_id = match &args.person {
        Some(selector) => Some(ledger.find_person(selector)?.id),
        None => None,
    };
    let transactions = ledger.list_transactions(person_id)?;
    let names: std::collections::HashMap<i64, String> = ledger
        .list_people()?
        .into_iter()
        .map(|p| (p.id, p.name))
        .collect();

    if output::is_json() {
        output::json_output(json!({
            "command": "tx.list",
            "transactions": transactions
                .iter()
                .map(|t| {
                    json!({
                        "id": t.id,
                        "person_id": t.person_id,
                        "person": names.get(&t.person_id),
                        "kind": t.kind.as_str(),
                        "amount_cents": t.amount_cents,
                        "note": t.note,
                        "ts": t.ts.to_rfc3339(),
                    })
                })
                .collect::<Vec<_>>(),
        }));
        return Ok(());
    }

    if transactions.is_empty() {
        output::note("No transactions recorded.");
        return Ok(());
    }
    for transaction in &transactions {
        let name = names
            .get(&transaction.person_id)
            .cloned()
            .unwrap_or_else(|| format!("#{}", transaction.person_id));
        let mut line = format!(
            "{} {} {} {}",
            transaction.ts.format("%Y-%m-%d %H:%M"),
            name,
            transaction.kind.as_str(),
            format_dollars(transaction.amount_cents),
        );
        if let Some(note) = &transaction.note {
            line.push_str(&format!(" ({note})"));
        }
        output::note(&line);
    }
    Ok(())
}
