//! Handler for the `dashboard` command: per-person money aggregates,
//! open bets with potential payouts, and total exposure.

use serde_json::json;

use crate::cli::output;
use crate::domain::money::{format_dollars, Cents};
use crate::domain::odds::{combined_decimal_odds, parlay_payout};
use crate::error::Result;
use crate::store::SqliteLedger;

/// Execute `dashboard`.
pub fn execute(ledger: &SqliteLedger) -> Result<()> {
    let records = ledger.ownership_summary()?;
    let open = ledger.open_bets()?;
    let total_exposure: Cents = records.iter().map(|r| r.exposure_cents).sum();

    // Potential payout multiplies every leg's odds; result filtering only
    // matters once settlement runs.
    let mut open_rows = Vec::with_capacity(open.len());
    for detail in &open {
        let combined = combined_decimal_odds(detail.legs.iter().map(|l| l.american_odds))?;
        let potential = parlay_payout(detail.bet.total_stake_cents, combined);
        open_rows.push((detail, potential));
    }

    if output::is_json() {
        output::json_output(json!({
            "command": "dashboard",
            "ownership": records
                .iter()
                .map(|r| {
                    json!({
                        "person_id": r.person.id,
                        "person": r.person.name,
                        "ownership_cents": r.ownership_cents,
                        "exposure_cents": r.exposure_cents,
                        "live_money_cents": r.live_money_cents,
                    })
                })
                .collect::<Vec<_>>(),
            "open_bets": open_rows
                .iter()
                .map(|(detail, potential)| {
                    json!({
                        "bet_id": detail.bet.id,
                        "total_stake_cents": detail.bet.total_stake_cents,
                        "legs": detail.legs.len(),
                        "potential_payout_cents": potential,
                    })
                })
                .collect::<Vec<_>>(),
            "total_exposure_cents": total_exposure,
        }));
        return Ok(());
    }

    output::section("Ownership");
    let widths = [16, 12, 12, 12];
    output::table_header(&[
        ("Person", widths[0]),
        ("Ownership", widths[1]),
        ("Live", widths[2]),
        ("Exposure", widths[3]),
    ]);
    output::table_separator(&widths);
    for record in &records {
        output::table_row(
            &[
                record.person.name.clone(),
                format_dollars(record.ownership_cents),
                format_dollars(record.live_money_cents),
                format_dollars(record.exposure_cents),
            ],
            &widths,
        );
    }

    output::section("Open bets");
    if open_rows.is_empty() {
        output::note("No open bets.");
    }
    for (detail, potential) in &open_rows {
        output::note(&format!(
            "#{} - {} staked across {} leg{} - potential {}",
            detail.bet.id,
            format_dollars(detail.bet.total_stake_cents),
            detail.legs.len(),
            if detail.legs.len() == 1 { "" } else { "s" },
            format_dollars(*potential),
        ));
        for leg in &detail.legs {
            output::note(&format!(
                "    [{}] {} - {} ({:+}) - {}",
                leg.id, leg.matchup, leg.bet_description, leg.american_odds, leg.result
            ));
        }
    }

    output::section("Exposure");
    output::field("Total", format_dollars(total_exposure));
    Ok(())
}
