//! Handlers for the `history` command group: filtered listing and CSV
//! export of settled and open bets.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::json;

use crate::cli::bet::person_names;
use crate::cli::output;
use crate::domain::money::format_dollars;
use crate::error::{Error, Result};
use crate::store::{BetDetail, HistoryFilter, SqliteLedger};

use super::command::{HistoryArgs, HistoryExportArgs};

fn parse_date(text: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .map_err(|_| Error::Parse(format!("invalid date '{text}', expected YYYY-MM-DD")))
}

fn day_start(date: NaiveDate) -> DateTime<Utc> {
    date.and_hms_opt(0, 0, 0)
        .unwrap_or_default()
        .and_utc()
}

fn day_end(date: NaiveDate) -> DateTime<Utc> {
    date.and_hms_opt(23, 59, 59)
        .unwrap_or_default()
        .and_utc()
}

fn build_filter(ledger: &SqliteLedger, args: &HistoryArgs) -> Result<HistoryFilter> {
    let person_id = match &args.person {
        Some(selector) => Some(ledger.find_person(selector)?.id),
        None => None,
    };
    Ok(HistoryFilter {
        person_id,
        status: args.status,
        from: args.from.as_deref().map(parse_date).transpose()?.map(day_start),
        to: args.to.as_deref().map(parse_date).transpose()?.map(day_end),
    })
}

/// Execute `history list`.
pub fn execute_list(ledger: &SqliteLedger, args: &HistoryArgs) -> Result<()> {
    let filter = build_filter(ledger, args)?;
    let bets = ledger.history(&filter)?;
    let names = person_names(ledger)?;

    if output::is_json() {
        output::json_output(json!({
            "command": "history.list",
            "bets": bets
                .iter()
                .map(|detail| {
                    json!({
                        "id": detail.bet.id,
                        "total_stake_cents": detail.bet.total_stake_cents,
                        "status": detail.bet.status.as_str(),
                        "placed_at": detail.bet.placed_at.to_rfc3339(),
                        "settled_at": detail.bet.settled_at.map(|ts| ts.to_rfc3339()),
                        "participants": participant_summary(detail, &names),
                    })
                })
                .collect::<Vec<_>>(),
        }));
        return Ok(());
    }

    if bets.is_empty() {
        output::note("No bets match.");
        return Ok(());
    }
    for detail in &bets {
        output::note(&format!(
            "#{} {} {} - {} - {}",
            detail.bet.id,
            detail.bet.placed_at.format("%Y-%m-%d %H:%M"),
            detail.bet.status,
            format_dollars(detail.bet.total_stake_cents),
            participant_summary(detail, &names),
        ));
    }
    Ok(())
}

/// Execute `history export`.
pub fn execute_export(ledger: &SqliteLedger, args: &HistoryExportArgs) -> Result<()> {
    let bets = ledger.history(&HistoryFilter::default())?;
    let names = person_names(ledger)?;
    let csv = export_csv(&bets, &names);

    if output::is_json() {
        if let Some(path) = &args.output {
            std::fs::write(path, &csv)?;
            output::json_output(json!({
                "command": "history.export",
                "status": "written",
                "path": path.display().to_string(),
                "bytes": csv.len(),
            }));
        } else {
            output::json_output(json!({
                "command": "history.export",
                "status": "stdout",
                "csv": csv,
            }));
        }
        return Ok(());
    }

    if let Some(path) = &args.output {
        std::fs::write(path, &csv)?;
        output::success("Bet history export complete");
        output::field("Bets", bets.len());
        output::field("Path", path.display());
    } else {
        print!("{csv}");
    }
    Ok(())
}

/// Build the CSV text for a history export. The participants column is
/// quoted because names and the `;` separator are free-form.
fn export_csv(bets: &[BetDetail], names: &HashMap<i64, String>) -> String {
    let mut csv = String::from("id,participants,stake,status,placed_at,settled_at\n");
    for detail in bets {
        csv.push_str(&format!(
            "{},\"{}\",{},{},{},{}\n",
            detail.bet.id,
            participant_summary(detail, names).replace('"', "\"\""),
            format_dollars(detail.bet.total_stake_cents),
            detail.bet.status,
            detail.bet.placed_at.format("%Y-%m-%d %H:%M"),
            detail
                .bet
                .settled_at
                .map(|ts| ts.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_default(),
        ));
    }
    csv
}

fn participant_summary(detail: &BetDetail, names: &HashMap<i64, String>) -> String {
    detail
        .participants
        .iter()
        .map(|p| {
            let name = names
                .get(&p.person_id)
                .cloned()
                .unwrap_or_else(|| format!("#{}", p.person_id));
            format!("{} ({})", name, format_dollars(p.stake_cents))
        })
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::bet::{Bet, BetParticipant, BetStatus};

    fn sample_detail() -> BetDetail {
        BetDetail {
            bet: Bet {
                id: 1,
                total_stake_cents: 10_000,
                status: BetStatus::Won,
                placed_at: "2026-08-01T12:00:00+00:00".parse().unwrap(),
                settled_at: Some("2026-08-02T09:30:00+00:00".parse().unwrap()),
            },
            legs: vec![],
            participants: vec![
                BetParticipant {
                    id: 1,
                    bet_id: 1,
                    person_id: 1,
                    stake_cents: 6000,
                },
                BetParticipant {
                    id: 2,
                    bet_id: 1,
                    person_id: 2,
                    stake_cents: 4000,
                },
            ],
            settlements: vec![],
        }
    }

    fn sample_names() -> HashMap<i64, String> {
        HashMap::from([(1, "Ryan".to_string()), (2, "Friend".to_string())])
    }

    #[test]
    fn csv_has_header_and_quoted_participants() {
        let csv = export_csv(&[sample_detail()], &sample_names());
        let mut lines = csv.lines();
        assert_eq!(
            lines.next().unwrap(),
            "id,participants,stake,status,placed_at,settled_at"
        );
        let row = lines.next().unwrap();
        assert!(row.starts_with("1,\"Ryan ($60.00); Friend ($40.00)\",$100.00,WON,"));
        assert!(row.contains("2026-08-01 12:00"));
        assert!(row.contains("2026-08-02 09:30"));
    }

    #[test]
    fn csv_leaves_settled_at_empty_for_open_bets() {
        let mut detail = sample_detail();
        detail.bet.status = BetStatus::Open;
        detail.bet.settled_at = None;
        let csv = export_csv(&[detail], &sample_names());
        assert!(csv.lines().nth(1).unwrap().ends_with("OPEN,2026-08-01 12:00,"));
    }

    #[test]
    fn date_parsing() {
        assert!(parse_date("2026-01-31").is_ok());
        assert!(parse_date("01/31/2026").is_err());
        let date = parse_date("2026-01-31").unwrap();
        assert!(day_start(date) < day_end(date));
    }
}
