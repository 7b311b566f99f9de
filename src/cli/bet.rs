//! Handlers for the `bet` command group: creation, preview, inspection,
//! and settlement.

use std::collections::HashMap;

use serde_json::json;

use crate::cli::output;
use crate::domain::bet::{BetDraft, LegDraft, LegResult, StakeDraft};
use crate::domain::money::{format_dollars, parse_dollars, Cents};
use crate::domain::odds::{combined_decimal_odds, decimal_to_american, parlay_payout};
use crate::domain::settlement::LegUpdate;
use crate::error::{Error, Result};
use crate::store::{BetDetail, SqliteLedger};

use super::command::{BetNewArgs, BetSettleArgs};

/// Parse a leg spec of the form `matchup|description|odds`.
pub fn parse_leg_spec(spec: &str) -> Result<LegDraft> {
    let mut parts = spec.splitn(3, '|');
    let (matchup, description, odds) = match (parts.next(), parts.next(), parts.next()) {
        (Some(m), Some(d), Some(o)) => (m.trim(), d.trim(), o.trim()),
        _ => {
            return Err(Error::Parse(format!(
                "leg '{spec}' must be 'matchup|description|odds'"
            )))
        }
    };
    if matchup.is_empty() || description.is_empty() {
        return Err(Error::Parse(format!(
            "leg '{spec}' has an empty matchup or description"
        )));
    }
    let american_odds: i32 = odds
        .parse()
        .map_err(|_| Error::Parse(format!("leg '{spec}' has invalid odds '{odds}'")))?;
    Ok(LegDraft {
        matchup: matchup.to_string(),
        bet_description: description.to_string(),
        american_odds,
    })
}

/// Parse a stake spec of the form `person=dollars`.
pub fn parse_stake_spec(spec: &str) -> Result<(String, Cents)> {
    let (person, amount) = spec
        .split_once('=')
        .ok_or_else(|| Error::Parse(format!("stake '{spec}' must be 'person=dollars'")))?;
    let person = person.trim();
    if person.is_empty() {
        return Err(Error::Parse(format!("stake '{spec}' has an empty person")));
    }
    let cents = parse_dollars(amount)?;
    Ok((person.to_string(), cents))
}

/// Parse a settlement spec of the form `leg_id=won|lost|void`.
pub fn parse_result_spec(spec: &str) -> Result<LegUpdate> {
    let (leg_id, result) = spec
        .split_once('=')
        .ok_or_else(|| Error::Parse(format!("leg result '{spec}' must be 'leg_id=result'")))?;
    let leg_id: i64 = leg_id
        .trim()
        .parse()
        .map_err(|_| Error::Parse(format!("leg result '{spec}' has invalid leg id")))?;
    let result: LegResult = result
        .trim()
        .parse()
        .map_err(|e: String| Error::Parse(e))?;
    Ok(LegUpdate { leg_id, result })
}

fn draft_from_args(ledger: &SqliteLedger, args: &BetNewArgs) -> Result<BetDraft> {
    let legs = args
        .legs
        .iter()
        .map(|spec| parse_leg_spec(spec))
        .collect::<Result<Vec<_>>>()?;
    let stakes = args
        .stakes
        .iter()
        .map(|spec| {
            let (person, cents) = parse_stake_spec(spec)?;
            let person = ledger.find_person(&person)?;
            Ok(StakeDraft {
                person_id: person.id,
                stake_cents: cents,
            })
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(BetDraft::try_new(legs, stakes)?)
}

/// Execute `bet new`.
pub fn execute_new(ledger: &SqliteLedger, args: &BetNewArgs) -> Result<()> {
    let draft = draft_from_args(ledger, args)?;
    let bet_id = ledger.create_bet(&draft)?;

    let combined = combined_decimal_odds(draft.legs().iter().map(|l| l.american_odds))?;
    let potential = parlay_payout(draft.total_stake_cents(), combined);

    if output::is_json() {
        output::json_output(json!({
            "command": "bet.new",
            "bet_id": bet_id,
            "total_stake_cents": draft.total_stake_cents(),
            "potential_payout_cents": potential,
        }));
        return Ok(());
    }

    output::success(&format!("Placed bet #{bet_id}"));
    output::field("Stake", format_dollars(draft.total_stake_cents()));
    output::field("Legs", draft.legs().len());
    output::field("Potential", format_dollars(potential));
    Ok(())
}

/// Execute `bet preview`: payout math only, nothing persisted.
pub fn execute_preview(args: &BetNewArgs) -> Result<()> {
    let legs = args
        .legs
        .iter()
        .map(|spec| parse_leg_spec(spec))
        .collect::<Result<Vec<_>>>()?;
    let mut total_stake: Cents = 0;
    for spec in &args.stakes {
        let (_, cents) = parse_stake_spec(spec)?;
        total_stake += cents;
    }

    let combined = combined_decimal_odds(legs.iter().map(|l| l.american_odds))?;
    let potential = parlay_payout(total_stake, combined);
    let american = decimal_to_american(combined)?;

    if output::is_json() {
        output::json_output(json!({
            "command": "bet.preview",
            "total_stake_cents": total_stake,
            "combined_decimal_odds": combined,
            "combined_american_odds": american,
            "potential_payout_cents": potential,
        }));
        return Ok(());
    }

    output::field("Stake", format_dollars(total_stake));
    output::field("Odds", format!("{american:+} ({combined:.2})"));
    output::field("Potential", format_dollars(potential));
    Ok(())
}

/// Execute `bet show <id>`.
pub fn execute_show(ledger: &SqliteLedger, id: i64) -> Result<()> {
    let detail = ledger.bet_detail(id)?;
    let names = person_names(ledger)?;

    if output::is_json() {
        output::json_output(detail_to_json(&detail, &names));
        return Ok(());
    }

    print_detail(&detail, &names);
    Ok(())
}

/// Execute `bet settle <id> --leg ...`.
pub fn execute_settle(ledger: &SqliteLedger, args: &BetSettleArgs) -> Result<()> {
    let updates = args
        .legs
        .iter()
        .map(|spec| parse_result_spec(spec))
        .collect::<Result<Vec<_>>>()?;
    let decision = ledger.settle_bet(args.id, &updates)?;
    let names = person_names(ledger)?;

    if output::is_json() {
        output::json_output(json!({
            "command": "bet.settle",
            "bet_id": args.id,
            "status": decision.status.as_str(),
            "total_payout_cents": decision.total_payout_cents,
            "settlements": decision
                .settlements
                .iter()
                .map(|s| {
                    json!({
                        "person_id": s.person_id,
                        "person": names.get(&s.person_id),
                        "net_cents": s.net_cents,
                    })
                })
                .collect::<Vec<_>>(),
        }));
        return Ok(());
    }

    if decision.status.is_terminal() {
        output::success(&format!("Bet #{} settled: {}", args.id, decision.status));
    } else {
        output::success(&format!("Bet #{} updated", args.id));
        output::note("Some legs are still pending; the bet stays open.");
    }
    if decision.total_payout_cents > 0 {
        output::field("Payout", format_dollars(decision.total_payout_cents));
    }
    for settlement in &decision.settlements {
        let name = names
            .get(&settlement.person_id)
            .cloned()
            .unwrap_or_else(|| format!("#{}", settlement.person_id));
        let net = format_dollars(settlement.net_cents);
        let net = if settlement.net_cents >= 0 {
            output::positive(net)
        } else {
            output::negative(net)
        };
        output::field(&name, net);
    }
    Ok(())
}

pub(crate) fn person_names(ledger: &SqliteLedger) -> Result<HashMap<i64, String>> {
    Ok(ledger
        .list_people()?
        .into_iter()
        .map(|p| (p.id, p.name))
        .collect())
}

fn detail_to_json(detail: &BetDetail, names: &HashMap<i64, String>) -> serde_json::Value {
    json!({
        "command": "bet.show",
        "bet": {
            "id": detail.bet.id,
            "total_stake_cents": detail.bet.total_stake_cents,
            "status": detail.bet.status.as_str(),
            "placed_at": detail.bet.placed_at.to_rfc3339(),
            "settled_at": detail.bet.settled_at.map(|ts| ts.to_rfc3339()),
        },
        "legs": detail
            .legs
            .iter()
            .map(|leg| {
                json!({
                    "id": leg.id,
                    "matchup": leg.matchup,
                    "bet_description": leg.bet_description,
                    "american_odds": leg.american_odds,
                    "result": leg.result.as_str(),
                })
            })
            .collect::<Vec<_>>(),
        "participants": detail
            .participants
            .iter()
            .map(|p| {
                json!({
                    "person_id": p.person_id,
                    "person": names.get(&p.person_id),
                    "stake_cents": p.stake_cents,
                })
            })
            .collect::<Vec<_>>(),
        "settlements": detail
            .settlements
            .iter()
            .map(|s| {
                json!({
                    "person_id": s.person_id,
                    "person": names.get(&s.person_id),
                    "net_cents": s.net_cents,
                    "ts": s.ts.to_rfc3339(),
                })
            })
            .collect::<Vec<_>>(),
    })
}

fn print_detail(detail: &BetDetail, names: &HashMap<i64, String>) {
    output::section(&format!(
        "Bet #{} - {} - {}",
        detail.bet.id,
        format_dollars(detail.bet.total_stake_cents),
        detail.bet.status
    ));
    output::field("Placed", detail.bet.placed_at.format("%Y-%m-%d %H:%M"));
    if let Some(settled_at) = detail.bet.settled_at {
        output::field("Settled", settled_at.format("%Y-%m-%d %H:%M"));
    }

    output::section("Legs");
    for leg in &detail.legs {
        output::note(&format!(
            "[{}] {} - {} ({:+}) - {}",
            leg.id, leg.matchup, leg.bet_description, leg.american_odds, leg.result
        ));
    }

    output::section("Participants");
    for participant in &detail.participants {
        let name = names
            .get(&participant.person_id)
            .cloned()
            .unwrap_or_else(|| format!("#{}", participant.person_id));
        output::field(&name, format_dollars(participant.stake_cents));
    }

    if !detail.settlements.is_empty() {
        output::section("Settlements");
        for settlement in &detail.settlements {
            let name = names
                .get(&settlement.person_id)
                .cloned()
                .unwrap_or_else(|| format!("#{}", settlement.person_id));
            let net = format_dollars(settlement.net_cents);
            let net = if settlement.net_cents >= 0 {
                output::positive(net)
            } else {
                output::negative(net)
            };
            output::field(&name, net);
        }
    }
}
