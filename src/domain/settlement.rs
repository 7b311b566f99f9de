//! Settlement engine: pure decision logic for terminal bet transitions.
//!
//! Given the current leg results, the participant stakes, and a batch of
//! result updates, [`settle`] decides the bet's next status and, when the
//! transition is terminal with monetary consequence, each participant's
//! net settlement. The function is pure; the store wraps it in a single
//! database transaction and persists whatever it returns.
//!
//! Decision rules, in order:
//! 1. any LOST leg → bet LOST, every participant loses their full stake;
//! 2. any PENDING leg → bet stays OPEN, updates are kept, no settlements;
//! 3. all VOID → bet VOID, no settlements;
//! 4. otherwise WON: combined odds are the product of the WON legs'
//!    decimal odds (VOID legs contribute factor 1) and the payout is
//!    split proportionally to stake.

use super::bet::{BetStatus, LegResult};
use super::error::DomainError;
use super::money::Cents;
use super::odds::{american_to_decimal, parlay_payout};

/// Current state of one leg as loaded from storage.
#[derive(Debug, Clone, Copy)]
pub struct LegState {
    pub leg_id: i64,
    pub american_odds: i32,
    pub result: LegResult,
}

/// One participant's stake as loaded from storage.
#[derive(Debug, Clone, Copy)]
pub struct ParticipantStake {
    pub person_id: i64,
    pub stake_cents: Cents,
}

/// A result submitted for one leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LegUpdate {
    pub leg_id: i64,
    pub result: LegResult,
}

/// Net outcome for one participant on a terminal transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParticipantNet {
    pub person_id: i64,
    pub net_cents: Cents,
}

/// Outcome of a settlement run.
#[derive(Debug, Clone)]
pub struct SettlementDecision {
    /// The bet's next status. `Open` means some legs are still pending.
    pub status: BetStatus,
    /// Post-update result of every leg, in input order.
    pub leg_results: Vec<(i64, LegResult)>,
    /// Settlements to insert. Empty for `Open` and `Void` outcomes.
    pub settlements: Vec<ParticipantNet>,
    /// Total payout in cents for a `Won` outcome, zero otherwise.
    pub total_payout_cents: Cents,
}

/// Run the settlement decision for one bet.
///
/// `bet_status` must be `Open`; settling a terminal bet is a hard error so
/// a repeated submission can never insert duplicate settlement rows.
/// Updates may only move legs out of `Pending`; submitting `Pending` for a
/// leg is a no-op, and re-resolving an already-resolved leg is rejected.
pub fn settle(
    bet_status: BetStatus,
    legs: &[LegState],
    participants: &[ParticipantStake],
    updates: &[LegUpdate],
) -> Result<SettlementDecision, DomainError> {
    if bet_status.is_terminal() {
        return Err(DomainError::AlreadySettled { status: bet_status });
    }
    if legs.is_empty() {
        return Err(DomainError::EmptyLegs);
    }
    if participants.is_empty() {
        return Err(DomainError::EmptyParticipants);
    }

    let mut legs: Vec<LegState> = legs.to_vec();
    for update in updates {
        let leg = legs
            .iter_mut()
            .find(|l| l.leg_id == update.leg_id)
            .ok_or(DomainError::UnknownLeg {
                leg_id: update.leg_id,
            })?;
        if update.result == LegResult::Pending {
            continue;
        }
        if leg.result != LegResult::Pending {
            return Err(DomainError::LegAlreadyResolved {
                leg_id: update.leg_id,
            });
        }
        leg.result = update.result;
    }

    let leg_results: Vec<(i64, LegResult)> =
        legs.iter().map(|l| (l.leg_id, l.result)).collect();

    if legs.iter().any(|l| l.result == LegResult::Lost) {
        // One lost leg sinks the parlay: every stake is forfeit.
        let settlements = participants
            .iter()
            .map(|p| ParticipantNet {
                person_id: p.person_id,
                net_cents: -p.stake_cents,
            })
            .collect();
        return Ok(SettlementDecision {
            status: BetStatus::Lost,
            leg_results,
            settlements,
            total_payout_cents: 0,
        });
    }

    if legs.iter().any(|l| l.result == LegResult::Pending) {
        return Ok(SettlementDecision {
            status: BetStatus::Open,
            leg_results,
            settlements: Vec::new(),
            total_payout_cents: 0,
        });
    }

    if legs.iter().all(|l| l.result == LegResult::Void) {
        // Stakes stop counting as exposure; no cents move, so no rows.
        return Ok(SettlementDecision {
            status: BetStatus::Void,
            leg_results,
            settlements: Vec::new(),
            total_payout_cents: 0,
        });
    }

    // All legs WON or VOID with at least one WON.
    let mut combined = 1.0;
    for leg in legs.iter().filter(|l| l.result == LegResult::Won) {
        combined *= american_to_decimal(leg.american_odds)?;
    }

    let total_stake: Cents = participants.iter().map(|p| p.stake_cents).sum();
    let total_payout = parlay_payout(total_stake, combined);
    let settlements = split_payout(participants, total_stake, total_payout);

    Ok(SettlementDecision {
        status: BetStatus::Won,
        leg_results,
        settlements,
        total_payout_cents: total_payout,
    })
}

/// Split a total payout across participants in proportion to stake.
///
/// Each share rounds independently; the residual cent or two left over is
/// assigned to the largest-stake participant (the first one on a tie), so
/// the shares always sum to the total payout exactly.
fn split_payout(
    participants: &[ParticipantStake],
    total_stake: Cents,
    total_payout: Cents,
) -> Vec<ParticipantNet> {
    let mut shares: Vec<Cents> = participants
        .iter()
        .map(|p| {
            (p.stake_cents as f64 / total_stake as f64 * total_payout as f64).round() as Cents
        })
        .collect();

    let residual = total_payout - shares.iter().sum::<Cents>();
    if residual != 0 {
        let largest = participants
            .iter()
            .enumerate()
            .max_by_key(|(i, p)| (p.stake_cents, std::cmp::Reverse(*i)))
            .map(|(i, _)| i)
            .unwrap_or(0);
        shares[largest] += residual;
    }

    participants
        .iter()
        .zip(shares)
        .map(|(p, share)| ParticipantNet {
            person_id: p.person_id,
            net_cents: share - p.stake_cents,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leg(leg_id: i64, odds: i32, result: LegResult) -> LegState {
        LegState {
            leg_id,
            american_odds: odds,
            result,
        }
    }

    fn stake(person_id: i64, cents: Cents) -> ParticipantStake {
        ParticipantStake {
            person_id,
            stake_cents: cents,
        }
    }

    fn update(leg_id: i64, result: LegResult) -> LegUpdate {
        LegUpdate { leg_id, result }
    }

    #[test]
    fn pending_leg_keeps_bet_open() {
        let legs = [leg(1, 150, LegResult::Pending), leg(2, -200, LegResult::Pending)];
        let participants = [stake(1, 10_000)];
        let decision = settle(
            BetStatus::Open,
            &legs,
            &participants,
            &[update(1, LegResult::Won)],
        )
        .unwrap();

        assert_eq!(decision.status, BetStatus::Open);
        assert!(decision.settlements.is_empty());
        assert_eq!(decision.leg_results[0], (1, LegResult::Won));
        assert_eq!(decision.leg_results[1], (2, LegResult::Pending));
    }

    #[test]
    fn lost_leg_forfeits_all_stakes_immediately() {
        // Second leg still pending: a single loss settles the bet anyway.
        let legs = [leg(1, 150, LegResult::Won), leg(2, -200, LegResult::Pending)];
        let participants = [stake(1, 6000), stake(2, 4000)];
        let decision = settle(
            BetStatus::Open,
            &legs,
            &participants,
            &[update(2, LegResult::Lost)],
        )
        .unwrap();

        assert_eq!(decision.status, BetStatus::Lost);
        assert_eq!(
            decision.settlements,
            vec![
                ParticipantNet {
                    person_id: 1,
                    net_cents: -6000
                },
                ParticipantNet {
                    person_id: 2,
                    net_cents: -4000
                },
            ]
        );
    }

    #[test]
    fn all_void_legs_void_the_bet_without_settlements() {
        let legs = [leg(1, 150, LegResult::Void), leg(2, -200, LegResult::Void)];
        let participants = [stake(1, 10_000)];
        let decision = settle(BetStatus::Open, &legs, &participants, &[]).unwrap();

        assert_eq!(decision.status, BetStatus::Void);
        assert!(decision.settlements.is_empty());
        assert_eq!(decision.total_payout_cents, 0);
    }

    #[test]
    fn won_parlay_pays_product_of_won_legs() {
        let legs = [leg(1, 150, LegResult::Pending), leg(2, -200, LegResult::Pending)];
        let participants = [stake(1, 10_000)];
        let decision = settle(
            BetStatus::Open,
            &legs,
            &participants,
            &[update(1, LegResult::Won), update(2, LegResult::Won)],
        )
        .unwrap();

        assert_eq!(decision.status, BetStatus::Won);
        assert_eq!(decision.total_payout_cents, 37_500);
        assert_eq!(
            decision.settlements,
            vec![ParticipantNet {
                person_id: 1,
                net_cents: 27_500
            }]
        );
    }

    #[test]
    fn void_legs_are_excluded_from_combined_odds() {
        // +150 won, -200 void: payout uses 2.5 only.
        let legs = [leg(1, 150, LegResult::Won), leg(2, -200, LegResult::Void)];
        let participants = [stake(1, 10_000)];
        let decision = settle(BetStatus::Open, &legs, &participants, &[]).unwrap();

        assert_eq!(decision.status, BetStatus::Won);
        assert_eq!(decision.total_payout_cents, 25_000);
        assert_eq!(decision.settlements[0].net_cents, 15_000);
    }

    #[test]
    fn proportional_split_reconstitutes_payout() {
        // 6000/4000 at decimal 2.0: A nets +6000, B nets +4000.
        let legs = [leg(1, 100, LegResult::Won)];
        let participants = [stake(1, 6000), stake(2, 4000)];
        let decision = settle(BetStatus::Open, &legs, &participants, &[]).unwrap();

        assert_eq!(decision.total_payout_cents, 20_000);
        assert_eq!(decision.settlements[0].net_cents, 6000);
        assert_eq!(decision.settlements[1].net_cents, 4000);

        let net_sum: Cents = decision.settlements.iter().map(|s| s.net_cents).sum();
        assert_eq!(net_sum, decision.total_payout_cents - 10_000);
    }

    #[test]
    fn rounding_residual_lands_on_largest_stake() {
        // Three 1-cent stakes at decimal 1.5: payout rounds 4.5 up to 5,
        // each third rounds 1.67 up to 2 for a share sum of 6. The extra
        // cent comes back out of the first participant (largest on a
        // three-way tie), so shares still sum to the payout.
        let legs = [leg(1, -200, LegResult::Won)];
        let participants = [stake(1, 1), stake(2, 1), stake(3, 1)];
        let decision = settle(BetStatus::Open, &legs, &participants, &[]).unwrap();

        assert_eq!(decision.total_payout_cents, 5);
        let share_sum: Cents = decision
            .settlements
            .iter()
            .zip(&participants)
            .map(|(s, p)| s.net_cents + p.stake_cents)
            .sum();
        assert_eq!(share_sum, 5);
        assert_eq!(decision.settlements[0].net_cents, 0);
        assert_eq!(decision.settlements[1].net_cents, 1);
        assert_eq!(decision.settlements[2].net_cents, 1);
    }

    #[test]
    fn settling_terminal_bet_is_rejected() {
        let legs = [leg(1, 150, LegResult::Won)];
        let participants = [stake(1, 1000)];
        let err = settle(BetStatus::Won, &legs, &participants, &[]).unwrap_err();
        assert_eq!(
            err,
            DomainError::AlreadySettled {
                status: BetStatus::Won
            }
        );
    }

    #[test]
    fn unknown_leg_update_is_rejected() {
        let legs = [leg(1, 150, LegResult::Pending)];
        let participants = [stake(1, 1000)];
        let err = settle(
            BetStatus::Open,
            &legs,
            &participants,
            &[update(99, LegResult::Won)],
        )
        .unwrap_err();
        assert_eq!(err, DomainError::UnknownLeg { leg_id: 99 });
    }

    #[test]
    fn re_resolving_a_leg_is_rejected() {
        let legs = [leg(1, 150, LegResult::Won), leg(2, -200, LegResult::Pending)];
        let participants = [stake(1, 1000)];
        let err = settle(
            BetStatus::Open,
            &legs,
            &participants,
            &[update(1, LegResult::Lost)],
        )
        .unwrap_err();
        assert_eq!(err, DomainError::LegAlreadyResolved { leg_id: 1 });
    }

    #[test]
    fn pending_update_is_a_noop() {
        let legs = [leg(1, 150, LegResult::Won), leg(2, -200, LegResult::Pending)];
        let participants = [stake(1, 1000)];
        let decision = settle(
            BetStatus::Open,
            &legs,
            &participants,
            &[update(1, LegResult::Pending), update(2, LegResult::Pending)],
        )
        .unwrap();
        assert_eq!(decision.status, BetStatus::Open);
        assert_eq!(decision.leg_results[0], (1, LegResult::Won));
    }

    #[test]
    fn lost_bet_nets_sum_to_negative_total_stake() {
        let legs = [leg(1, 150, LegResult::Lost)];
        let participants = [stake(1, 1250), stake(2, 8750)];
        let decision = settle(BetStatus::Open, &legs, &participants, &[]).unwrap();
        let net_sum: Cents = decision.settlements.iter().map(|s| s.net_cents).sum();
        assert_eq!(net_sum, -10_000);
    }
}
