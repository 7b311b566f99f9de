//! Ledger entities and their closed enums.
//!
//! Statuses, leg results, and transaction kinds are tagged variants with a
//! single canonical storage token each. Storage never round-trips free-form
//! strings through these types; unknown tokens fail to parse.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::DomainError;
use super::money::Cents;

/// Kind of real-money movement into or out of the pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionKind {
    Deposit,
    Withdraw,
    Adjustment,
}

impl TransactionKind {
    /// Canonical storage token.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Deposit => "DEPOSIT",
            Self::Withdraw => "WITHDRAW",
            Self::Adjustment => "ADJUSTMENT",
        }
    }
}

impl FromStr for TransactionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "DEPOSIT" => Ok(Self::Deposit),
            "WITHDRAW" => Ok(Self::Withdraw),
            "ADJUSTMENT" => Ok(Self::Adjustment),
            other => Err(format!("unknown transaction kind '{other}'")),
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle status of a bet. `Open` is the only non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BetStatus {
    Open,
    Won,
    Lost,
    Void,
    CashedOut,
}

impl BetStatus {
    /// Canonical storage token.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Open => "OPEN",
            Self::Won => "WON",
            Self::Lost => "LOST",
            Self::Void => "VOID",
            Self::CashedOut => "CASHED_OUT",
        }
    }

    /// Whether the status is terminal; terminal bets must never be
    /// settled again.
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Open)
    }
}

impl FromStr for BetStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "OPEN" => Ok(Self::Open),
            "WON" => Ok(Self::Won),
            "LOST" => Ok(Self::Lost),
            "VOID" => Ok(Self::Void),
            "CASHED_OUT" => Ok(Self::CashedOut),
            other => Err(format!("unknown bet status '{other}'")),
        }
    }
}

impl fmt::Display for BetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one leg of a bet. Transitions once from `Pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LegResult {
    Pending,
    Won,
    Lost,
    Void,
}

impl LegResult {
    /// Canonical storage token.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Won => "WON",
            Self::Lost => "LOST",
            Self::Void => "VOID",
        }
    }
}

impl FromStr for LegResult {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "PENDING" => Ok(Self::Pending),
            "WON" => Ok(Self::Won),
            "LOST" => Ok(Self::Lost),
            "VOID" => Ok(Self::Void),
            other => Err(format!("unknown leg result '{other}'")),
        }
    }
}

impl fmt::Display for LegResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A member of the pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub id: i64,
    pub name: String,
}

/// Immutable record of real money moved by a person.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub person_id: i64,
    pub kind: TransactionKind,
    pub amount_cents: Cents,
    pub note: Option<String>,
    pub ts: DateTime<Utc>,
}

/// A bet, possibly a multi-leg parlay, staked by one or more participants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bet {
    pub id: i64,
    pub total_stake_cents: Cents,
    pub status: BetStatus,
    pub placed_at: DateTime<Utc>,
    pub settled_at: Option<DateTime<Utc>>,
}

/// One proposition within a bet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BetLeg {
    pub id: i64,
    pub bet_id: i64,
    pub matchup: String,
    pub bet_description: String,
    pub american_odds: i32,
    pub result: LegResult,
}

/// One person's share of a bet's total stake.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BetParticipant {
    pub id: i64,
    pub bet_id: i64,
    pub person_id: i64,
    pub stake_cents: Cents,
}

/// Append-only record of money won or lost on a settled bet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settlement {
    pub id: i64,
    pub bet_id: i64,
    pub person_id: i64,
    pub net_cents: Cents,
    pub ts: DateTime<Utc>,
}

/// Leg fields supplied at bet creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegDraft {
    pub matchup: String,
    pub bet_description: String,
    pub american_odds: i32,
}

/// Participant stake supplied at bet creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StakeDraft {
    pub person_id: i64,
    pub stake_cents: Cents,
}

/// Validated bet-creation payload.
///
/// Construction is the single validation point for new bets: at least one
/// leg, at least one participant, all stakes positive, all odds nonzero.
#[derive(Debug, Clone)]
pub struct BetDraft {
    legs: Vec<LegDraft>,
    stakes: Vec<StakeDraft>,
}

impl BetDraft {
    pub fn try_new(legs: Vec<LegDraft>, stakes: Vec<StakeDraft>) -> Result<Self, DomainError> {
        if legs.is_empty() {
            return Err(DomainError::EmptyLegs);
        }
        if stakes.is_empty() {
            return Err(DomainError::EmptyParticipants);
        }
        for leg in &legs {
            if leg.american_odds == 0 {
                return Err(DomainError::InvalidAmericanOdds);
            }
        }
        for stake in &stakes {
            if stake.stake_cents <= 0 {
                return Err(DomainError::NonPositiveStake {
                    stake_cents: stake.stake_cents,
                });
            }
        }
        Ok(Self { legs, stakes })
    }

    pub fn legs(&self) -> &[LegDraft] {
        &self.legs
    }

    pub fn stakes(&self) -> &[StakeDraft] {
        &self.stakes
    }

    /// Sum of participant stakes; the bet's `total_stake_cents` is always
    /// derived from this, never stored independently.
    pub fn total_stake_cents(&self) -> Cents {
        self.stakes.iter().map(|s| s.stake_cents).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leg(odds: i32) -> LegDraft {
        LegDraft {
            matchup: "Lakers vs Celtics".to_string(),
            bet_description: "Lakers -2.5".to_string(),
            american_odds: odds,
        }
    }

    #[test]
    fn enums_roundtrip_canonical_tokens() {
        for status in [
            BetStatus::Open,
            BetStatus::Won,
            BetStatus::Lost,
            BetStatus::Void,
            BetStatus::CashedOut,
        ] {
            assert_eq!(status.as_str().parse::<BetStatus>().unwrap(), status);
        }
        for result in [
            LegResult::Pending,
            LegResult::Won,
            LegResult::Lost,
            LegResult::Void,
        ] {
            assert_eq!(result.as_str().parse::<LegResult>().unwrap(), result);
        }
        for kind in [
            TransactionKind::Deposit,
            TransactionKind::Withdraw,
            TransactionKind::Adjustment,
        ] {
            assert_eq!(kind.as_str().parse::<TransactionKind>().unwrap(), kind);
        }
    }

    #[test]
    fn enum_parse_is_case_insensitive_for_cli_input() {
        assert_eq!("won".parse::<LegResult>().unwrap(), LegResult::Won);
        assert_eq!("deposit".parse::<TransactionKind>().unwrap(), TransactionKind::Deposit);
        assert_eq!("cashed_out".parse::<BetStatus>().unwrap(), BetStatus::CashedOut);
    }

    #[test]
    fn enum_parse_rejects_unknown_tokens() {
        assert!("push".parse::<LegResult>().is_err());
        assert!("".parse::<BetStatus>().is_err());
    }

    #[test]
    fn terminal_statuses() {
        assert!(!BetStatus::Open.is_terminal());
        assert!(BetStatus::Won.is_terminal());
        assert!(BetStatus::Lost.is_terminal());
        assert!(BetStatus::Void.is_terminal());
        assert!(BetStatus::CashedOut.is_terminal());
    }

    #[test]
    fn draft_requires_legs_and_participants() {
        let stake = StakeDraft {
            person_id: 1,
            stake_cents: 1000,
        };
        assert_eq!(
            BetDraft::try_new(vec![], vec![stake]).unwrap_err(),
            DomainError::EmptyLegs
        );
        assert_eq!(
            BetDraft::try_new(vec![leg(150)], vec![]).unwrap_err(),
            DomainError::EmptyParticipants
        );
    }

    #[test]
    fn draft_rejects_non_positive_stakes() {
        let zero = StakeDraft {
            person_id: 1,
            stake_cents: 0,
        };
        assert_eq!(
            BetDraft::try_new(vec![leg(150)], vec![zero]).unwrap_err(),
            DomainError::NonPositiveStake { stake_cents: 0 }
        );
    }

    #[test]
    fn draft_rejects_zero_odds_leg() {
        let stake = StakeDraft {
            person_id: 1,
            stake_cents: 1000,
        };
        assert_eq!(
            BetDraft::try_new(vec![leg(0)], vec![stake]).unwrap_err(),
            DomainError::InvalidAmericanOdds
        );
    }

    #[test]
    fn draft_totals_participant_stakes() {
        let draft = BetDraft::try_new(
            vec![leg(150)],
            vec![
                StakeDraft {
                    person_id: 1,
                    stake_cents: 6000,
                },
                StakeDraft {
                    person_id: 2,
                    stake_cents: 4000,
                },
            ],
        )
        .unwrap();
        assert_eq!(draft.total_stake_cents(), 10_000);
    }
}
