//! Domain validation errors for core ledger types.
//!
//! These errors are returned by `try_new` constructors and by the
//! settlement engine when a business rule is violated. They never touch
//! storage; callers decide whether to surface or roll back.

use thiserror::Error;

use super::bet::BetStatus;

/// Errors that occur when domain invariants are violated.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    /// American odds of zero are undefined in the notation.
    #[error("american odds must be nonzero")]
    InvalidAmericanOdds,

    /// Decimal odds at or below 1.0 have no American representation.
    #[error("decimal odds must be greater than 1.0, got {odds}")]
    InvalidDecimalOdds {
        /// The invalid decimal odds that were provided.
        odds: f64,
    },

    /// Bets must carry at least one leg.
    #[error("a bet requires at least one leg")]
    EmptyLegs,

    /// Bets must carry at least one participant.
    #[error("a bet requires at least one participant")]
    EmptyParticipants,

    /// Participant stakes must be positive cents.
    #[error("stake must be positive, got {stake_cents} cents")]
    NonPositiveStake {
        /// The invalid stake that was provided.
        stake_cents: i64,
    },

    /// A result update referenced a leg the bet does not have.
    #[error("leg {leg_id} does not belong to this bet")]
    UnknownLeg {
        /// The unknown leg id.
        leg_id: i64,
    },

    /// A result update targeted a leg that already left `Pending`.
    #[error("leg {leg_id} already has a final result")]
    LegAlreadyResolved {
        /// The resolved leg id.
        leg_id: i64,
    },

    /// Settlement of a bet that already reached a terminal status.
    #[error("bet is already settled with status {status}")]
    AlreadySettled {
        /// The terminal status the bet currently holds.
        status: BetStatus,
    },

    /// Operator input could not be read as a dollar amount.
    #[error("invalid dollar amount '{input}'")]
    InvalidAmount {
        /// The rejected input.
        input: String,
    },
}
