//! Storage-agnostic ledger domain: entities, odds math, and the
//! settlement engine.

pub mod bet;
pub mod error;
pub mod money;
pub mod odds;
pub mod settlement;

pub use bet::{Bet, BetDraft, BetLeg, BetParticipant, BetStatus, LegDraft, LegResult, Person,
    Settlement, StakeDraft, Transaction, TransactionKind};
pub use error::DomainError;
pub use money::Cents;
