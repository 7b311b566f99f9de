//! Database model types for Diesel ORM.
//!
//! Row structs carry storage representations only: enums as canonical
//! uppercase TEXT tokens, timestamps as RFC 3339 TEXT. Conversion to and
//! from domain types happens in `store::ledger`.

use diesel::prelude::*;

use super::schema::{bet_legs, bet_participants, bets, persons, settlements, transactions};

/// Database row for a person.
#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = persons)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct PersonRow {
    pub id: i64,
    pub name: String,
}

/// Database row for a person (insertable).
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = persons)]
pub struct NewPersonRow {
    pub name: String,
}

/// Database row for a transaction.
#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = transactions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct TransactionRow {
    pub id: i64,
    pub person_id: i64,
    pub kind: String,
    pub amount_cents: i64,
    pub note: Option<String>,
    pub ts: String,
}

/// Database row for a transaction (insertable).
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = transactions)]
pub struct NewTransactionRow {
    pub person_id: i64,
    pub kind: String,
    pub amount_cents: i64,
    pub note: Option<String>,
    pub ts: String,
}

/// Database row for a bet.
#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = bets)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct BetRow {
    pub id: i64,
    pub total_stake_cents: i64,
    pub status: String,
    pub placed_at: String,
    pub settled_at: Option<String>,
}

/// Database row for a bet (insertable).
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = bets)]
pub struct NewBetRow {
    pub total_stake_cents: i64,
    pub status: String,
    pub placed_at: String,
    pub settled_at: Option<String>,
}

/// Database row for a bet leg.
#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = bet_legs)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct BetLegRow {
    pub id: i64,
    pub bet_id: i64,
    pub matchup: String,
    pub bet_description: String,
    pub american_odds: i32,
    pub result: String,
}

/// Database row for a bet leg (insertable).
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = bet_legs)]
pub struct NewBetLegRow {
    pub bet_id: i64,
    pub matchup: String,
    pub bet_description: String,
    pub american_odds: i32,
    pub result: String,
}

/// Database row for a bet participant.
#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = bet_participants)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct BetParticipantRow {
    pub id: i64,
    pub bet_id: i64,
    pub person_id: i64,
    pub stake_cents: i64,
}

/// Database row for a bet participant (insertable).
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = bet_participants)]
pub struct NewBetParticipantRow {
    pub bet_id: i64,
    pub person_id: i64,
    pub stake_cents: i64,
}

/// Database row for a settlement.
#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = settlements)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct SettlementRow {
    pub id: i64,
    pub bet_id: i64,
    pub person_id: i64,
    pub net_cents: i64,
    pub ts: String,
}

/// Database row for a settlement (insertable).
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = settlements)]
pub struct NewSettlementRow {
    pub bet_id: i64,
    pub person_id: i64,
    pub net_cents: i64,
    pub ts: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_bet_row_is_insertable() {
        // Type check - if this compiles, the Insertable derive works
        let _row = NewBetRow {
            total_stake_cents: 10_000,
            status: "OPEN".to_string(),
            placed_at: "2026-08-29T00:00:00+00:00".to_string(),
            settled_at: None,
        };
    }

    #[test]
    fn new_settlement_row_is_insertable() {
        let _row = NewSettlementRow {
            bet_id: 1,
            person_id: 1,
            net_cents: -2500,
            ts: "2026-08-29T00:00:00+00:00".to_string(),
        };
    }
}
