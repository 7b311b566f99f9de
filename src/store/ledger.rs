//! SQLite-backed ledger store using Diesel.
//!
//! All writes that touch more than one table run inside a single
//! `immediate_transaction`, which takes SQLite's write lock up front.
//! Settlement in particular re-reads the bet row inside the transaction
//! before applying the decision, so a terminal bet can never be settled
//! twice even by racing processes.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, PooledConnection};
use diesel::sql_types::{BigInt, Text};
use std::path::Path;
use tracing::info;

use super::db::{create_pool, run_migrations, DbPool};
use super::model::{
    BetLegRow, BetParticipantRow, BetRow, NewBetLegRow, NewBetParticipantRow, NewBetRow,
    NewPersonRow, NewSettlementRow, NewTransactionRow, PersonRow, SettlementRow, TransactionRow,
};
use super::schema::{bet_legs, bet_participants, bets, persons, settlements, transactions};
use crate::domain::bet::{
    Bet, BetDraft, BetLeg, BetParticipant, BetStatus, LegResult, Person, Settlement, Transaction,
    TransactionKind,
};
use crate::domain::money::Cents;
use crate::domain::settlement::{
    settle, LegState, LegUpdate, ParticipantStake, SettlementDecision,
};
use crate::error::{Error, Result};

diesel::define_sql_function! {
    fn last_insert_rowid() -> BigInt;
}

type SqlitePooled = PooledConnection<ConnectionManager<SqliteConnection>>;

/// A bet together with its legs, participants, and settlement rows.
#[derive(Debug, Clone)]
pub struct BetDetail {
    pub bet: Bet,
    pub legs: Vec<BetLeg>,
    pub participants: Vec<BetParticipant>,
    pub settlements: Vec<Settlement>,
}

/// Filters for the bet history view. All fields are conjunctive.
#[derive(Debug, Clone, Default)]
pub struct HistoryFilter {
    pub person_id: Option<i64>,
    pub status: Option<BetStatus>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

/// Per-person derived money aggregates for the dashboard.
#[derive(Debug, Clone)]
pub struct OwnershipRecord {
    pub person: Person,
    /// Transactions plus settlements.
    pub ownership_cents: Cents,
    /// Stakes currently at risk in open bets.
    pub exposure_cents: Cents,
    /// Ownership minus exposure.
    pub live_money_cents: Cents,
}

/// SQLite-backed ledger store.
pub struct SqliteLedger {
    pool: DbPool,
}

impl SqliteLedger {
    /// Open (creating if necessary) the database at `path` and run any
    /// pending migrations.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let pool = create_pool(&path.to_string_lossy())?;
        run_migrations(&pool)?;
        Ok(Self { pool })
    }

    /// Wrap an existing pool; migrations are the caller's responsibility.
    pub fn from_pool(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> Result<SqlitePooled> {
        self.pool
            .get()
            .map_err(|e| Error::Connection(e.to_string()))
    }

    // === People ===

    pub fn add_person(&self, name: &str) -> Result<Person> {
        let mut conn = self.conn()?;
        diesel::insert_into(persons::table)
            .values(&NewPersonRow {
                name: name.to_string(),
            })
            .execute(&mut conn)?;
        let id: i64 = diesel::select(last_insert_rowid()).get_result(&mut conn)?;
        info!(person_id = id, name, "added person");
        Ok(Person {
            id,
            name: name.to_string(),
        })
    }

    pub fn rename_person(&self, id: i64, name: &str) -> Result<Person> {
        let mut conn = self.conn()?;
        let updated = diesel::update(persons::table.find(id))
            .set(persons::name.eq(name))
            .execute(&mut conn)?;
        if updated == 0 {
            return Err(Error::PersonNotFound(id.to_string()));
        }
        Ok(Person {
            id,
            name: name.to_string(),
        })
    }

    pub fn list_people(&self) -> Result<Vec<Person>> {
        let mut conn = self.conn()?;
        let rows: Vec<PersonRow> = persons::table.order(persons::id.asc()).load(&mut conn)?;
        Ok(rows.into_iter().map(person_from_row).collect())
    }

    /// Resolve a person by numeric id or (case-insensitive) name.
    pub fn find_person(&self, selector: &str) -> Result<Person> {
        let people = self.list_people()?;
        if let Ok(id) = selector.parse::<i64>() {
            if let Some(person) = people.iter().find(|p| p.id == id) {
                return Ok(person.clone());
            }
        }
        people
            .into_iter()
            .find(|p| p.name.eq_ignore_ascii_case(selector))
            .ok_or_else(|| Error::PersonNotFound(selector.to_string()))
    }

    /// Insert the given people into an empty table. A no-op when anyone
    /// already exists, so repeated `db init` runs are safe.
    pub fn seed_people(&self, names: &[String]) -> Result<usize> {
        let mut conn = self.conn()?;
        let existing: i64 = persons::table.count().get_result(&mut conn)?;
        if existing > 0 {
            info!(existing, "persons table already seeded");
            return Ok(0);
        }
        for name in names {
            diesel::insert_into(persons::table)
                .values(&NewPersonRow { name: name.clone() })
                .execute(&mut conn)?;
        }
        info!(count = names.len(), "seeded persons");
        Ok(names.len())
    }

    // === Transactions ===

    pub fn record_transaction(
        &self,
        person_id: i64,
        kind: TransactionKind,
        amount_cents: Cents,
        note: Option<String>,
    ) -> Result<Transaction> {
        let mut conn = self.conn()?;
        let known: i64 = persons::table
            .filter(persons::id.eq(person_id))
            .count()
            .get_result(&mut conn)?;
        if known == 0 {
            return Err(Error::PersonNotFound(person_id.to_string()));
        }

        let ts = Utc::now();
        diesel::insert_into(transactions::table)
            .values(&NewTransactionRow {
                person_id,
                kind: kind.as_str().to_string(),
                amount_cents,
                note: note.clone(),
                ts: ts.to_rfc3339(),
            })
            .execute(&mut conn)?;
        let id: i64 = diesel::select(last_insert_rowid()).get_result(&mut conn)?;
        info!(transaction_id = id, person_id, %kind, amount_cents, "recorded transaction");
        Ok(Transaction {
            id,
            person_id,
            kind,
            amount_cents,
            note,
            ts,
        })
    }

    /// Transactions, newest first, optionally narrowed to one person.
    pub fn list_transactions(&self, person_id: Option<i64>) -> Result<Vec<Transaction>> {
        let mut conn = self.conn()?;
        let mut query = transactions::table.into_boxed();
        if let Some(person_id) = person_id {
            query = query.filter(transactions::person_id.eq(person_id));
        }
        let rows: Vec<TransactionRow> = query.order(transactions::ts.desc()).load(&mut conn)?;
        rows.into_iter().map(transaction_from_row).collect()
    }

    // === Bets ===

    /// Create a bet with its legs and participants in one transaction.
    /// Returns the new bet id.
    pub fn create_bet(&self, draft: &BetDraft) -> Result<i64> {
        let mut conn = self.conn()?;
        let bet_id = conn.immediate_transaction::<_, Error, _>(|conn| {
            for stake in draft.stakes() {
                let known: i64 = persons::table
                    .filter(persons::id.eq(stake.person_id))
                    .count()
                    .get_result(conn)?;
                if known == 0 {
                    return Err(Error::PersonNotFound(stake.person_id.to_string()));
                }
            }

            diesel::insert_into(bets::table)
                .values(&NewBetRow {
                    total_stake_cents: draft.total_stake_cents(),
                    status: BetStatus::Open.as_str().to_string(),
                    placed_at: Utc::now().to_rfc3339(),
                    settled_at: None,
                })
                .execute(conn)?;
            let bet_id: i64 = diesel::select(last_insert_rowid()).get_result(conn)?;

            for leg in draft.legs() {
                diesel::insert_into(bet_legs::table)
                    .values(&NewBetLegRow {
                        bet_id,
                        matchup: leg.matchup.clone(),
                        bet_description: leg.bet_description.clone(),
                        american_odds: leg.american_odds,
                        result: LegResult::Pending.as_str().to_string(),
                    })
                    .execute(conn)?;
            }
            for stake in draft.stakes() {
                diesel::insert_into(bet_participants::table)
                    .values(&NewBetParticipantRow {
                        bet_id,
                        person_id: stake.person_id,
                        stake_cents: stake.stake_cents,
                    })
                    .execute(conn)?;
            }
            Ok(bet_id)
        })?;
        info!(
            bet_id,
            legs = draft.legs().len(),
            participants = draft.stakes().len(),
            total_stake_cents = draft.total_stake_cents(),
            "created bet"
        );
        Ok(bet_id)
    }

    pub fn bet_detail(&self, bet_id: i64) -> Result<BetDetail> {
        let mut conn = self.conn()?;
        load_bet_detail(&mut conn, bet_id)
    }

    /// Settle a bet from a batch of leg result updates.
    ///
    /// The whole operation is one atomic unit: the bet row is re-read
    /// inside the transaction (a bet already terminal fails with
    /// `AlreadySettled`), the settlement decision is computed, and leg
    /// results, bet status, and settlement rows are written together.
    /// Any error rolls back with storage untouched.
    pub fn settle_bet(&self, bet_id: i64, updates: &[LegUpdate]) -> Result<SettlementDecision> {
        let mut conn = self.conn()?;
        let decision = conn.immediate_transaction::<_, Error, _>(|conn| {
            let bet_row: BetRow = bets::table
                .find(bet_id)
                .first(conn)
                .optional()?
                .ok_or(Error::BetNotFound(bet_id))?;
            let bet = bet_from_row(bet_row)?;

            let leg_rows: Vec<BetLegRow> = bet_legs::table
                .filter(bet_legs::bet_id.eq(bet_id))
                .order(bet_legs::id.asc())
                .load(conn)?;
            let participant_rows: Vec<BetParticipantRow> = bet_participants::table
                .filter(bet_participants::bet_id.eq(bet_id))
                .order(bet_participants::id.asc())
                .load(conn)?;

            let mut leg_states = Vec::with_capacity(leg_rows.len());
            for row in &leg_rows {
                leg_states.push(LegState {
                    leg_id: row.id,
                    american_odds: row.american_odds,
                    result: parse_token(&row.result)?,
                });
            }
            let stakes: Vec<ParticipantStake> = participant_rows
                .iter()
                .map(|row| ParticipantStake {
                    person_id: row.person_id,
                    stake_cents: row.stake_cents,
                })
                .collect();

            let decision = settle(bet.status, &leg_states, &stakes, updates)?;

            for (leg_id, result) in &decision.leg_results {
                diesel::update(bet_legs::table.find(*leg_id))
                    .set(bet_legs::result.eq(result.as_str()))
                    .execute(conn)?;
            }

            let now = Utc::now().to_rfc3339();
            if decision.status.is_terminal() {
                diesel::update(bets::table.find(bet_id))
                    .set((
                        bets::status.eq(decision.status.as_str()),
                        bets::settled_at.eq(Some(now.clone())),
                    ))
                    .execute(conn)?;
            }
            for net in &decision.settlements {
                diesel::insert_into(settlements::table)
                    .values(&NewSettlementRow {
                        bet_id,
                        person_id: net.person_id,
                        net_cents: net.net_cents,
                        ts: now.clone(),
                    })
                    .execute(conn)?;
            }

            Ok(decision)
        })?;
        info!(bet_id, status = %decision.status, settlements = decision.settlements.len(), "settled bet");
        Ok(decision)
    }

    /// Open bets, newest first, with legs and participants attached.
    pub fn open_bets(&self) -> Result<Vec<BetDetail>> {
        let mut conn = self.conn()?;
        let rows: Vec<BetRow> = bets::table
            .filter(bets::status.eq(BetStatus::Open.as_str()))
            .order(bets::placed_at.desc())
            .load(&mut conn)?;
        rows.into_iter()
            .map(|row| attach_detail(&mut conn, row))
            .collect()
    }

    /// Bet history, newest first, narrowed by the given filter.
    pub fn history(&self, filter: &HistoryFilter) -> Result<Vec<BetDetail>> {
        let mut conn = self.conn()?;

        let mut query = bets::table.into_boxed();
        if let Some(status) = filter.status {
            query = query.filter(bets::status.eq(status.as_str().to_string()));
        }
        // RFC 3339 UTC timestamps compare correctly as text.
        if let Some(from) = filter.from {
            query = query.filter(bets::placed_at.ge(from.to_rfc3339()));
        }
        if let Some(to) = filter.to {
            query = query.filter(bets::placed_at.le(to.to_rfc3339()));
        }
        if let Some(person_id) = filter.person_id {
            let bet_ids: Vec<i64> = bet_participants::table
                .filter(bet_participants::person_id.eq(person_id))
                .select(bet_participants::bet_id)
                .load(&mut conn)?;
            query = query.filter(bets::id.eq_any(bet_ids));
        }

        let rows: Vec<BetRow> = query.order(bets::placed_at.desc()).load(&mut conn)?;
        rows.into_iter()
            .map(|row| attach_detail(&mut conn, row))
            .collect()
    }

    // === Aggregates ===

    /// Ownership, exposure, and live money per person, derived from
    /// transactions, settlements, and open-bet stakes.
    pub fn ownership_summary(&self) -> Result<Vec<OwnershipRecord>> {
        let mut conn = self.conn()?;
        let people: Vec<PersonRow> = persons::table.order(persons::id.asc()).load(&mut conn)?;

        people
            .into_iter()
            .map(|row| {
                let person = person_from_row(row);

                let transaction_total: Option<i64> = transactions::table
                    .filter(transactions::person_id.eq(person.id))
                    .select(diesel::dsl::sql::<diesel::sql_types::Nullable<BigInt>>(
                        "SUM(amount_cents)",
                    ))
                    .first(&mut conn)?;
                let settlement_total: Option<i64> = settlements::table
                    .filter(settlements::person_id.eq(person.id))
                    .select(diesel::dsl::sql::<diesel::sql_types::Nullable<BigInt>>(
                        "SUM(net_cents)",
                    ))
                    .first(&mut conn)?;
                let exposure_total: Option<i64> = bet_participants::table
                    .inner_join(bets::table)
                    .filter(bet_participants::person_id.eq(person.id))
                    .filter(bets::status.eq(BetStatus::Open.as_str()))
                    .select(diesel::dsl::sql::<diesel::sql_types::Nullable<BigInt>>(
                        "SUM(bet_participants.stake_cents)",
                    ))
                    .first(&mut conn)?;

                let ownership = transaction_total.unwrap_or(0) + settlement_total.unwrap_or(0);
                let exposure = exposure_total.unwrap_or(0);
                Ok(OwnershipRecord {
                    person,
                    ownership_cents: ownership,
                    exposure_cents: exposure,
                    live_money_cents: ownership - exposure,
                })
            })
            .collect()
    }

    // === Maintenance ===

    /// Best-effort normalization of legacy lowercase enum tokens to their
    /// canonical names. Safe to run repeatedly; returns the number of
    /// rewritten rows.
    pub fn normalize_legacy_enums(&self) -> Result<usize> {
        let mut conn = self.conn()?;
        let mut total = 0;

        let status_map = [
            ("open", "OPEN"),
            ("won", "WON"),
            ("lost", "LOST"),
            ("void", "VOID"),
            ("cashed_out", "CASHED_OUT"),
        ];
        for (old, new) in status_map {
            total += diesel::sql_query("UPDATE bets SET status = ? WHERE status = ?")
                .bind::<Text, _>(new)
                .bind::<Text, _>(old)
                .execute(&mut conn)?;
        }

        let result_map = [
            ("pending", "PENDING"),
            ("won", "WON"),
            ("lost", "LOST"),
            ("void", "VOID"),
        ];
        for (old, new) in result_map {
            total += diesel::sql_query("UPDATE bet_legs SET result = ? WHERE result = ?")
                .bind::<Text, _>(new)
                .bind::<Text, _>(old)
                .execute(&mut conn)?;
        }

        let kind_map = [
            ("deposit", "DEPOSIT"),
            ("withdraw", "WITHDRAW"),
            ("adjustment", "ADJUSTMENT"),
        ];
        for (old, new) in kind_map {
            total += diesel::sql_query("UPDATE transactions SET kind = ? WHERE kind = ?")
                .bind::<Text, _>(new)
                .bind::<Text, _>(old)
                .execute(&mut conn)?;
        }

        info!(rewritten = total, "normalized legacy enum tokens");
        Ok(total)
    }
}

fn attach_detail(conn: &mut SqliteConnection, row: BetRow) -> Result<BetDetail> {
    let bet_id = row.id;
    let bet = bet_from_row(row)?;

    let leg_rows: Vec<BetLegRow> = bet_legs::table
        .filter(bet_legs::bet_id.eq(bet_id))
        .order(bet_legs::id.asc())
        .load(conn)?;
    let participant_rows: Vec<BetParticipantRow> = bet_participants::table
        .filter(bet_participants::bet_id.eq(bet_id))
        .order(bet_participants::id.asc())
        .load(conn)?;
    let settlement_rows: Vec<SettlementRow> = settlements::table
        .filter(settlements::bet_id.eq(bet_id))
        .order(settlements::id.asc())
        .load(conn)?;

    Ok(BetDetail {
        bet,
        legs: leg_rows
            .into_iter()
            .map(leg_from_row)
            .collect::<Result<_>>()?,
        participants: participant_rows
            .into_iter()
            .map(participant_from_row)
            .collect(),
        settlements: settlement_rows
            .into_iter()
            .map(settlement_from_row)
            .collect::<Result<_>>()?,
    })
}

fn load_bet_detail(conn: &mut SqliteConnection, bet_id: i64) -> Result<BetDetail> {
    let row: BetRow = bets::table
        .find(bet_id)
        .first(conn)
        .optional()?
        .ok_or(Error::BetNotFound(bet_id))?;
    attach_detail(conn, row)
}

// === Row conversions ===

fn person_from_row(row: PersonRow) -> Person {
    Person {
        id: row.id,
        name: row.name,
    }
}

fn bet_from_row(row: BetRow) -> Result<Bet> {
    Ok(Bet {
        id: row.id,
        total_stake_cents: row.total_stake_cents,
        status: parse_token(&row.status)?,
        placed_at: parse_ts(&row.placed_at)?,
        settled_at: row.settled_at.as_deref().map(parse_ts).transpose()?,
    })
}

fn leg_from_row(row: BetLegRow) -> Result<BetLeg> {
    Ok(BetLeg {
        id: row.id,
        bet_id: row.bet_id,
        matchup: row.matchup,
        bet_description: row.bet_description,
        american_odds: row.american_odds,
        result: parse_token(&row.result)?,
    })
}

fn participant_from_row(row: BetParticipantRow) -> BetParticipant {
    BetParticipant {
        id: row.id,
        bet_id: row.bet_id,
        person_id: row.person_id,
        stake_cents: row.stake_cents,
    }
}

fn settlement_from_row(row: SettlementRow) -> Result<Settlement> {
    Ok(Settlement {
        id: row.id,
        bet_id: row.bet_id,
        person_id: row.person_id,
        net_cents: row.net_cents,
        ts: parse_ts(&row.ts)?,
    })
}

fn transaction_from_row(row: TransactionRow) -> Result<Transaction> {
    Ok(Transaction {
        id: row.id,
        person_id: row.person_id,
        kind: parse_token(&row.kind)?,
        amount_cents: row.amount_cents,
        note: row.note,
        ts: parse_ts(&row.ts)?,
    })
}

fn parse_token<T: std::str::FromStr<Err = String>>(token: &str) -> Result<T> {
    token.parse().map_err(Error::Parse)
}

fn parse_ts(text: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(text)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| Error::Parse(e.to_string()))
}
