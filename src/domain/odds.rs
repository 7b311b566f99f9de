//! American/decimal odds conversion and parlay payout arithmetic.
//!
//! All functions here are pure. American odds are nonzero integers;
//! decimal odds are `f64 > 1.0`. Monetary amounts stay in integer cents,
//! rounded once at the payout boundary.

use super::error::DomainError;
use super::money::Cents;

/// Convert American odds to decimal odds.
///
/// `+150` becomes `2.5`, `-200` becomes `1.5`. Zero is undefined in the
/// American convention and is rejected rather than dividing through.
pub fn american_to_decimal(american: i32) -> Result<f64, DomainError> {
    if american == 0 {
        return Err(DomainError::InvalidAmericanOdds);
    }
    if american > 0 {
        Ok(1.0 + f64::from(american) / 100.0)
    } else {
        Ok(1.0 + 100.0 / f64::from(american.abs()))
    }
}

/// Convert decimal odds back to American odds.
///
/// Truncates toward zero (not rounds), so `2.499` is `+149` and `1.999`
/// is `-101`. Decimal odds at or below `1.0` (and NaN) are rejected.
pub fn decimal_to_american(decimal: f64) -> Result<i32, DomainError> {
    if !(decimal > 1.0) {
        return Err(DomainError::InvalidDecimalOdds { odds: decimal });
    }
    if decimal >= 2.0 {
        Ok(((decimal - 1.0) * 100.0) as i32)
    } else {
        Ok((-100.0 / (decimal - 1.0)) as i32)
    }
}

/// Combined decimal odds for a parlay: the product over each leg's
/// American odds. Result filtering (skipping VOID legs) is the settlement
/// engine's concern, not this function's.
pub fn combined_decimal_odds<I>(american_odds: I) -> Result<f64, DomainError>
where
    I: IntoIterator<Item = i32>,
{
    let mut combined = 1.0;
    for odds in american_odds {
        combined *= american_to_decimal(odds)?;
    }
    Ok(combined)
}

/// Total payout in cents for a stake at the given combined decimal odds.
///
/// Rounds half away from zero to the nearest cent (`f64::round`), matching
/// the rule documented in the settlement invariants.
pub fn parlay_payout(stake_cents: Cents, combined_decimal: f64) -> Cents {
    (stake_cents as f64 * combined_decimal).round() as Cents
}
