//! Monetary representation: integer cents everywhere, dollars only at the edge.

use super::error::DomainError;

/// Monetary amount in integer cents. Signed: settlements can be negative.
pub type Cents = i64;

/// Format cents as a dollar string, e.g. `$12.50` or `-$0.75`.
pub fn format_dollars(cents: Cents) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    format!("{sign}${}.{:02}", abs / 100, abs % 100)
}

/// Parse operator input like `100`, `12.50`, or `-3.7` into cents.
///
/// At most two fractional digits are accepted; anything else is rejected
/// so a typo cannot silently move sub-cent money.
pub fn parse_dollars(input: &str) -> Result<Cents, DomainError> {
    let trimmed = input.trim();
    let invalid = || DomainError::InvalidAmount {
        input: input.to_string(),
    };

    let (negative, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed),
    };
    if digits.is_empty() {
        return Err(invalid());
    }

    let (whole, frac) = match digits.split_once('.') {
        Some((w, f)) => (w, f),
        None => (digits, ""),
    };
    if whole.is_empty() && frac.is_empty() {
        return Err(invalid());
    }
    if frac.len() > 2 || !whole.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }
    if !frac.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }

    let whole_cents: Cents = if whole.is_empty() {
        0
    } else {
        whole
            .parse::<Cents>()
            .ok()
            .and_then(|w| w.checked_mul(100))
            .ok_or_else(invalid)?
    };
    let frac_cents: Cents = match frac.len() {
        0 => 0,
        1 => frac.parse::<Cents>().map_err(|_| invalid())? * 10,
        _ => frac.parse::<Cents>().map_err(|_| invalid())?,
    };

    let total = whole_cents.checked_add(frac_cents).ok_or_else(invalid)?;
    Ok(if negative { -total } else { total })
}
