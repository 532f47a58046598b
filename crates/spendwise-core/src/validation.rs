//! Input checks applied before amounts reach the engine.

use std::str::FromStr;

use rust_decimal::Decimal;

use crate::CoreError;

/// Largest amount, in whole currency units, accepted for a budget or expense.
pub const MAX_AMOUNT_UNITS: i64 = 1_000_000_000_000;

/// Parses user-supplied text into a strictly positive, bounded amount.
///
/// Accepts an optional leading `$` and surrounding whitespace. The original
/// text is preserved in the error.
pub fn parse_amount(raw: &str) -> Result<Decimal, CoreError> {
    let trimmed = raw.trim();
    let digits = trimmed.strip_prefix('$').unwrap_or(trimmed).trim();
    let amount = Decimal::from_str(digits)
        .or_else(|_| Decimal::from_scientific(digits))
        .map_err(|_| CoreError::invalid_input(raw, "not a number"))?;
    ensure_valid_amount(amount, raw)
}

/// Rejects zero, negative and oversized amounts, reporting `input` as the
/// offending text.
pub fn ensure_valid_amount(amount: Decimal, input: &str) -> Result<Decimal, CoreError> {
    if amount <= Decimal::ZERO {
        return Err(CoreError::invalid_input(input, "amount must be positive"));
    }
    if amount > Decimal::from(MAX_AMOUNT_UNITS) {
        return Err(CoreError::invalid_input(
            input,
            format!("amount exceeds the maximum of {MAX_AMOUNT_UNITS}"),
        ));
    }
    Ok(amount)
}
