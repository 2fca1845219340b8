//! Helpers for storing exact decimal amounts in SQLite.
//!
//! Monetary values are kept as [rust_decimal::Decimal] in memory and stored
//! as TEXT so that balance and budget comparisons never suffer floating-point
//! drift. Sums over amounts are computed in application code after reading
//! the rows back.

use rusqlite::{Row, types::Type};
use rust_decimal::Decimal;

/// Convert an amount into the TEXT form stored in the database.
///
/// Amounts are rounded to two decimal places before storage.
pub fn amount_to_sql(amount: Decimal) -> String {
    amount.round_dp(2).normalize().to_string()
}

/// Read a decimal amount from a TEXT column.
///
/// # Errors
/// Returns a [rusqlite::Error::FromSqlConversionFailure] if the column does
/// not contain a valid decimal number.
pub fn decimal_column(row: &Row, index: usize) -> Result<Decimal, rusqlite::Error> {
    let text: String = row.get(index)?;

    text.parse::<Decimal>().map_err(|error| {
        rusqlite::Error::FromSqlConversionFailure(index, Type::Text, Box::new(error))
    })
}

/// Read an optional decimal amount from a TEXT column.
///
/// # Errors
/// Returns a [rusqlite::Error::FromSqlConversionFailure] if the column is
/// non-null and does not contain a valid decimal number.
pub fn optional_decimal_column(
    row: &Row,
    index: usize,
) -> Result<Option<Decimal>, rusqlite::Error> {
    let text: Option<String> = row.get(index)?;

    text.map(|some_text| {
        some_text.parse::<Decimal>().map_err(|error| {
            rusqlite::Error::FromSqlConversionFailure(index, Type::Text, Box::new(error))
        })
    })
    .transpose()
}
