//! Hours and currency formatting
//!
//! Two-decimal fixed-point display forms with matching parsers. Locale
//! decoration (symbols, separators) belongs to the presentation layer;
//! these helpers guarantee the numeric round-trip.

use thiserror::Error;

/// Error type for amount parsing
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AmountParseError {
    #[error("Empty amount string")]
    EmptyString,

    #[error("Invalid amount: {0}")]
    InvalidNumber(String),

    #[error("Amount is not finite: {0}")]
    NotFinite(String),
}

/// Round to two decimal places
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Format decimal hours with two decimal places, e.g. `10.50`
pub fn format_hours(hours: f64) -> String {
    format!("{:.2}", round2(hours))
}

/// Format a monetary amount with two decimal places, e.g. `1234.56`
pub fn format_currency(amount: f64) -> String {
    format!("{:.2}", round2(amount))
}

/// Parse an amount produced by [`format_hours`] or [`format_currency`].
///
/// Accepts plain decimal notation with an optional leading sign.
pub fn parse_amount(s: &str) -> Result<f64, AmountParseError> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err(AmountParseError::EmptyString);
    }

    let value: f64 =
        trimmed.parse().map_err(|_| AmountParseError::InvalidNumber(trimmed.to_string()))?;
    if !value.is_finite() {
        return Err(AmountParseError::NotFinite(trimmed.to_string()));
    }

    Ok(value)
}
