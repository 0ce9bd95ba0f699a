//! Locale price handling.
//!
//! Prices are written the Chilean way: `$` prefix, `.` for thousands and `,`
//! for decimals (`$1.234,50`).

use crate::error::{CatalogError, CatalogResult};

/// Parses a locale-formatted price such as `"$1.234,50"`.
///
/// Blank input is a price of zero.
///
/// # Errors
///
/// Returns [`CatalogError::MalformedPriceField`] when the cleaned text is not a
/// finite number.
pub fn parse_price(raw: &str) -> CatalogResult<f64> {
    let cleaned: String = raw
        .chars()
        .filter(|c| !matches!(c, '$' | '.') && !c.is_whitespace())
        .map(|c| if c == ',' { '.' } else { c })
        .collect();

    if cleaned.is_empty() {
        return Ok(0.0);
    }

    cleaned
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| CatalogError::MalformedPriceField(raw.to_string()))
}

/// Groups an integer with `.` every three digits: `1234567` -> `"1.234.567"`.
#[must_use]
pub fn format_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}

/// Formats a price for display, rounded to whole pesos: `1234.6` -> `"$1.235"`.
#[must_use]
pub fn format_price(price: f64) -> String {
    format!("${}", format_thousands(price.round() as i64))
}
