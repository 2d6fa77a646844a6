//! Quantity parsing for ingredient input.
//!
//! The authoring form takes a single quantity field such as "200g" or
//! "1.5 l"; this splits it into an amount and an optional unit.

use crate::error::Rejection;
use crate::types::Unit;

/// A parsed quantity: amount text plus optional unit.
#[derive(Debug, Clone, PartialEq)]
pub struct Quantity {
    pub amount: String,
    pub unit: Option<Unit>,
}

/// Parse a quantity like "200g", "2", or "1.5 L".
///
/// The amount must be a plain decimal number (digits with at most one
/// decimal point). Anything after it must be an allowed unit.
pub fn parse_quantity(raw: &str) -> Result<Quantity, Rejection> {
    let s = raw.trim().to_lowercase();
    let (amount, rest) = extract_amount(&s).ok_or(Rejection::InvalidQuantity)?;

    let rest = rest.trim();
    let unit = if rest.is_empty() {
        None
    } else {
        Some(Unit::from_symbol(rest).ok_or_else(|| Rejection::UnknownUnit(rest.to_string()))?)
    };

    Ok(Quantity {
        amount: amount.to_string(),
        unit,
    })
}

/// Split a leading decimal number off the front of a string.
/// Returns (amount, remaining) or `None` if there is no well-formed number.
fn extract_amount(s: &str) -> Option<(&str, &str)> {
    let end = s
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(s.len());
    let amount = &s[..end];

    let mut parts = amount.split('.');
    let whole = parts.next().unwrap_or("");
    let fraction = parts.next();
    if whole.is_empty() || parts.next().is_some() || fraction == Some("") {
        return None;
    }

    Some((amount, &s[end..]))
}

/// Pick the ingredient name from free text or a catalog selection.
///
/// Free text wins when it is non-empty after trimming.
pub fn choose_ingredient_name(custom: &str, selected: &str) -> Result<String, Rejection> {
    let custom = custom.trim();
    let name = if custom.is_empty() {
        selected.trim()
    } else {
        custom
    };

    if name.is_empty() {
        return Err(Rejection::EmptyIngredientName);
    }
    Ok(name.to_string())
}
