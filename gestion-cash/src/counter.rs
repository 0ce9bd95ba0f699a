//! Drawer count: per-denomination lines, subtotals and totals.
//!
//! Bills are entered by quantity. The 100, 50 and 10 coins may be entered by
//! quantity or by total weight in kilograms, from which the quantity is
//! rounded to the nearest coin. The 500 coin is entered by quantity only.

use crate::denomination::Denomination;
use crate::error::{CashError, CashResult};
use serde::Serialize;
use std::cmp::Reverse;
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::str::FromStr;
use tracing::debug;

/// Largest quantity accepted for one denomination.
///
/// Keeps every subtotal and total well inside `u64` (and `i64` for display).
pub const MAX_QUANTITY: u64 = 10_000_000;

fn checked_quantity(quantity: u64) -> CashResult<u64> {
    if quantity > MAX_QUANTITY {
        return Err(CashError::InvalidAmount(format!(
            "{quantity} exceeds the maximum of {MAX_QUANTITY} per denomination"
        )));
    }
    Ok(quantity)
}

fn value_of(denomination: u32, quantity: u64) -> CashResult<u64> {
    let quantity = checked_quantity(quantity)?;
    u64::from(denomination)
        .checked_mul(quantity)
        .ok_or_else(|| CashError::InvalidAmount(format!("{quantity} x {denomination}")))
}

/// Value of `quantity` bills.
///
/// # Errors
///
/// [`CashError::InvalidAmount`] above [`MAX_QUANTITY`].
pub fn bill_subtotal(denomination: u32, quantity: u64) -> CashResult<u64> {
    value_of(denomination, quantity)
}

/// Coin quantity and value from a total weight in kilograms.
///
/// # Errors
///
/// Fails for unknown or non-weighable denominations, for negative or
/// non-finite weights and for weights above [`MAX_QUANTITY`] coins.
pub fn coin_from_weight(denomination: u32, weight_kg: f64) -> CashResult<(u64, u64)> {
    let unit_kg = Denomination::of(denomination)?
        .unit_kg()
        .ok_or(CashError::NotWeighable(denomination))?;
    if !weight_kg.is_finite() || weight_kg < 0.0 {
        return Err(CashError::InvalidAmount(weight_kg.to_string()));
    }
    let coins = (weight_kg / unit_kg).round();
    if coins > MAX_QUANTITY as f64 {
        return Err(CashError::InvalidAmount(format!(
            "{weight_kg} kg is more than {MAX_QUANTITY} coins"
        )));
    }
    let quantity = coins as u64;
    Ok((quantity, value_of(denomination, quantity)?))
}

/// Expected weight in kilograms and value of `quantity` coins.
///
/// Coins without a known unit weight report a weight of zero.
///
/// # Errors
///
/// [`CashError::UnknownDenomination`] for values the drawer does not hold,
/// [`CashError::InvalidAmount`] above [`MAX_QUANTITY`].
pub fn coin_from_quantity(denomination: u32, quantity: u64) -> CashResult<(f64, u64)> {
    let value = value_of(denomination, quantity)?;
    let weight = Denomination::of(denomination)?
        .unit_kg()
        .map_or(0.0, |unit| unit * quantity as f64);
    Ok((weight, value))
}

/// How an entry was measured.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Amount {
    Quantity(u64),
    WeightKg(f64),
}

/// One `denom=amount` entry, e.g. `20000=3` or `100=1,25kg`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CountEntry {
    pub denomination: u32,
    pub amount: Amount,
}

impl FromStr for CountEntry {
    type Err = CashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CashError::InvalidEntry(s.to_string());
        let (denom, amount) = s.split_once('=').ok_or_else(invalid)?;
        let denomination = denom.trim().parse::<u32>().map_err(|_| invalid())?;

        let amount = amount.trim().to_ascii_lowercase();
        let amount = match amount.strip_suffix("kg") {
            Some(kg) => Amount::WeightKg(
                kg.trim()
                    .replace(',', ".")
                    .parse::<f64>()
                    .map_err(|_| invalid())?,
            ),
            None => Amount::Quantity(amount.parse::<u64>().map_err(|_| invalid())?),
        };

        Ok(Self {
            denomination,
            amount,
        })
    }
}

/// Counted result for one denomination.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountLine {
    pub denomination: u32,
    pub is_bill: bool,
    pub quantity: u64,
    /// Weighed or expected weight, for weighable coins.
    pub weight_kg: Option<f64>,
    pub subtotal: u64,
}

/// Totals of a finished count.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountSummary {
    pub lines: Vec<CountLine>,
    pub bills_total: u64,
    pub coins_total: u64,
    pub grand_total: u64,
}

/// A drawer count in progress. Setting a denomination again replaces it.
#[derive(Debug, Clone, Default)]
pub struct CashCount {
    lines: BTreeMap<Reverse<u32>, CountLine>,
}

impl CashCount {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an entry and returns the resulting line.
    ///
    /// # Errors
    ///
    /// Unknown denominations, weights given for bills or the 500 coin,
    /// invalid weights and quantities above [`MAX_QUANTITY`].
    pub fn set(&mut self, entry: CountEntry) -> CashResult<&CountLine> {
        let denom = Denomination::of(entry.denomination)?;
        let value = denom.value();

        let line = match (denom, entry.amount) {
            (Denomination::Bill(_), Amount::Quantity(quantity)) => CountLine {
                denomination: value,
                is_bill: true,
                quantity,
                weight_kg: None,
                subtotal: bill_subtotal(value, quantity)?,
            },
            (_, Amount::WeightKg(kg)) => {
                let (quantity, subtotal) = coin_from_weight(value, kg)?;
                CountLine {
                    denomination: value,
                    is_bill: false,
                    quantity,
                    weight_kg: Some(kg),
                    subtotal,
                }
            }
            (_, Amount::Quantity(quantity)) => {
                let (weight, subtotal) = coin_from_quantity(value, quantity)?;
                CountLine {
                    denomination: value,
                    is_bill: false,
                    quantity,
                    weight_kg: denom.unit_kg().map(|_| weight),
                    subtotal,
                }
            }
        };

        debug!(
            denomination = value,
            quantity = line.quantity,
            subtotal = line.subtotal,
            "Count line set"
        );
        Ok(match self.lines.entry(Reverse(value)) {
            Entry::Occupied(mut slot) => {
                slot.insert(line);
                slot.into_mut()
            }
            Entry::Vacant(slot) => slot.insert(line),
        })
    }

    /// Parses and records a `denom=amount` entry.
    ///
    /// # Errors
    ///
    /// See [`CountEntry::from_str`] and [`CashCount::set`].
    pub fn apply(&mut self, entry: &str) -> CashResult<&CountLine> {
        let entry = entry.parse::<CountEntry>()?;
        self.set(entry)
    }

    /// Drops every line.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    #[must_use]
    pub fn line(&self, denomination: u32) -> Option<&CountLine> {
        self.lines.get(&Reverse(denomination))
    }

    /// Lines from the highest denomination down.
    pub fn lines(&self) -> impl Iterator<Item = &CountLine> {
        self.lines.values()
    }

    #[must_use]
    pub fn bills_total(&self) -> u64 {
        self.lines().filter(|l| l.is_bill).map(|l| l.subtotal).sum()
    }

    #[must_use]
    pub fn coins_total(&self) -> u64 {
        self.lines().filter(|l| !l.is_bill).map(|l| l.subtotal).sum()
    }

    #[must_use]
    pub fn grand_total(&self) -> u64 {
        self.bills_total() + self.coins_total()
    }

    #[must_use]
    pub fn summary(&self) -> CountSummary {
        CountSummary {
            lines: self.lines().cloned().collect(),
            bills_total: self.bills_total(),
            coins_total: self.coins_total(),
            grand_total: self.grand_total(),
        }
    }
}
