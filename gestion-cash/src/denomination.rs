//! Chilean peso denominations held in the drawer.

use crate::error::{CashError, CashResult};

/// Bills, counted by quantity.
pub const BILLS: [u32; 5] = [20000, 10000, 5000, 2000, 1000];

/// Coins that may be weighed, with the weight of one coin in grams.
pub const WEIGHED_COINS: [(u32, f64); 3] = [(100, 7.57), (50, 7.0), (10, 3.5)];

/// Coins counted by quantity only.
pub const COUNTED_COINS: [u32; 1] = [500];

/// How a denomination is counted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Denomination {
    Bill(u32),
    /// Coin with its per-unit weight in kilograms.
    WeighedCoin { value: u32, unit_kg: f64 },
    CountedCoin(u32),
}

impl Denomination {
    /// Classifies a face value.
    ///
    /// # Errors
    ///
    /// [`CashError::UnknownDenomination`] for values the drawer does not hold.
    pub fn of(value: u32) -> CashResult<Self> {
        if BILLS.contains(&value) {
            return Ok(Self::Bill(value));
        }
        if let Some(&(_, grams)) = WEIGHED_COINS.iter().find(|(v, _)| *v == value) {
            return Ok(Self::WeighedCoin {
                value,
                unit_kg: grams / 1000.0,
            });
        }
        if COUNTED_COINS.contains(&value) {
            return Ok(Self::CountedCoin(value));
        }
        Err(CashError::UnknownDenomination(value))
    }

    #[must_use]
    pub fn value(&self) -> u32 {
        match *self {
            Self::Bill(v) | Self::CountedCoin(v) | Self::WeighedCoin { value: v, .. } => v,
        }
    }

    #[must_use]
    pub fn is_bill(&self) -> bool {
        matches!(self, Self::Bill(_))
    }

    /// Weight of one unit in kilograms, for weighable coins.
    #[must_use]
    pub fn unit_kg(&self) -> Option<f64> {
        match *self {
            Self::WeighedCoin { unit_kg, .. } => Some(unit_kg),
            _ => None,
        }
    }
}

/// Every denomination in display order: bills first, then coins by value.
#[must_use]
pub fn all() -> Vec<u32> {
    let mut coins: Vec<u32> = WEIGHED_COINS
        .iter()
        .map(|(v, _)| *v)
        .chain(COUNTED_COINS)
        .collect();
    coins.sort_unstable_by(|a, b| b.cmp(a));
    BILLS.iter().copied().chain(coins).collect()
}
