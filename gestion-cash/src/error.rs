//! Error types for the cash counter.

use thiserror::Error;

/// Result type for cash counter operations.
pub type CashResult<T> = Result<T, CashError>;

#[derive(Debug, Error, PartialEq)]
pub enum CashError {
    /// Not a bill or coin the drawer holds.
    #[error("unknown denomination: {0}")]
    UnknownDenomination(u32),

    /// The coin cannot be counted by weight.
    #[error("denomination {0} is counted by quantity only")]
    NotWeighable(u32),

    /// Negative, non-finite or otherwise unusable amount.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    /// A `denom=amount` entry that could not be parsed.
    #[error("invalid entry {0:?}, expected denom=qty or denom=<kg>kg")]
    InvalidEntry(String),
}
