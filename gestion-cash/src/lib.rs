//! Cash-drawer counter for Gestión Comercial.
//!
//! Turns bill quantities and coin weights into subtotals and a grand total.

mod counter;
pub mod denomination;
mod error;

pub use counter::{
    Amount, CashCount, CountEntry, CountLine, CountSummary, MAX_QUANTITY, bill_subtotal,
    coin_from_quantity, coin_from_weight,
};
pub use denomination::Denomination;
pub use error::{CashError, CashResult};
