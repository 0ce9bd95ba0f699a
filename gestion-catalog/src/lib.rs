//! Product catalog for Gestión Comercial.
//!
//! Barcode lookup over the store's product spreadsheet, locale price
//! handling, and the state behind the price-lookup screen.

mod config;
mod database;
mod error;
mod price;
mod reader;

pub use config::CatalogConfig;
pub use database::{
    Cell, DEFAULT_DB_FOLDER, DatabaseInfo, MemoryRows, Product, ProductDatabase, RowSource,
    XlsxFolder,
};
pub use error::{CatalogError, CatalogResult};
pub use price::{format_price, format_thousands, parse_price};
pub use reader::{AUTO_CLEAR_DELAY, AutoClear, PriceReader, ReaderDisplay};
