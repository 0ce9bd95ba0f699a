//! Product lookup by barcode.
//!
//! Products live in a spreadsheet with a header row and the columns:
//!
//! | A       | B       | C      | D           |
//! |---------|---------|--------|-------------|
//! | barcode | product | unused | sale price  |
//!
//! Lookup is a linear scan returning the first exact barcode match. Reading
//! the spreadsheet is hidden behind [`RowSource`]; [`XlsxFolder`] serves the
//! first `.xlsx` file found in a folder.

use crate::config::CatalogConfig;
use crate::error::{CatalogError, CatalogResult};
use crate::price::parse_price;
use calamine::{Data, Reader, Xlsx, open_workbook};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Default folder holding the product spreadsheet.
pub const DEFAULT_DB_FOLDER: &str = "bd";

const BARCODE_COL: usize = 0;
const NAME_COL: usize = 1;
const PRICE_COL: usize = 3;
const MIN_COLUMNS: usize = 4;

/// A spreadsheet cell as the catalog sees it.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
}

impl Cell {
    /// Text form used for comparisons and display.
    ///
    /// Whole numbers render without a fractional part, so a barcode stored as
    /// a number compares equal to the scanned digits.
    #[must_use]
    pub fn as_text(&self) -> String {
        match self {
            Self::Empty => String::new(),
            Self::Text(s) => s.trim().to_string(),
            Self::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => format!("{}", *n as i64),
            Self::Number(n) => n.to_string(),
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        if s.is_empty() {
            Self::Empty
        } else {
            Self::Text(s.to_string())
        }
    }
}

impl From<f64> for Cell {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<&Data> for Cell {
    fn from(data: &Data) -> Self {
        match data {
            Data::Empty | Data::Error(_) => Self::Empty,
            Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => Self::Text(s.clone()),
            Data::Float(f) => Self::Number(*f),
            Data::Int(i) => Self::Number(*i as f64),
            Data::Bool(b) => Self::Text(b.to_string()),
            Data::DateTime(dt) => Self::Number(dt.as_f64()),
        }
    }
}

/// Provider of product rows (header excluded).
pub trait RowSource {
    /// Where the rows come from, for messages.
    fn location(&self) -> String;

    /// Returns true if the backing data can be read.
    fn is_available(&self) -> bool;

    /// When the backing data last changed, if known.
    fn last_modified(&self) -> Option<DateTime<Local>>;

    /// All data rows, header excluded.
    fn rows(&self) -> CatalogResult<Vec<Vec<Cell>>>;
}

/// First `.xlsx` file (by name) inside a folder.
#[derive(Debug, Clone)]
pub struct XlsxFolder {
    folder: PathBuf,
}

impl XlsxFolder {
    #[must_use]
    pub fn new(folder: impl Into<PathBuf>) -> Self {
        Self {
            folder: folder.into(),
        }
    }

    #[must_use]
    pub fn folder(&self) -> &Path {
        &self.folder
    }

    /// Locates the spreadsheet, if any.
    #[must_use]
    pub fn find_file(&self) -> Option<PathBuf> {
        let mut files: Vec<PathBuf> = fs::read_dir(&self.folder)
            .ok()?
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|p| {
                p.is_file()
                    && p.extension()
                        .is_some_and(|ext| ext.eq_ignore_ascii_case("xlsx"))
            })
            .collect();
        files.sort();
        files.into_iter().next()
    }
}

impl RowSource for XlsxFolder {
    fn location(&self) -> String {
        self.find_file()
            .unwrap_or_else(|| self.folder.join("*.xlsx"))
            .display()
            .to_string()
    }

    fn is_available(&self) -> bool {
        self.find_file().is_some()
    }

    fn last_modified(&self) -> Option<DateTime<Local>> {
        let path = self.find_file()?;
        let modified = fs::metadata(path).and_then(|m| m.modified()).ok()?;
        Some(DateTime::<Local>::from(modified))
    }

    fn rows(&self) -> CatalogResult<Vec<Vec<Cell>>> {
        let path = self
            .find_file()
            .ok_or_else(|| CatalogError::DatabaseUnavailable(self.location()))?;
        read_xlsx_rows(&path)
    }
}

/// Reads the first worksheet of `path`, skipping the header row.
fn read_xlsx_rows(path: &Path) -> CatalogResult<Vec<Vec<Cell>>> {
    let mut workbook: Xlsx<_> = open_workbook(path)?;
    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| CatalogError::Read("workbook contains no sheets".to_string()))?;
    let range = workbook.worksheet_range(&sheet_name)?;

    let Some((_, (last_row, last_col))) = range.start().zip(range.end()) else {
        return Ok(Vec::new());
    };

    // Absolute coordinates so an empty column A or row 1 keeps its meaning.
    let rows = (1..=last_row)
        .map(|row| {
            (0..=last_col)
                .map(|col| range.get_value((row, col)).map_or(Cell::Empty, Cell::from))
                .collect()
        })
        .collect();

    debug!(path = %path.display(), sheet = %sheet_name, "Product sheet loaded");
    Ok(rows)
}

/// In-memory rows, for embedding or tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryRows {
    rows: Vec<Vec<Cell>>,
}

impl MemoryRows {
    #[must_use]
    pub fn new(rows: Vec<Vec<Cell>>) -> Self {
        Self { rows }
    }
}

impl RowSource for MemoryRows {
    fn location(&self) -> String {
        "memory".to_string()
    }

    fn is_available(&self) -> bool {
        true
    }

    fn last_modified(&self) -> Option<DateTime<Local>> {
        None
    }

    fn rows(&self) -> CatalogResult<Vec<Vec<Cell>>> {
        Ok(self.rows.clone())
    }
}

/// A product found by barcode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub barcode: String,
    pub name: String,
    pub price: f64,
}

/// Summary shown next to the barcode field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseInfo {
    pub exists: bool,
    pub path: String,
    pub last_modified: Option<DateTime<Local>>,
    pub total_products: usize,
}

impl DatabaseInfo {
    /// Last-modified time as `dd/mm/yyyy HH:MM`.
    #[must_use]
    pub fn last_modified_display(&self) -> String {
        self.last_modified.map_or_else(
            || "Archivo no encontrado".to_string(),
            |t| t.format("%d/%m/%Y %H:%M").to_string(),
        )
    }
}

/// Barcode lookup over a [`RowSource`].
pub struct ProductDatabase {
    source: Box<dyn RowSource>,
}

impl ProductDatabase {
    /// Database backed by the first spreadsheet in `folder`.
    #[must_use]
    pub fn open(folder: impl Into<PathBuf>) -> Self {
        Self::with_source(XlsxFolder::new(folder))
    }

    /// Database for the folder named in `config`.
    #[must_use]
    pub fn from_config(config: &CatalogConfig) -> Self {
        Self::open(config.folder())
    }

    #[must_use]
    pub fn with_source(source: impl RowSource + 'static) -> Self {
        Self {
            source: Box::new(source),
        }
    }

    /// Returns true if the backing spreadsheet is present.
    #[must_use]
    pub fn file_exists(&self) -> bool {
        self.source.is_available()
    }

    /// Finds the first row whose barcode equals `barcode` (trimmed).
    ///
    /// A malformed price is logged and read as zero.
    ///
    /// # Errors
    ///
    /// [`CatalogError::DatabaseUnavailable`], [`CatalogError::EmptyBarcode`],
    /// [`CatalogError::Read`] or [`CatalogError::ProductNotFound`].
    pub fn search_product(&self, barcode: &str) -> CatalogResult<Product> {
        if !self.source.is_available() {
            return Err(CatalogError::DatabaseUnavailable(self.source.location()));
        }

        let wanted = barcode.trim();
        if wanted.is_empty() {
            return Err(CatalogError::EmptyBarcode);
        }

        let rows = self.source.rows()?;
        let row = rows
            .iter()
            .filter(|row| row.len() >= MIN_COLUMNS)
            .find(|row| row[BARCODE_COL].as_text() == wanted)
            .ok_or_else(|| CatalogError::ProductNotFound(wanted.to_string()))?;

        Ok(Product {
            barcode: wanted.to_string(),
            name: row[NAME_COL].as_text(),
            price: price_of(&row[PRICE_COL], wanted),
        })
    }

    /// Presence, location, freshness and size of the database.
    #[must_use]
    pub fn get_database_info(&self) -> DatabaseInfo {
        let exists = self.source.is_available();
        let total_products = if exists {
            self.source.rows().map_or_else(
                |e| {
                    warn!(error = %e, "Could not count products");
                    0
                },
                |rows| rows.len(),
            )
        } else {
            0
        };

        DatabaseInfo {
            exists,
            path: self.source.location(),
            last_modified: self.source.last_modified(),
            total_products,
        }
    }
}

impl std::fmt::Debug for ProductDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProductDatabase")
            .field("source", &self.source.location())
            .finish()
    }
}

fn price_of(cell: &Cell, barcode: &str) -> f64 {
    match cell {
        Cell::Empty => 0.0,
        Cell::Number(n) => *n,
        Cell::Text(text) => parse_price(text).unwrap_or_else(|e| {
            warn!(barcode, error = %e, "Price unreadable, using 0");
            0.0
        }),
    }
}
