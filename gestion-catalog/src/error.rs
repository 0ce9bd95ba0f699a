//! Error types for the product catalog.

use thiserror::Error;

/// Result type for catalog operations.
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Errors that can occur while looking up products.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// No spreadsheet found where one was expected.
    #[error("product database unavailable, expected at {0}")]
    DatabaseUnavailable(String),

    /// The scanned barcode was blank.
    #[error("empty barcode")]
    EmptyBarcode,

    /// No row carries the barcode.
    #[error("product {0} not found")]
    ProductNotFound(String),

    /// A price cell could not be interpreted.
    #[error("malformed price field: {0:?}")]
    MalformedPriceField(String),

    /// The spreadsheet could not be opened or read.
    #[error("failed to read product database: {0}")]
    Read(String),
}

impl CatalogError {
    /// Text shown on the price-lookup screen.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::DatabaseUnavailable(location) => format!(
                "El archivo de base de datos no existe.\nUbicación esperada: {location}"
            ),
            Self::EmptyBarcode => "Código de barras vacío".to_string(),
            Self::ProductNotFound(barcode) => {
                format!("Producto con código '{barcode}' no encontrado en la base de datos")
            }
            Self::MalformedPriceField(raw) => format!("Precio inválido: {raw}"),
            Self::Read(reason) => format!("Error al leer la base de datos: {reason}"),
        }
    }
}

impl From<calamine::XlsxError> for CatalogError {
    fn from(e: calamine::XlsxError) -> Self {
        Self::Read(e.to_string())
    }
}
