use gestion_catalog::{
    Cell, CatalogError, MemoryRows, Product, ProductDatabase, RowSource, XlsxFolder,
};
use pretty_assertions::assert_eq;
use rust_xlsxwriter::Workbook;
use std::path::Path;
use tempfile::TempDir;

fn row(barcode: &str, name: &str, unused: &str, price: &str) -> Vec<Cell> {
    vec![barcode.into(), name.into(), unused.into(), price.into()]
}

fn sample_db() -> ProductDatabase {
    ProductDatabase::with_source(MemoryRows::new(vec![
        row("1100000100", "Manzana", "", "$350"),
        row("7801234567890", "Aceite Maravilla 1L", "x", "$2.490"),
        row("7800000000001", "Queso Gauda", "", "$8.990,50"),
        row("7800000000002", "Pan Amasado", "", "a consultar"),
        row("7800000000003", "Bolsa", "", ""),
        vec!["1100000100".into(), "Duplicado".into()],
        row("1100000100", "Manzana Roja", "", "$999"),
    ]))
}

fn write_sheet(dir: &Path, file: &str, rows: &[(&str, &str, &str, &str)]) {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    for (col, header) in ["Código", "Producto", "Stock", "P. Venta"].iter().enumerate() {
        sheet.write_string(0, col as u16, *header).unwrap();
    }
    for (i, (barcode, name, unused, price)) in rows.iter().enumerate() {
        let r = i as u32 + 1;
        sheet.write_string(r, 0, *barcode).unwrap();
        sheet.write_string(r, 1, *name).unwrap();
        if !unused.is_empty() {
            sheet.write_string(r, 2, *unused).unwrap();
        }
        sheet.write_string(r, 3, *price).unwrap();
    }
    workbook.save(dir.join(file)).unwrap();
}

// ── In-memory rows ───────────────────────────────────────────────

#[test]
fn finds_product_by_barcode() {
    let product = sample_db().search_product("1100000100").unwrap();
    assert_eq!(
        product,
        Product {
            barcode: "1100000100".into(),
            name: "Manzana".into(),
            price: 350.0,
        }
    );
}

#[test]
fn first_match_wins() {
    let product = sample_db().search_product("1100000100").unwrap();
    assert_eq!(product.name, "Manzana");
}

#[test]
fn barcode_is_trimmed() {
    let product = sample_db().search_product("  7801234567890 \n").unwrap();
    assert_eq!(product.name, "Aceite Maravilla 1L");
    assert_eq!(product.price, 2490.0);
}

#[test]
fn decimal_comma_prices() {
    let product = sample_db().search_product("7800000000001").unwrap();
    assert_eq!(product.price, 8990.5);
}

#[test]
fn malformed_price_falls_back_to_zero() {
    let product = sample_db().search_product("7800000000002").unwrap();
    assert_eq!(product.name, "Pan Amasado");
    assert_eq!(product.price, 0.0);
}

#[test]
fn empty_price_is_zero() {
    assert_eq!(sample_db().search_product("7800000000003").unwrap().price, 0.0);
}

#[test]
fn unknown_barcode_not_found() {
    let err = sample_db().search_product("9999999999").unwrap_err();
    assert!(matches!(err, CatalogError::ProductNotFound(ref b) if b == "9999999999"));
    assert!(err.user_message().contains("no encontrado"));
}

#[test]
fn empty_barcode_rejected() {
    let err = sample_db().search_product("   ").unwrap_err();
    assert!(matches!(err, CatalogError::EmptyBarcode));
    assert_eq!(err.user_message(), "Código de barras vacío");
}

#[test]
fn numeric_barcode_cells_match_digits() {
    let db = ProductDatabase::with_source(MemoryRows::new(vec![vec![
        Cell::Number(7_801_234_567_890.0),
        "Leche".into(),
        Cell::Empty,
        Cell::Number(1190.0),
    ]]));
    let product = db.search_product("7801234567890").unwrap();
    assert_eq!(product.name, "Leche");
    assert_eq!(product.price, 1190.0);
}

#[test]
fn memory_info_counts_rows() {
    let info = sample_db().get_database_info();
    assert!(info.exists);
    assert_eq!(info.total_products, 7);
    assert_eq!(info.path, "memory");
    assert_eq!(info.last_modified_display(), "Archivo no encontrado");
}

// ── Spreadsheet folder ───────────────────────────────────────────

#[test]
fn missing_folder_is_unavailable() {
    let dir = TempDir::new().unwrap();
    let db = ProductDatabase::open(dir.path().join("bd"));

    assert!(!db.file_exists());
    let err = db.search_product("1100000100").unwrap_err();
    assert!(matches!(err, CatalogError::DatabaseUnavailable(_)));
    assert!(err.user_message().contains("*.xlsx"));

    let info = db.get_database_info();
    assert!(!info.exists);
    assert_eq!(info.total_products, 0);
    assert!(info.last_modified.is_none());
}

#[test]
fn folder_without_spreadsheet_is_unavailable() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("productos.csv"), "a,b,c,d").unwrap();
    let db = ProductDatabase::open(dir.path());
    assert!(!db.file_exists());
}

#[test]
fn reads_xlsx_file() {
    let dir = TempDir::new().unwrap();
    write_sheet(
        dir.path(),
        "productos.xlsx",
        &[
            ("1100000100", "Manzana", "", "$350"),
            ("7801234567890", "Aceite Maravilla 1L", "12", "$2.490"),
        ],
    );
    let db = ProductDatabase::open(dir.path());

    assert!(db.file_exists());
    let product = db.search_product("1100000100").unwrap();
    assert_eq!(product.name, "Manzana");
    assert_eq!(product.price, 350.0);
    assert_eq!(db.search_product("7801234567890").unwrap().price, 2490.0);
    assert!(matches!(
        db.search_product("9999999999"),
        Err(CatalogError::ProductNotFound(_))
    ));
}

#[test]
fn xlsx_info_reports_file() {
    let dir = TempDir::new().unwrap();
    write_sheet(
        dir.path(),
        "productos.xlsx",
        &[("1", "A", "", "$1"), ("2", "B", "", "$2"), ("3", "C", "", "$3")],
    );
    let info = ProductDatabase::open(dir.path()).get_database_info();

    assert!(info.exists);
    assert!(info.path.ends_with("productos.xlsx"));
    assert_eq!(info.total_products, 3);
    assert!(info.last_modified.is_some());
    assert_eq!(info.last_modified_display().len(), "01/01/2024 10:00".len());
}

#[test]
fn first_spreadsheet_by_name_is_used() {
    let dir = TempDir::new().unwrap();
    write_sheet(dir.path(), "b_productos.xlsx", &[("1", "Desde B", "", "$1")]);
    write_sheet(dir.path(), "a_productos.xlsx", &[("1", "Desde A", "", "$1")]);

    let source = XlsxFolder::new(dir.path());
    assert!(source.location().ends_with("a_productos.xlsx"));
    let db = ProductDatabase::with_source(source);
    assert_eq!(db.search_product("1").unwrap().name, "Desde A");
}

#[test]
fn corrupt_spreadsheet_is_read_error() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("productos.xlsx"), b"not a zip file").unwrap();
    let db = ProductDatabase::open(dir.path());

    let err = db.search_product("1").unwrap_err();
    assert!(matches!(err, CatalogError::Read(_)));
    assert_eq!(db.get_database_info().total_products, 0);
}

#[test]
fn config_selects_folder() {
    let default = gestion_catalog::CatalogConfig::default();
    assert_eq!(default.folder(), Path::new(gestion_catalog::DEFAULT_DB_FOLDER));

    let dir = TempDir::new().unwrap();
    write_sheet(dir.path(), "productos.xlsx", &[("42", "Té", "", "$1.500")]);
    let config = gestion_catalog::CatalogConfig::default().with_folder(dir.path());
    let db = ProductDatabase::from_config(&config);
    assert_eq!(db.search_product("42").unwrap().price, 1500.0);
}
