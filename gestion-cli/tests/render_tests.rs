mod common;

use gestion_cash::{Amount, CashCount, CountEntry, MAX_QUANTITY};
use gestion_catalog::{DatabaseInfo, Product};
use gestion_cli::render::{
    StatusReport, truncate_hwid, write_count, write_db_info, write_product, write_status,
};
use tempfile::TempDir;

fn render(f: impl FnOnce(&mut Vec<u8>) -> std::io::Result<()>) -> String {
    let mut out = Vec::new();
    f(&mut out).unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn truncates_long_and_short_ids() {
    assert_eq!(
        truncate_hwid("0123456789ABCDEF0123456789ABCDEF"),
        "0123456789ABCDEF...0123456789ABCDEF"
    );
    assert_eq!(truncate_hwid("SHORT"), "SHORT...SHORT");
}

#[test]
fn product_shows_price() {
    let product = Product {
        barcode: "1100000100".into(),
        name: "Manzana".into(),
        price: 1350.0,
    };
    let text = render(|out| write_product(out, &product));
    assert_eq!(text, "Manzana\n$1.350\nCódigo: 1100000100\n");
}

#[test]
fn missing_database_info() {
    let info = DatabaseInfo {
        exists: false,
        path: "bd/*.xlsx".into(),
        last_modified: None,
        total_products: 0,
    };
    let text = render(|out| write_db_info(out, &info));
    assert!(text.contains("no encontrada"));
    assert!(text.contains("bd/*.xlsx"));
}

#[test]
fn count_totals() {
    let mut count = CashCount::new();
    count.apply("20000=2").unwrap();
    count.apply("100=1kg").unwrap();
    let text = render(|out| write_count(out, &count.summary()));

    assert!(text.contains("Total billetes: $40.000"));
    assert!(text.contains("Total monedas:  $13.200"));
    assert!(text.contains("TOTAL GENERAL:  $53.200"));
    assert!(text.contains("(1.000 kg)"));
}

#[test]
fn largest_count_prints_positive_totals() {
    let mut count = CashCount::new();
    for denom in [20000u32, 10000, 5000, 2000, 1000, 500, 100, 50, 10] {
        count
            .set(CountEntry {
                denomination: denom,
                amount: Amount::Quantity(MAX_QUANTITY),
            })
            .unwrap();
    }
    let text = render(|out| write_count(out, &count.summary()));

    assert!(text.contains("Total billetes: $380.000.000.000"));
    assert!(text.contains("TOTAL GENERAL:  $386.600.000.000"));
    assert!(!text.contains("$-"));
}

#[test]
fn status_report_before_and_after_activation() {
    let dir = TempDir::new().unwrap();
    let manager = common::manager(dir.path(), "till-1");

    let report = StatusReport::collect(&manager);
    assert!(report.license.is_none());
    let text = render(|out| write_status(out, &report));
    assert!(text.contains("Estado: La aplicación no está activada"));
    assert!(text.contains(&manager.get_formatted_hwid()));

    manager.activate(&common::code_for(&manager)).unwrap();
    let report = StatusReport::collect(&manager);
    assert!(report.license.is_some());
    let text = render(|out| write_status(out, &report));
    assert!(text.contains("Estado: Licencia válida"));
    assert!(text.contains("Código: "));
}
