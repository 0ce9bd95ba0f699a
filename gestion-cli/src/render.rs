//! Plain-text views printed by the binaries.

use gestion_cash::CountSummary;
use gestion_catalog::{DatabaseInfo, Product, format_price, format_thousands};
use gestion_license::{ActivationState, DeviceInfo, LedgerEntry, LicenseManager, LicenseRecord};
use serde::Serialize;
use std::io::{self, Write};

const RULE_WIDTH: usize = 80;

pub fn rule(ch: char) -> String {
    ch.to_string().repeat(RULE_WIDTH)
}

/// `first16...last16`, as shown in ledger listings.
#[must_use]
pub fn truncate_hwid(hwid: &str) -> String {
    let chars: Vec<char> = hwid.chars().collect();
    let head: String = chars.iter().take(16).collect();
    let tail: String = chars[chars.len().saturating_sub(16)..].iter().collect();
    format!("{head}...{tail}")
}

/// Unsigned value with thousands separators.
fn grouped(value: u64) -> String {
    i64::try_from(value).map_or_else(|_| value.to_string(), format_thousands)
}

fn or_na(value: &str) -> &str {
    if value.is_empty() { "N/A" } else { value }
}

/// One ledger entry. Listings show a shortened fingerprint.
pub fn write_ledger_entry<W: Write>(
    out: &mut W,
    index: usize,
    entry: &LedgerEntry,
    full_hwid: bool,
) -> io::Result<()> {
    let hwid = if full_hwid {
        entry.hwid.clone()
    } else {
        truncate_hwid(&entry.hwid)
    };
    writeln!(out, "\n[{index}] Licencia #{index}")?;
    writeln!(out, "    Cliente: {}", or_na(&entry.customer_name))?;
    writeln!(out, "    Email: {}", or_na(&entry.customer_email))?;
    writeln!(out, "    HWID: {hwid}")?;
    writeln!(out, "    Código: {}", entry.license_code)?;
    writeln!(out, "    Fecha: {}", entry.generated_date.date())?;
    writeln!(out, "    Estado: {}", entry.status)?;
    if !entry.notes.is_empty() {
        writeln!(out, "    Notas: {}", entry.notes)?;
    }
    Ok(())
}

/// Everything `gestion status` reports.
#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    pub state: ActivationState,
    pub message: String,
    pub hwid: String,
    pub license_path: String,
    pub license: Option<LicenseRecord>,
    pub device: DeviceInfo,
}

impl StatusReport {
    #[must_use]
    pub fn collect(manager: &LicenseManager) -> Self {
        let check = manager.validate_on_startup();
        Self {
            state: check.state,
            message: check.message,
            hwid: manager.get_formatted_hwid(),
            license_path: manager.config().license_path().display().to_string(),
            license: manager.get_license_info(),
            device: DeviceInfo::collect(),
        }
    }
}

pub fn write_status<W: Write>(out: &mut W, report: &StatusReport) -> io::Result<()> {
    writeln!(out, "Estado: {}", report.message)?;
    writeln!(out, "HWID: {}", report.hwid)?;
    writeln!(out, "Archivo de licencia: {}", report.license_path)?;
    if let Some(record) = &report.license {
        writeln!(out, "Código: {}", record.license_code)?;
        writeln!(
            out,
            "Activada: {}",
            record.activation_date.format("%d/%m/%Y %H:%M")
        )?;
        writeln!(out, "Versión: {}", record.app_version)?;
    }
    let device = &report.device;
    writeln!(
        out,
        "Equipo: {} ({} {}, {})",
        device.hostname, device.os_name, device.os_version, device.arch
    )
}

pub fn write_product<W: Write>(out: &mut W, product: &Product) -> io::Result<()> {
    writeln!(out, "{}", product.name)?;
    writeln!(out, "{}", format_price(product.price))?;
    writeln!(out, "Código: {}", product.barcode)
}

pub fn write_db_info<W: Write>(out: &mut W, info: &DatabaseInfo) -> io::Result<()> {
    if !info.exists {
        writeln!(out, "Base de datos no encontrada")?;
        return writeln!(out, "Ubicación esperada: {}", info.path);
    }
    writeln!(out, "Base de datos: {}", info.path)?;
    writeln!(out, "Actualizada: {}", info.last_modified_display())?;
    writeln!(out, "Productos: {}", grouped(info.total_products as u64))
}

pub fn write_count<W: Write>(out: &mut W, summary: &CountSummary) -> io::Result<()> {
    for line in &summary.lines {
        let kind = if line.is_bill { "Billete" } else { "Moneda" };
        let weight = line
            .weight_kg
            .map(|kg| format!(" ({kg:.3} kg)"))
            .unwrap_or_default();
        writeln!(
            out,
            "{kind} ${:>6} x {:>5}{weight} = ${}",
            format_thousands(i64::from(line.denomination)),
            line.quantity,
            grouped(line.subtotal)
        )?;
    }
    writeln!(out, "{}", rule('-'))?;
    writeln!(out, "Total billetes: ${}", grouped(summary.bills_total))?;
    writeln!(out, "Total monedas:  ${}", grouped(summary.coins_total))?;
    writeln!(out, "TOTAL GENERAL:  ${}", grouped(summary.grand_total))
}

/// Module list shown once the license gate has passed.
pub fn write_launcher<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "{}", rule('='))?;
    writeln!(out, " GESTIÓN COMERCIAL")?;
    writeln!(out, "{}", rule('='))?;
    writeln!(out, "  Contador de caja     gestion count 20000=3 100=1,2kg ...")?;
    writeln!(out, "  Lector de precios    gestion lookup <código>")?;
    writeln!(out, "  Base de datos        gestion db-info")?;
    writeln!(out, "  Licencia             gestion status")
}
