//! Gestión Comercial client
//!
//! Runs the license gate before anything else, then exposes the price lookup
//! and cash counter from the terminal.
//!
//! Usage:
//!   gestion                      # startup check, activation prompt if needed
//!   gestion lookup 7801234567890
//!   gestion count 20000=3 500=4 100=1,2kg

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use gestion_cash::{CashCount, denomination};
use gestion_catalog::{CatalogConfig, DEFAULT_DB_FOLDER, ProductDatabase};
use gestion_cli::gate::run_gate;
use gestion_cli::render::{self, StatusReport};
use gestion_license::{
    ACTIVATION_SUCCESS_MESSAGE, LicenseManager, LicensingConfig, activation_failure_message,
};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, info};

#[derive(Parser, Debug)]
#[command(name = "gestion", version)]
#[command(about = "Gestión Comercial: licencia, lector de precios y contador de caja")]
struct Args {
    /// Directory holding the license file (default: per-user data directory)
    #[arg(long, global = true)]
    license_dir: Option<PathBuf>,

    /// Folder containing the product spreadsheet
    #[arg(long, global = true, default_value = DEFAULT_DB_FOLDER)]
    db_folder: PathBuf,

    /// Enable verbose debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check the license, prompting for activation when needed (default)
    Check,
    /// Activate with a code, without prompting
    Activate { code: String },
    /// Show license and device status
    Status {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Remove the stored license
    Deactivate,
    /// Print this machine's hardware ID
    Hwid,
    /// Look up a product by barcode
    Lookup { barcode: String },
    /// Show product database information
    DbInfo,
    /// Count the cash drawer from denom=qty or denom=<kg>kg entries
    Count {
        entries: Vec<String>,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();
    gestion_cli::init_tracing(args.verbose);

    let licensing = match &args.license_dir {
        Some(dir) => LicensingConfig::in_dir(dir),
        None => LicensingConfig::default(),
    };
    debug!(path = %licensing.license_path().display(), "License location");
    let manager = LicenseManager::new(licensing);
    let catalog = CatalogConfig::default().with_folder(&args.db_folder);

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match args.command.unwrap_or(Command::Check) {
        Command::Check => {
            let outcome = run_gate(&manager, &mut io::stdin().lock(), &mut out)
                .context("activation prompt failed")?;
            if !outcome.may_proceed() {
                writeln!(out, "La aplicación se cerrará.")?;
                return Ok(ExitCode::FAILURE);
            }
            info!("Starting application");
            render::write_launcher(&mut out)?;
        }
        Command::Activate { code } => match manager.activate(&code) {
            Ok(_) => writeln!(out, "{ACTIVATION_SUCCESS_MESSAGE}")?,
            Err(e) => {
                writeln!(out, "{}", activation_failure_message(&e))?;
                return Ok(ExitCode::FAILURE);
            }
        },
        Command::Status { json } => {
            let report = StatusReport::collect(&manager);
            if json {
                serde_json::to_writer_pretty(&mut out, &report)
                    .context("failed to serialize status")?;
                writeln!(out)?;
            } else {
                render::write_status(&mut out, &report)?;
            }
        }
        Command::Deactivate => {
            if manager.deactivate() {
                writeln!(out, "Licencia desactivada")?;
            } else {
                writeln!(out, "No había una licencia activa")?;
            }
        }
        Command::Hwid => writeln!(out, "{}", manager.get_formatted_hwid())?,
        Command::Lookup { barcode } => {
            require_license(&manager)?;
            let db = ProductDatabase::from_config(&catalog);
            match db.search_product(&barcode) {
                Ok(product) => render::write_product(&mut out, &product)?,
                Err(e) => {
                    writeln!(out, "{}", e.user_message())?;
                    return Ok(ExitCode::FAILURE);
                }
            }
        }
        Command::DbInfo => {
            require_license(&manager)?;
            let info = ProductDatabase::from_config(&catalog).get_database_info();
            render::write_db_info(&mut out, &info)?;
        }
        Command::Count { entries, json } => {
            require_license(&manager)?;
            if entries.is_empty() {
                let known: Vec<String> = denomination::all()
                    .iter()
                    .map(ToString::to_string)
                    .collect();
                bail!(
                    "no entries given; use denom=qty or denom=<kg>kg with denominations {}",
                    known.join(", ")
                );
            }
            let mut count = CashCount::new();
            for entry in &entries {
                count
                    .apply(entry)
                    .with_context(|| format!("rejected entry {entry:?}"))?;
            }
            let summary = count.summary();
            if json {
                serde_json::to_writer_pretty(&mut out, &summary)
                    .context("failed to serialize count")?;
                writeln!(out)?;
            } else {
                render::write_count(&mut out, &summary)?;
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Refuses to run a module without a valid license.
fn require_license(manager: &LicenseManager) -> Result<()> {
    let check = manager.validate_on_startup();
    if !check.is_valid() {
        bail!("{} (ejecute `gestion` para activar)", check.message);
    }
    Ok(())
}
