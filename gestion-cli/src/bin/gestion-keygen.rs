//! Gestión Comercial license issuer
//!
//! Operator tool. Reads a customer's hardware ID, prints the activation code
//! for it and records the issuance in a JSON ledger.
//!
//! Usage:
//!   gestion-keygen --ledger licenses_database.json

use anyhow::{Context, Result};
use clap::Parser;
use gestion_cli::keygen::run_menu;
use gestion_license::{DEFAULT_LEDGER_FILE, LicenseIssuer, LicensingConfig};
use std::io;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "gestion-keygen", version)]
#[command(about = "Generador de códigos de licencia de Gestión Comercial")]
struct Args {
    /// Path to the license ledger
    #[arg(short, long, default_value = DEFAULT_LEDGER_FILE)]
    ledger: PathBuf,

    /// Enable verbose debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    gestion_cli::init_tracing(args.verbose);

    let mut issuer = LicenseIssuer::open(LicensingConfig::default(), &args.ledger)
        .with_context(|| format!("failed to open ledger {}", args.ledger.display()))?;
    info!(entries = issuer.list().len(), "Ledger loaded");

    run_menu(&mut issuer, &mut io::stdin().lock(), &mut io::stdout().lock())
        .context("terminal I/O failed")?;
    Ok(())
}
