//! Operator menu for issuing license codes.

use crate::prompt;
use crate::render::{rule, write_ledger_entry};
use gestion_license::{CustomerDetails, LicenseIssuer};
use std::io::{self, BufRead, Write};
use tracing::{debug, error};

/// Runs the numbered menu until the operator exits or input ends.
pub fn run_menu<R: BufRead, W: Write>(
    issuer: &mut LicenseIssuer,
    input: &mut R,
    out: &mut W,
) -> io::Result<()> {
    writeln!(out, "{}", rule('='))?;
    writeln!(out, "GENERADOR DE CÓDIGOS DE LICENCIA - GESTIÓN COMERCIAL")?;
    writeln!(out, "{}", rule('='))?;
    writeln!(out, "\nHerramienta para uso exclusivo del desarrollador")?;
    writeln!(out, "Registro: {}", issuer.ledger().path().display())?;

    loop {
        writeln!(out, "\n{}", rule('-'))?;
        writeln!(out, "MENÚ PRINCIPAL")?;
        writeln!(out, "{}", rule('-'))?;
        writeln!(out, "1. Generar nuevo código de licencia")?;
        writeln!(out, "2. Listar todas las licencias")?;
        writeln!(out, "3. Buscar licencia")?;
        writeln!(out, "4. Salir")?;
        writeln!(out, "{}", rule('-'))?;

        let Some(choice) = prompt(input, out, "\nSeleccione una opción [1-4]: ")? else {
            return Ok(());
        };
        debug!(choice = %choice, "Menu selection");

        match choice.as_str() {
            "1" => generate(issuer, input, out)?,
            "2" => list(issuer, out)?,
            "3" => search(issuer, input, out)?,
            "4" => {
                writeln!(out, "\n¡Hasta luego!")?;
                return Ok(());
            }
            _ => writeln!(out, "\nOpción inválida. Por favor seleccione 1-4.")?,
        }
    }
}

fn generate<R: BufRead, W: Write>(
    issuer: &mut LicenseIssuer,
    input: &mut R,
    out: &mut W,
) -> io::Result<()> {
    writeln!(out, "\n{}", rule('='))?;
    writeln!(out, "GENERAR NUEVA LICENCIA")?;
    writeln!(out, "{}", rule('='))?;

    let hwid = prompt(input, out, "\nIngrese el HWID del cliente: ")?.unwrap_or_default();
    if hwid.is_empty() {
        return writeln!(out, "Error: HWID no puede estar vacío");
    }
    let customer = CustomerDetails {
        name: prompt(input, out, "Nombre del cliente (opcional): ")?.unwrap_or_default(),
        email: prompt(input, out, "Email del cliente (opcional): ")?.unwrap_or_default(),
        notes: prompt(input, out, "Notas adicionales (opcional): ")?.unwrap_or_default(),
    };
    let name = if customer.name.is_empty() {
        "N/A".to_string()
    } else {
        customer.name.clone()
    };

    match issuer.issue(&hwid, customer) {
        Ok(code) => {
            writeln!(out, "\n{}", rule('='))?;
            writeln!(out, "¡LICENCIA GENERADA EXITOSAMENTE!")?;
            writeln!(out, "{}", rule('='))?;
            writeln!(out, "\nCliente: {name}")?;
            writeln!(out, "HWID: {hwid}")?;
            writeln!(out, "\nCÓDIGO DE ACTIVACIÓN:")?;
            writeln!(out, "    {code}")?;
            writeln!(out, "\n{}", rule('='))?;
            writeln!(
                out,
                "\nProporcione este código al cliente para que active su copia."
            )
        }
        Err(e) => {
            error!(error = %e, "License generation failed");
            writeln!(out, "\nError: {e}")
        }
    }
}

fn list<W: Write>(issuer: &LicenseIssuer, out: &mut W) -> io::Result<()> {
    let entries = issuer.list();
    if entries.is_empty() {
        return writeln!(out, "\nNo hay licencias generadas aún.");
    }

    writeln!(out, "\n{}", rule('='))?;
    writeln!(out, "LICENCIAS GENERADAS")?;
    writeln!(out, "{}", rule('='))?;
    for (i, entry) in entries.iter().enumerate() {
        write_ledger_entry(out, i + 1, entry, false)?;
    }
    writeln!(out, "\n{}", rule('='))?;
    writeln!(out, "Total: {} licencia(s)", entries.len())
}

fn search<R: BufRead, W: Write>(
    issuer: &LicenseIssuer,
    input: &mut R,
    out: &mut W,
) -> io::Result<()> {
    let term = prompt(
        input,
        out,
        "\nIngrese término de búsqueda (nombre/email/HWID): ",
    )?
    .unwrap_or_default();
    if term.is_empty() {
        return writeln!(out, "Término de búsqueda vacío");
    }

    let found = issuer.search(&term);
    if found.is_empty() {
        return writeln!(out, "\nNo se encontraron licencias para: {term}");
    }

    writeln!(out, "\n{}", rule('='))?;
    writeln!(out, "RESULTADOS DE BÚSQUEDA: '{term}'")?;
    writeln!(out, "{}", rule('='))?;
    for (i, entry) in found.into_iter().enumerate() {
        write_ledger_entry(out, i + 1, entry, true)?;
    }
    writeln!(out, "\n{}", rule('='))
}
