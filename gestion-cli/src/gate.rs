//! Startup license gate.
//!
//! Runs the startup check and, when activation is required, keeps asking
//! for a code until one is accepted or the user gives up. Giving up is final:
//! the caller must not enter the application.

use crate::prompt;
use gestion_license::{
    ACTIVATION_SUCCESS_MESSAGE, LicenseManager, LicenseRecord, activation_failure_message,
};
use std::io::{self, BufRead, Write};
use tracing::{info, warn};

/// How the gate ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateOutcome {
    /// A valid license was already stored.
    AlreadyValid,
    /// The user activated during this run.
    Activated(LicenseRecord),
    /// The user left the activation prompt.
    Cancelled,
}

impl GateOutcome {
    /// Returns true if the application may start.
    #[must_use]
    pub fn may_proceed(&self) -> bool {
        !matches!(self, Self::Cancelled)
    }
}

const CODE_PROMPT: &str = "\nCódigo de activación (XXXXX-XXXXX-XXXXX-XXXXX, vacío para salir): ";
const CONFIRM_EXIT: &str =
    "Si sale, la aplicación se cerrará. ¿Está seguro de que desea salir? [s/N]: ";

/// Checks the stored license, prompting for activation on `input` if needed.
pub fn run_gate<R: BufRead, W: Write>(
    manager: &LicenseManager,
    input: &mut R,
    out: &mut W,
) -> io::Result<GateOutcome> {
    let check = manager.validate_on_startup();
    if check.is_valid() {
        writeln!(out, "{}", check.message)?;
        return Ok(GateOutcome::AlreadyValid);
    }

    writeln!(out, "{}", check.message)?;
    writeln!(out)?;
    writeln!(out, "Activación de Licencia")?;
    writeln!(out, "Por favor, active su copia de Gestión Comercial")?;
    writeln!(out)?;
    writeln!(out, "Identificador de Equipo (HWID): {}", manager.get_formatted_hwid())?;
    writeln!(
        out,
        "Compártalo con el proveedor para obtener su código de activación."
    )?;

    loop {
        let Some(code) = prompt(input, out, CODE_PROMPT)? else {
            info!("Activation prompt closed");
            return Ok(GateOutcome::Cancelled);
        };

        if code.is_empty() {
            match prompt(input, out, CONFIRM_EXIT)? {
                Some(answer) if !is_yes(&answer) => continue,
                _ => {
                    info!("Activation cancelled by user");
                    return Ok(GateOutcome::Cancelled);
                }
            }
        }

        match manager.activate(&code) {
            Ok(record) => {
                writeln!(out, "{ACTIVATION_SUCCESS_MESSAGE}")?;
                writeln!(out, "La aplicación se iniciará ahora.")?;
                return Ok(GateOutcome::Activated(record));
            }
            Err(e) => {
                warn!(error = %e, "Activation attempt failed");
                writeln!(out, "No se pudo activar la licencia:")?;
                writeln!(out, "  {}", activation_failure_message(&e))?;
                writeln!(out, "Por favor, verifique el código e intente nuevamente.")?;
            }
        }
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(
        answer.to_lowercase().as_str(),
        "s" | "si" | "sí" | "y" | "yes"
    )
}
