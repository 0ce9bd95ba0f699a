//! Startup gate and activation flow.
//!
//! On launch the application asks [`LicenseManager::validate_on_startup`]
//! whether it may proceed. When activation is required, the interactive layer
//! collects a code and submits it through [`LicenseManager::activate`]; every
//! failure returns control to that layer for a retry or cancellation.

use crate::code::LicenseCode;
use crate::codec::ObfuscationCodec;
use crate::config::LicensingConfig;
use crate::error::{LicenseError, LicenseResult};
use crate::hardware::{HardwareFingerprint, HardwareProbe, SystemProbe};
use crate::store::{LicenseRecord, LicenseStore};
use serde::{Deserialize, Serialize};
use std::cell::OnceCell;
use tracing::{info, warn};

/// Where the client stands with respect to activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivationState {
    /// No license record on this machine.
    NotActivated,
    /// Record present and bound to this machine.
    ActivatedValid,
    /// Record present but bound to another machine.
    ActivatedWrongMachine,
    /// Record present but unreadable.
    Corrupt,
}

impl ActivationState {
    /// Returns true if the application may proceed.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::ActivatedValid)
    }

    /// Returns true if the user must go through activation.
    #[must_use]
    pub fn requires_activation(&self) -> bool {
        !self.is_valid()
    }

    /// User-facing description of the state.
    #[must_use]
    pub fn message(&self) -> &'static str {
        match self {
            Self::NotActivated => "La aplicación no está activada",
            Self::ActivatedValid => "Licencia válida",
            Self::ActivatedWrongMachine => "Esta licencia está vinculada a otro equipo",
            Self::Corrupt => "Archivo de licencia corrupto",
        }
    }
}

/// Result of the startup check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartupCheck {
    pub state: ActivationState,
    pub message: String,
    pub requires_activation: bool,
}

impl StartupCheck {
    fn from_state(state: ActivationState) -> Self {
        Self {
            state,
            message: state.message().to_string(),
            requires_activation: state.requires_activation(),
        }
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.state.is_valid()
    }

    /// `(is_valid, message, requires_activation)`
    #[must_use]
    pub fn as_tuple(&self) -> (bool, &str, bool) {
        (self.is_valid(), &self.message, self.requires_activation)
    }
}

/// Message shown after a successful activation.
pub const ACTIVATION_SUCCESS_MESSAGE: &str = "Licencia activada correctamente";

/// User-facing text for an activation failure.
#[must_use]
pub fn activation_failure_message(err: &LicenseError) -> String {
    match err {
        LicenseError::InvalidCodeFormat(_) => "Código de licencia inválido".to_string(),
        LicenseError::FingerprintMismatch => {
            "El código de licencia no es válido para este equipo".to_string()
        }
        LicenseError::StoreWriteFailure(reason) => {
            format!("Error al guardar la licencia: {reason}")
        }
        other => format!("El código de licencia no es válido: {other}"),
    }
}

/// Client-side license service.
pub struct LicenseManager {
    config: LicensingConfig,
    codec: ObfuscationCodec,
    store: LicenseStore,
    probe: Box<dyn HardwareProbe>,
    fingerprint: OnceCell<HardwareFingerprint>,
}

impl LicenseManager {
    /// Creates a manager that fingerprints the running machine.
    #[must_use]
    pub fn new(config: LicensingConfig) -> Self {
        Self::with_probe(config, SystemProbe)
    }

    /// Creates a manager with a custom hardware probe.
    #[must_use]
    pub fn with_probe(config: LicensingConfig, probe: impl HardwareProbe + 'static) -> Self {
        let codec = ObfuscationCodec::new(config.master_secret());
        let store = LicenseStore::new(config.license_path(), codec.clone());
        Self {
            config,
            codec,
            store,
            probe: Box::new(probe),
            fingerprint: OnceCell::new(),
        }
    }

    #[must_use]
    pub fn config(&self) -> &LicensingConfig {
        &self.config
    }

    #[must_use]
    pub fn store(&self) -> &LicenseStore {
        &self.store
    }

    /// Fingerprint of this machine, computed once per manager.
    pub fn current_fingerprint(&self) -> &HardwareFingerprint {
        self.fingerprint
            .get_or_init(|| HardwareFingerprint::from_probe(self.probe.as_ref()))
    }

    /// Fingerprint grouped for display to the user.
    #[must_use]
    pub fn get_formatted_hwid(&self) -> String {
        self.current_fingerprint().formatted()
    }

    /// Loads the stored record and checks it belongs to this machine.
    ///
    /// # Errors
    ///
    /// [`LicenseError::MissingRecord`], [`LicenseError::CorruptRecord`] or
    /// [`LicenseError::FingerprintMismatch`].
    pub fn check(&self) -> LicenseResult<LicenseRecord> {
        let record = self.store.read()?;
        if record.hwid != self.current_fingerprint().as_str() {
            return Err(LicenseError::FingerprintMismatch);
        }
        Ok(record)
    }

    /// Decides whether the application may start.
    #[must_use]
    pub fn validate_on_startup(&self) -> StartupCheck {
        let state = match self.check() {
            Ok(_) => ActivationState::ActivatedValid,
            Err(LicenseError::MissingRecord) => ActivationState::NotActivated,
            Err(LicenseError::FingerprintMismatch) => ActivationState::ActivatedWrongMachine,
            Err(e) => {
                warn!(error = %e, "Stored license could not be read");
                ActivationState::Corrupt
            }
        };
        info!(state = ?state, "Startup license check");
        StartupCheck::from_state(state)
    }

    /// Returns true if a valid record for this machine is stored.
    #[must_use]
    pub fn is_activated(&self) -> bool {
        self.check().is_ok()
    }

    /// Validates `code` against this machine and persists a new record.
    ///
    /// # Errors
    ///
    /// [`LicenseError::InvalidCodeFormat`] for empty or short codes,
    /// [`LicenseError::FingerprintMismatch`] when the code was issued for a
    /// different machine or product, [`LicenseError::StoreWriteFailure`] when
    /// the record cannot be saved. The store is untouched on every error.
    pub fn activate(&self, code: &str) -> LicenseResult<LicenseRecord> {
        let code = LicenseCode::parse(code)?;
        let hwid = self.current_fingerprint();

        if let Err(e) = code.verify(hwid, self.config.product_name(), &self.codec) {
            warn!(hwid = %hwid, "License code rejected for this machine");
            return Err(e);
        }

        let record = LicenseRecord {
            hwid: hwid.as_str().to_string(),
            license_code: code.as_str().to_string(),
            activation_date: chrono::Local::now().naive_local(),
            app_version: self.config.app_version().to_string(),
        };
        self.store.write(&record)?;

        info!(hwid = %hwid, "License activated");
        Ok(record)
    }

    /// Returns the stored record, if it can be read.
    #[must_use]
    pub fn get_license_info(&self) -> Option<LicenseRecord> {
        self.store.read().ok()
    }

    /// Removes the stored record. Idempotent.
    pub fn deactivate(&self) -> bool {
        self.store.delete()
    }
}

impl std::fmt::Debug for LicenseManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LicenseManager")
            .field("config", &self.config)
            .field("store", &self.store)
            .finish_non_exhaustive()
    }
}
