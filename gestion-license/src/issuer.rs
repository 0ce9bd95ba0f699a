//! Offline license issuer (operator tool).
//!
//! The customer reads their fingerprint off the activation screen and sends
//! it out-of-band; the operator issues a code for it here and the issuance is
//! appended to the [`LicenseLedger`].

use crate::code::{LicenseCode, LicensePayload, PERPETUAL_VALIDITY_DAYS};
use crate::codec::ObfuscationCodec;
use crate::config::LicensingConfig;
use crate::error::LicenseResult;
use crate::hardware::HardwareFingerprint;
use crate::ledger::{LedgerEntry, LicenseLedger, STATUS_ACTIVE};
use std::path::PathBuf;
use tracing::info;

/// Optional customer details stored alongside an issued code.
#[derive(Debug, Clone, Default)]
pub struct CustomerDetails {
    pub name: String,
    pub email: String,
    pub notes: String,
}

/// Issues codes and keeps the ledger.
#[derive(Debug)]
pub struct LicenseIssuer {
    config: LicensingConfig,
    codec: ObfuscationCodec,
    ledger: LicenseLedger,
    validity_days: u32,
}

impl LicenseIssuer {
    /// Opens the issuer with the ledger at `ledger_path`.
    pub fn open(config: LicensingConfig, ledger_path: impl Into<PathBuf>) -> LicenseResult<Self> {
        let codec = ObfuscationCodec::new(config.master_secret());
        let ledger = LicenseLedger::open(ledger_path)?;
        Ok(Self {
            config,
            codec,
            ledger,
            validity_days: PERPETUAL_VALIDITY_DAYS,
        })
    }

    /// Overrides the validity window written into new payloads.
    #[must_use]
    pub fn with_validity_days(mut self, days: u32) -> Self {
        self.validity_days = days;
        self
    }

    /// Issues a code for the fingerprint typed by the operator.
    ///
    /// # Errors
    ///
    /// [`LicenseError::Validation`](crate::LicenseError::Validation) when the
    /// fingerprint is not 32 hex characters once dashes are removed;
    /// [`LicenseError::Ledger`](crate::LicenseError::Ledger) when the ledger
    /// cannot be saved.
    pub fn issue(&mut self, hwid: &str, customer: CustomerDetails) -> LicenseResult<LicenseCode> {
        let hwid = HardwareFingerprint::parse(hwid)?;
        let product = self.config.product_name();

        let payload = LicensePayload::new(&hwid, product, self.validity_days);
        let sealed = payload.seal(&self.codec)?;
        let code = LicenseCode::issue(&hwid, product, &self.codec);

        self.ledger.append(LedgerEntry {
            hwid: hwid.as_str().to_string(),
            license_code: code.as_str().to_string(),
            customer_name: customer.name,
            customer_email: customer.email,
            notes: customer.notes,
            generated_date: payload.issued_date,
            status: STATUS_ACTIVE.to_string(),
            payload: Some(sealed),
        })?;

        info!(hwid = %hwid, "License issued");
        Ok(code)
    }

    /// All issued licenses.
    #[must_use]
    pub fn list(&self) -> &[LedgerEntry] {
        self.ledger.entries()
    }

    /// Issued licenses whose name, email or fingerprint contains `term`.
    #[must_use]
    pub fn search(&self, term: &str) -> Vec<&LedgerEntry> {
        self.ledger.search(term)
    }

    /// Decodes the payload stored with a ledger entry.
    pub fn decode_payload(&self, sealed: &str) -> LicenseResult<LicensePayload> {
        LicensePayload::open(sealed, &self.codec)
    }

    #[must_use]
    pub fn ledger(&self) -> &LicenseLedger {
        &self.ledger
    }
}
