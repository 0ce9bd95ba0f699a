//! Error types for the licensing module.

use thiserror::Error;

/// Licensing-specific errors.
#[derive(Debug, Error)]
pub enum LicenseError {
    /// No license record has been stored on this machine.
    #[error("no license record found")]
    MissingRecord,

    /// The stored record could not be de-obfuscated or parsed.
    #[error("license record is corrupt: {0}")]
    CorruptRecord(String),

    /// The record or code belongs to a different machine.
    #[error("license is bound to a different machine")]
    FingerprintMismatch,

    /// The submitted code is empty or too short.
    #[error("invalid license code format: {0}")]
    InvalidCodeFormat(String),

    /// Writing the license record failed.
    #[error("could not store license: {0}")]
    StoreWriteFailure(String),

    /// Operator input rejected by the issuer.
    #[error("validation error: {0}")]
    Validation(String),

    /// Obfuscated text is not valid base64 (or not valid UTF-8 once decoded).
    #[error("decode error: {0}")]
    Decode(String),

    /// Reading or writing the issuance ledger failed.
    #[error("ledger error: {0}")]
    Ledger(String),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl LicenseError {
    /// Returns true if this outcome should send the user to the activation flow
    /// rather than being reported as a hard failure.
    #[must_use]
    pub fn requires_activation(&self) -> bool {
        matches!(
            self,
            Self::MissingRecord | Self::CorruptRecord(_) | Self::FingerprintMismatch
        )
    }
}

/// Result type for license operations.
pub type LicenseResult<T> = Result<T, LicenseError>;
