//! Licensing and activation for Gestión Comercial.
//!
//! This crate handles:
//! - Hardware fingerprinting for machine binding
//! - Reversible obfuscation of license data at rest
//! - License code formatting and verification
//! - The on-disk license record and the startup activation gate
//! - Offline issuance of codes with an operator ledger
//!
//! # Activation Flow
//!
//! 1. The client shows its fingerprint (`XXXX-XXXX-...`) on the activation screen.
//! 2. The operator runs the issuer with that fingerprint and sends back a code.
//! 3. The client verifies the code against its own fingerprint and stores a record.
//! 4. Every later launch compares the stored fingerprint with the current one.
//!
//! The scheme is obfuscation plus client-side checks. It keeps honest users
//! honest and is not a trust boundary.

mod activation;
mod code;
mod codec;
mod config;
mod error;
mod hardware;
mod issuer;
mod ledger;
mod store;

pub use activation::{
    ACTIVATION_SUCCESS_MESSAGE, ActivationState, LicenseManager, StartupCheck,
    activation_failure_message,
};
pub use code::{
    BLOCK_LEN, CODE_CHARS, LicenseCode, LicensePayload, MIN_CODE_CHARS, PAYLOAD_VERSION,
    PERPETUAL_VALIDITY_DAYS, format_code, unformat_code,
};
pub use codec::{ObfuscationCodec, WORKING_KEY_SIZE, decode, derive_working_key, encode};
pub use config::{
    DEFAULT_APP_VERSION, DEFAULT_MASTER_SECRET, DEFAULT_PRODUCT_NAME, LICENSE_DIR_NAME,
    LICENSE_FILE_NAME, LicensingConfig,
};
pub use error::{LicenseError, LicenseResult};
pub use hardware::{
    DeviceInfo, FINGERPRINT_LEN, HardwareFingerprint, HardwareProbe, SystemProbe, UNKNOWN_CPU,
    UNKNOWN_DISK, UNKNOWN_MACHINE_GUID, UNKNOWN_MOTHERBOARD,
};
pub use issuer::{CustomerDetails, LicenseIssuer};
pub use ledger::{DEFAULT_LEDGER_FILE, LedgerEntry, LicenseLedger, STATUS_ACTIVE};
pub use store::{LicenseRecord, LicenseStore};
