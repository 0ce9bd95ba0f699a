//! License payloads and human-transcribable license codes.
//!
//! Codes use the format `XXXXX-XXXXX-XXXXX-XXXXX`: the obfuscated base64 text
//! with `=`, `+` and `/` removed, cut to 20 characters and grouped in fives.
//!
//! Twenty characters cannot carry a whole [`LicensePayload`], so the code is
//! computed over a binding digest, `SHA-256(hwid | product)`. A client proves
//! a code was issued for it by recomputing the binding for its own
//! fingerprint and comparing. The full payload travels in the issuer ledger.

use crate::codec::ObfuscationCodec;
use crate::error::{LicenseError, LicenseResult};
use crate::hardware::HardwareFingerprint;
use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Characters retained from the cleaned obfuscated text.
pub const CODE_CHARS: usize = 20;

/// Characters per dash-separated block.
pub const BLOCK_LEN: usize = 5;

/// Submitted codes with fewer meaningful characters are rejected outright.
pub const MIN_CODE_CHARS: usize = 10;

/// Validity used for perpetual licenses (100 years).
pub const PERPETUAL_VALIDITY_DAYS: u32 = 36_500;

/// Payload schema version.
pub const PAYLOAD_VERSION: &str = "1.0";

/// The structured content of an issued license.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicensePayload {
    /// Fingerprint of the licensed machine.
    pub hwid: String,
    /// Product the license is for.
    pub product: String,
    /// When the license was issued (local time).
    pub issued_date: NaiveDateTime,
    /// Validity window in days.
    pub validity_days: u32,
    /// Payload schema version.
    pub version: String,
}

impl LicensePayload {
    /// Creates a payload issued now.
    #[must_use]
    pub fn new(hwid: &HardwareFingerprint, product: &str, validity_days: u32) -> Self {
        Self {
            hwid: hwid.as_str().to_string(),
            product: product.to_string(),
            issued_date: chrono::Local::now().naive_local(),
            validity_days,
            version: PAYLOAD_VERSION.to_string(),
        }
    }

    /// Returns the moment the validity window closes.
    ///
    /// `None` when the window reaches past the representable calendar, which
    /// means the license never expires.
    #[must_use]
    pub fn expires_at(&self) -> Option<NaiveDateTime> {
        Duration::try_days(i64::from(self.validity_days))
            .and_then(|window| self.issued_date.checked_add_signed(window))
    }

    /// Returns true if the validity window has closed at `now`.
    #[must_use]
    pub fn is_expired_at(&self, now: NaiveDateTime) -> bool {
        self.expires_at().is_some_and(|end| now >= end)
    }

    /// Serializes and obfuscates the payload.
    pub fn seal(&self, codec: &ObfuscationCodec) -> LicenseResult<String> {
        let json = serde_json::to_string(self)?;
        Ok(codec.encode_str(&json))
    }

    /// Reverses [`seal`](Self::seal).
    pub fn open(sealed: &str, codec: &ObfuscationCodec) -> LicenseResult<Self> {
        let json = codec.decode_str(sealed)?;
        Ok(serde_json::from_str(&json)?)
    }
}

/// Turns raw obfuscated text into a grouped code.
///
/// Short input produces fewer or shorter blocks instead of failing.
#[must_use]
pub fn format_code(raw: &str) -> String {
    let clean: Vec<char> = raw
        .chars()
        .filter(|c| !matches!(c, '=' | '+' | '/'))
        .take(CODE_CHARS)
        .collect();

    clean
        .chunks(BLOCK_LEN)
        .map(|block| block.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join("-")
}

/// Removes grouping dashes (and stray whitespace) from a code.
#[must_use]
pub fn unformat_code(code: &str) -> String {
    code.chars()
        .filter(|c| *c != '-' && !c.is_whitespace())
        .collect()
}

/// Digest binding a license to one machine and product.
fn binding_digest(hwid: &HardwareFingerprint, product: &str) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(hwid.as_str().as_bytes());
    hasher.update(b"|");
    hasher.update(product.as_bytes());
    hasher.finalize().into()
}

/// A license code as issued to, or typed by, a customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LicenseCode(String);

impl LicenseCode {
    /// Computes the code that activates `product` on the machine `hwid`.
    #[must_use]
    pub fn issue(hwid: &HardwareFingerprint, product: &str, codec: &ObfuscationCodec) -> Self {
        let raw = codec.encode(&binding_digest(hwid, product));
        Self(format_code(&raw))
    }

    /// Parses a submitted code, checking only its shape.
    ///
    /// # Errors
    ///
    /// Returns [`LicenseError::InvalidCodeFormat`] for empty input or input
    /// with fewer than [`MIN_CODE_CHARS`] characters once dashes are removed.
    pub fn parse(input: &str) -> LicenseResult<Self> {
        let trimmed = input.trim();
        let meaningful = unformat_code(trimmed).chars().count();
        if meaningful == 0 {
            return Err(LicenseError::InvalidCodeFormat("code is empty".to_string()));
        }
        if meaningful < MIN_CODE_CHARS {
            return Err(LicenseError::InvalidCodeFormat(format!(
                "code has {meaningful} characters, at least {MIN_CODE_CHARS} required"
            )));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Checks that this code was issued for `hwid` and `product`.
    ///
    /// # Errors
    ///
    /// Returns [`LicenseError::FingerprintMismatch`] otherwise.
    pub fn verify(
        &self,
        hwid: &HardwareFingerprint,
        product: &str,
        codec: &ObfuscationCodec,
    ) -> LicenseResult<()> {
        let expected = Self::issue(hwid, product, codec);
        if unformat_code(&self.0) == unformat_code(&expected.0) {
            Ok(())
        } else {
            Err(LicenseError::FingerprintMismatch)
        }
    }

    /// Returns the code as text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LicenseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binding_depends_on_product() {
        let hwid = HardwareFingerprint::parse("ABCD1234EFAB5678ABCD9012ABCD3456").unwrap();
        assert_ne!(binding_digest(&hwid, "A"), binding_digest(&hwid, "B"));
    }
}
