//! Reversible obfuscation of license data at rest.
//!
//! A 32-byte working key is derived with SHA-256 from the master secret and
//! XORed over the plaintext (repeating), then the result is base64-encoded.
//! XOR is self-inverse, so decoding is base64-decode followed by the same XOR.
//!
//! This is obfuscation, not encryption: the key is compiled into the client
//! and there is no integrity check.

use crate::error::{LicenseError, LicenseResult};
use base64::{Engine, engine::general_purpose::STANDARD};
use sha2::{Digest, Sha256};

/// Size of the derived working key in bytes.
pub const WORKING_KEY_SIZE: usize = 32;

/// XOR codec keyed by a master secret.
#[derive(Clone)]
pub struct ObfuscationCodec {
    key: [u8; WORKING_KEY_SIZE],
}

impl ObfuscationCodec {
    /// Creates a codec whose working key is `SHA-256(master_secret)`.
    #[must_use]
    pub fn new(master_secret: &[u8]) -> Self {
        Self {
            key: derive_working_key(master_secret),
        }
    }

    /// Obfuscates `plaintext` and returns standard base64 text.
    #[must_use]
    pub fn encode(&self, plaintext: &[u8]) -> String {
        STANDARD.encode(self.xor(plaintext))
    }

    /// Reverses [`encode`](Self::encode).
    ///
    /// # Errors
    ///
    /// Returns [`LicenseError::Decode`] when `text` is not valid base64.
    pub fn decode(&self, text: &str) -> LicenseResult<Vec<u8>> {
        let bytes = STANDARD
            .decode(text.trim())
            .map_err(|e| LicenseError::Decode(format!("invalid base64: {e}")))?;
        Ok(self.xor(&bytes))
    }

    /// Obfuscates a UTF-8 string.
    #[must_use]
    pub fn encode_str(&self, plaintext: &str) -> String {
        self.encode(plaintext.as_bytes())
    }

    /// Decodes text produced by [`encode_str`](Self::encode_str).
    pub fn decode_str(&self, text: &str) -> LicenseResult<String> {
        let bytes = self.decode(text)?;
        String::from_utf8(bytes).map_err(|e| LicenseError::Decode(format!("invalid UTF-8: {e}")))
    }

    fn xor(&self, data: &[u8]) -> Vec<u8> {
        data.iter()
            .zip(self.key.iter().cycle())
            .map(|(byte, k)| byte ^ k)
            .collect()
    }
}

impl std::fmt::Debug for ObfuscationCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObfuscationCodec")
            .field("key", &"[REDACTED]")
            .finish()
    }
}

/// Derives the 32-byte working key from a master secret.
#[must_use]
pub fn derive_working_key(master_secret: &[u8]) -> [u8; WORKING_KEY_SIZE] {
    Sha256::digest(master_secret).into()
}

/// Obfuscates `plaintext` with the working key derived from `master_secret`.
#[must_use]
pub fn encode(plaintext: &[u8], master_secret: &[u8]) -> String {
    ObfuscationCodec::new(master_secret).encode(plaintext)
}

/// Reverses [`encode`] for the same `master_secret`.
pub fn decode(text: &str, master_secret: &[u8]) -> LicenseResult<Vec<u8>> {
    ObfuscationCodec::new(master_secret).decode(text)
}
