//! On-disk license record.
//!
//! The record is JSON, obfuscated with the [`ObfuscationCodec`], written as a
//! single text file. Writes go to a sibling temp file that is renamed over the
//! target, so a failed write leaves the previous state untouched.

use crate::codec::ObfuscationCodec;
use crate::error::{LicenseError, LicenseResult};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Proof of activation persisted on the client machine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicenseRecord {
    /// Fingerprint the activation was performed on.
    pub hwid: String,
    /// The code the user submitted.
    pub license_code: String,
    /// When activation happened (local time).
    pub activation_date: NaiveDateTime,
    /// Application version at activation time.
    pub app_version: String,
}

/// Reads and writes the single license record.
#[derive(Debug, Clone)]
pub struct LicenseStore {
    path: PathBuf,
    codec: ObfuscationCodec,
}

impl LicenseStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, codec: ObfuscationCodec) -> Self {
        Self {
            path: path.into(),
            codec,
        }
    }

    /// Location of the license file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns true if a license file is present (valid or not).
    #[must_use]
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Persists `record`, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns [`LicenseError::StoreWriteFailure`] if the directory cannot be
    /// created or the file cannot be written.
    pub fn write(&self, record: &LicenseRecord) -> LicenseResult<()> {
        let json = serde_json::to_string_pretty(record)?;
        let sealed = self.codec.encode_str(&json);

        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|e| {
                LicenseError::StoreWriteFailure(format!("{}: {e}", dir.display()))
            })?;
        }

        let tmp = self.path.with_extension("tmp");
        let result = fs::write(&tmp, sealed).and_then(|()| fs::rename(&tmp, &self.path));
        if let Err(e) = result {
            let _ = fs::remove_file(&tmp);
            return Err(LicenseError::StoreWriteFailure(format!(
                "{}: {e}",
                self.path.display()
            )));
        }

        info!(path = %self.path.display(), "License record written");
        Ok(())
    }

    /// Loads the stored record.
    ///
    /// # Errors
    ///
    /// [`LicenseError::MissingRecord`] when there is no file,
    /// [`LicenseError::CorruptRecord`] when it cannot be read, decoded or parsed.
    pub fn read(&self) -> LicenseResult<LicenseRecord> {
        let sealed = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Err(LicenseError::MissingRecord),
            Err(e) => return Err(LicenseError::CorruptRecord(e.to_string())),
        };

        let json = self
            .codec
            .decode_str(&sealed)
            .map_err(|e| LicenseError::CorruptRecord(e.to_string()))?;
        serde_json::from_str(&json).map_err(|e| LicenseError::CorruptRecord(e.to_string()))
    }

    /// Removes the license file. Returns true if a file was removed.
    ///
    /// Safe to call when nothing is stored.
    pub fn delete(&self) -> bool {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                info!(path = %self.path.display(), "License record deleted");
                true
            }
            Err(e) => {
                debug!(path = %self.path.display(), error = %e, "Nothing deleted");
                false
            }
        }
    }
}
