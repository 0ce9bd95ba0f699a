//! Operator-side ledger of issued license codes.
//!
//! A JSON document `{ "licenses": [...], "created": ... }`. Entries are only
//! ever appended; the ledger is used for support lookups and is never
//! consulted by the client.

use crate::error::{LicenseError, LicenseResult};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Default ledger location, relative to the working directory.
pub const DEFAULT_LEDGER_FILE: &str = "licenses_database.json";

/// Status recorded for newly issued codes.
pub const STATUS_ACTIVE: &str = "active";

/// One issued license.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub hwid: String,
    pub license_code: String,
    #[serde(default)]
    pub customer_name: String,
    #[serde(default)]
    pub customer_email: String,
    #[serde(default)]
    pub notes: String,
    pub generated_date: NaiveDateTime,
    pub status: String,
    /// Obfuscated payload as issued, for support decoding.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<String>,
}

impl LedgerEntry {
    /// Case-insensitive substring match on name, email or fingerprint.
    #[must_use]
    pub fn matches(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        self.customer_name.to_lowercase().contains(&term)
            || self.customer_email.to_lowercase().contains(&term)
            || self.hwid.to_lowercase().contains(&term)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LedgerDocument {
    licenses: Vec<LedgerEntry>,
    created: NaiveDateTime,
}

/// The ledger file and its in-memory contents.
#[derive(Debug, Clone)]
pub struct LicenseLedger {
    path: PathBuf,
    doc: LedgerDocument,
}

impl LicenseLedger {
    /// Loads the ledger at `path`, starting an empty one if the file is absent.
    ///
    /// # Errors
    ///
    /// Returns [`LicenseError::Ledger`] if the file exists but cannot be read
    /// or parsed.
    pub fn open(path: impl Into<PathBuf>) -> LicenseResult<Self> {
        let path = path.into();
        let doc = match fs::read_to_string(&path) {
            Ok(text) => serde_json::from_str(&text)
                .map_err(|e| LicenseError::Ledger(format!("{}: {e}", path.display())))?,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "Starting new ledger");
                LedgerDocument {
                    licenses: Vec::new(),
                    created: chrono::Local::now().naive_local(),
                }
            }
            Err(e) => return Err(LicenseError::Ledger(format!("{}: {e}", path.display()))),
        };
        Ok(Self { path, doc })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// When the ledger was first created.
    #[must_use]
    pub fn created(&self) -> NaiveDateTime {
        self.doc.created
    }

    /// All entries in issuance order.
    #[must_use]
    pub fn entries(&self) -> &[LedgerEntry] {
        &self.doc.licenses
    }

    /// Entries matching `term`, in issuance order.
    #[must_use]
    pub fn search(&self, term: &str) -> Vec<&LedgerEntry> {
        self.doc.licenses.iter().filter(|e| e.matches(term)).collect()
    }

    /// Appends `entry` and persists the ledger.
    ///
    /// On a failed save the entry is dropped again, so memory and disk agree.
    ///
    /// # Errors
    ///
    /// [`LicenseError::Ledger`] when the file cannot be written.
    pub fn append(&mut self, entry: LedgerEntry) -> LicenseResult<()> {
        self.doc.licenses.push(entry);
        if let Err(e) = self.save() {
            self.doc.licenses.pop();
            return Err(e);
        }
        info!(path = %self.path.display(), total = self.doc.licenses.len(), "Ledger updated");
        Ok(())
    }

    fn save(&self) -> LicenseResult<()> {
        let json = serde_json::to_string_pretty(&self.doc)?;
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)
                .map_err(|e| LicenseError::Ledger(format!("{}: {e}", dir.display())))?;
        }

        // Earlier entries survive an interrupted save: the old file is only
        // replaced by the rename.
        let tmp = self.path.with_extension("tmp");
        let result = fs::write(&tmp, json).and_then(|()| fs::rename(&tmp, &self.path));
        if let Err(e) = result {
            let _ = fs::remove_file(&tmp);
            return Err(LicenseError::Ledger(format!("{}: {e}", self.path.display())));
        }
        Ok(())
    }
}
