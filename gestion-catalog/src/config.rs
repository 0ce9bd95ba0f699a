//! Catalog configuration.

use crate::database::DEFAULT_DB_FOLDER;
use std::path::{Path, PathBuf};

/// Where the product spreadsheet is looked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogConfig {
    folder: PathBuf,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            folder: PathBuf::from(DEFAULT_DB_FOLDER),
        }
    }
}

impl CatalogConfig {
    #[must_use]
    pub fn with_folder(mut self, folder: impl Into<PathBuf>) -> Self {
        self.folder = folder.into();
        self
    }

    #[must_use]
    pub fn folder(&self) -> &Path {
        &self.folder
    }
}
