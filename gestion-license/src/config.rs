//! Licensing configuration.
//!
//! Everything the licensing services need from the outside world (master
//! secret, where the license file lives, product identity) is carried by a
//! [`LicensingConfig`] value so tests can point it at temporary directories.

use std::path::{Path, PathBuf};

/// Master secret compiled into released builds.
pub const DEFAULT_MASTER_SECRET: &[u8] = b"GestionComercial2024SecretKey!@#";

/// Product name embedded in issued payloads and code bindings.
pub const DEFAULT_PRODUCT_NAME: &str = "GestionComercial";

/// Application version recorded on activation.
pub const DEFAULT_APP_VERSION: &str = "1.0";

/// Per-user folder holding the license file.
pub const LICENSE_DIR_NAME: &str = "GestionComercial";

/// License file name inside [`LICENSE_DIR_NAME`].
pub const LICENSE_FILE_NAME: &str = "license.dat";

/// Configuration shared by the client-side manager and the offline issuer.
#[derive(Debug, Clone)]
pub struct LicensingConfig {
    master_secret: Vec<u8>,
    license_path: PathBuf,
    product_name: String,
    app_version: String,
}

impl Default for LicensingConfig {
    fn default() -> Self {
        let base = dirs::data_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."));
        Self {
            master_secret: DEFAULT_MASTER_SECRET.to_vec(),
            license_path: base.join(LICENSE_DIR_NAME).join(LICENSE_FILE_NAME),
            product_name: DEFAULT_PRODUCT_NAME.to_string(),
            app_version: DEFAULT_APP_VERSION.to_string(),
        }
    }
}

impl LicensingConfig {
    /// Default configuration with the license file placed in `dir`.
    #[must_use]
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::default().with_license_path(dir.as_ref().join(LICENSE_FILE_NAME))
    }

    #[must_use]
    pub fn with_license_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.license_path = path.into();
        self
    }

    #[must_use]
    pub fn with_master_secret(mut self, secret: impl Into<Vec<u8>>) -> Self {
        self.master_secret = secret.into();
        self
    }

    #[must_use]
    pub fn with_product_name(mut self, name: impl Into<String>) -> Self {
        self.product_name = name.into();
        self
    }

    #[must_use]
    pub fn with_app_version(mut self, version: impl Into<String>) -> Self {
        self.app_version = version.into();
        self
    }

    #[must_use]
    pub fn master_secret(&self) -> &[u8] {
        &self.master_secret
    }

    #[must_use]
    pub fn license_path(&self) -> &Path {
        &self.license_path
    }

    #[must_use]
    pub fn product_name(&self) -> &str {
        &self.product_name
    }

    #[must_use]
    pub fn app_version(&self) -> &str {
        &self.app_version
    }
}
