//! Shared test helpers for license tests.

#![allow(dead_code)]

use gestion_license::{HardwareFingerprint, HardwareProbe, LicenseManager, LicensingConfig};
use tempfile::TempDir;

/// Probe reporting fixed identifiers.
#[derive(Debug, Clone, Default)]
pub struct FakeProbe {
    pub cpu: Option<String>,
    pub motherboard: Option<String>,
    pub guid: Option<String>,
    pub disk: Option<String>,
}

impl FakeProbe {
    /// A probe with every identifier present.
    pub fn machine(tag: &str) -> Self {
        Self {
            cpu: Some(format!("CPU-{tag}")),
            motherboard: Some(format!("MB-{tag}")),
            guid: Some(format!("GUID-{tag}")),
            disk: Some(format!("DISK-{tag}")),
        }
    }

    /// A probe where nothing is available.
    pub fn empty() -> Self {
        Self::default()
    }
}

impl HardwareProbe for FakeProbe {
    fn cpu_id(&self) -> Option<String> {
        self.cpu.clone()
    }
    fn motherboard_id(&self) -> Option<String> {
        self.motherboard.clone()
    }
    fn machine_guid(&self) -> Option<String> {
        self.guid.clone()
    }
    fn disk_serial(&self) -> Option<String> {
        self.disk.clone()
    }
}

/// Config whose license file lives inside `dir`.
pub fn test_config(dir: &TempDir) -> LicensingConfig {
    LicensingConfig::in_dir(dir.path().join("GestionComercial"))
}

/// Manager for machine `tag` with its store in `dir`.
pub fn manager_for(dir: &TempDir, tag: &str) -> LicenseManager {
    LicenseManager::with_probe(test_config(dir), FakeProbe::machine(tag))
}

/// Fingerprint that [`FakeProbe::machine`] produces for `tag`.
pub fn fingerprint_for(tag: &str) -> HardwareFingerprint {
    HardwareFingerprint::from_probe(&FakeProbe::machine(tag))
}
