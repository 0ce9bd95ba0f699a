#![allow(dead_code)]

use gestion_license::{
    HardwareProbe, LicenseCode, LicenseManager, LicensingConfig, ObfuscationCodec,
};
use std::path::Path;

/// Probe reporting a fixed machine.
pub struct FixedProbe(pub &'static str);

impl HardwareProbe for FixedProbe {
    fn cpu_id(&self) -> Option<String> {
        Some(format!("cpu-{}", self.0))
    }
    fn motherboard_id(&self) -> Option<String> {
        Some(format!("mb-{}", self.0))
    }
    fn machine_guid(&self) -> Option<String> {
        Some(format!("guid-{}", self.0))
    }
    fn disk_serial(&self) -> Option<String> {
        Some(format!("disk-{}", self.0))
    }
}

pub fn manager(dir: &Path, machine: &'static str) -> LicenseManager {
    LicenseManager::with_probe(LicensingConfig::in_dir(dir), FixedProbe(machine))
}

/// The code an operator would issue for `manager`'s machine.
pub fn code_for(manager: &LicenseManager) -> String {
    let config = manager.config();
    let codec = ObfuscationCodec::new(config.master_secret());
    LicenseCode::issue(manager.current_fingerprint(), config.product_name(), &codec)
        .as_str()
        .to_string()
}
