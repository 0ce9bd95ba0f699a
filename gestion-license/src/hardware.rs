//! Hardware fingerprinting for license binding.
//!
//! Generates a stable machine fingerprint from CPU, motherboard, OS install
//! and primary disk identifiers. Each identifier is best-effort: when the
//! platform refuses to report one, a fixed sentinel takes its place so the
//! fingerprint is still produced (less unique, but stable).

use crate::error::{LicenseError, LicenseResult};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::env;
use std::fmt;
use std::process::Command;

/// Sentinel used when the CPU identifier is unavailable.
pub const UNKNOWN_CPU: &str = "UNKNOWN_CPU";
/// Sentinel used when the motherboard serial is unavailable.
pub const UNKNOWN_MOTHERBOARD: &str = "UNKNOWN_MB";
/// Sentinel used when the OS machine GUID is unavailable.
pub const UNKNOWN_MACHINE_GUID: &str = "UNKNOWN_GUID";
/// Sentinel used when the disk serial is unavailable.
pub const UNKNOWN_DISK: &str = "UNKNOWN_DISK";

/// Number of hex characters in a fingerprint.
pub const FINGERPRINT_LEN: usize = 32;

/// Source of raw hardware identifiers.
///
/// Every method is best-effort; `None` means "not available on this machine".
pub trait HardwareProbe {
    fn cpu_id(&self) -> Option<String>;
    fn motherboard_id(&self) -> Option<String>;
    fn machine_guid(&self) -> Option<String>;
    fn disk_serial(&self) -> Option<String>;
}

/// A stable fingerprint that identifies this machine.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HardwareFingerprint(String);

impl HardwareFingerprint {
    /// Generates the fingerprint of the current machine.
    #[must_use]
    pub fn generate() -> Self {
        Self::from_probe(&SystemProbe)
    }

    /// Computes a fingerprint from the identifiers reported by `probe`.
    #[must_use]
    pub fn from_probe(probe: &dyn HardwareProbe) -> Self {
        let components = [
            probe.cpu_id().unwrap_or_else(|| UNKNOWN_CPU.to_string()),
            probe
                .motherboard_id()
                .unwrap_or_else(|| UNKNOWN_MOTHERBOARD.to_string()),
            probe
                .machine_guid()
                .unwrap_or_else(|| UNKNOWN_MACHINE_GUID.to_string()),
            probe.disk_serial().unwrap_or_else(|| UNKNOWN_DISK.to_string()),
        ];
        Self::from_components(&components)
    }

    fn from_components(components: &[String]) -> Self {
        let combined = components.join("|");

        let mut hasher = Sha256::new();
        hasher.update(combined.as_bytes());
        let hash = hasher.finalize();

        // 16 bytes -> 32 hex characters
        let id = hash[..FINGERPRINT_LEN / 2]
            .iter()
            .map(|b| format!("{b:02X}"))
            .collect();
        Self(id)
    }

    /// Parses a fingerprint typed or pasted by a person.
    ///
    /// Dashes and whitespace are ignored and letters are uppercased.
    ///
    /// # Errors
    ///
    /// Returns [`LicenseError::Validation`] unless the cleaned input is
    /// exactly 32 hexadecimal characters.
    pub fn parse(input: &str) -> LicenseResult<Self> {
        let clean: String = input
            .chars()
            .filter(|c| *c != '-' && !c.is_whitespace())
            .collect::<String>()
            .to_uppercase();

        if clean.chars().count() != FINGERPRINT_LEN {
            return Err(LicenseError::Validation(format!(
                "HWID must have {FINGERPRINT_LEN} characters, got {}",
                clean.chars().count()
            )));
        }
        if !clean.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(LicenseError::Validation(
                "HWID must be hexadecimal".to_string(),
            ));
        }
        Ok(Self(clean))
    }

    /// Returns the raw 32-character fingerprint.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the fingerprint in blocks of four, e.g. `ABCD-1234-...`.
    #[must_use]
    pub fn formatted(&self) -> String {
        self.0
            .as_bytes()
            .chunks(4)
            .map(|chunk| String::from_utf8_lossy(chunk).into_owned())
            .collect::<Vec<_>>()
            .join("-")
    }
}

impl fmt::Display for HardwareFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Machine summary printed next to the fingerprint on the status screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceInfo {
    /// `linux`, `windows` or `macos`.
    pub os_name: String,
    pub os_version: String,
    pub hostname: String,
    pub arch: String,
}

impl DeviceInfo {
    #[must_use]
    pub fn collect() -> Self {
        Self {
            os_name: env::consts::OS.to_string(),
            os_version: os_version().unwrap_or_else(|| UNKNOWN_VALUE.to_string()),
            hostname: hostname::get()
                .ok()
                .and_then(|h| h.into_string().ok())
                .unwrap_or_else(|| UNKNOWN_VALUE.to_string()),
            arch: env::consts::ARCH.to_string(),
        }
    }
}

const UNKNOWN_VALUE: &str = "unknown";

/// Probe that queries the running operating system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemProbe;

impl HardwareProbe for SystemProbe {
    fn cpu_id(&self) -> Option<String> {
        #[cfg(target_os = "windows")]
        {
            command_output("wmic", &["cpu", "get", "ProcessorId"]).and_then(|o| wmic_value(&o))
        }

        #[cfg(target_os = "linux")]
        {
            let cpuinfo = std::fs::read_to_string("/proc/cpuinfo").ok()?;
            cpuinfo_field(&cpuinfo, "Serial").or_else(|| cpuinfo_field(&cpuinfo, "model name"))
        }

        #[cfg(target_os = "macos")]
        {
            command_output("sysctl", &["-n", "machdep.cpu.brand_string"])
        }

        #[cfg(not(any(target_os = "macos", target_os = "windows", target_os = "linux")))]
        {
            None
        }
    }

    fn motherboard_id(&self) -> Option<String> {
        #[cfg(target_os = "windows")]
        {
            command_output("wmic", &["baseboard", "get", "SerialNumber"])
                .and_then(|o| wmic_value(&o))
        }

        #[cfg(target_os = "linux")]
        {
            read_trimmed("/sys/class/dmi/id/board_serial")
                .or_else(|| read_trimmed("/sys/class/dmi/id/product_uuid"))
        }

        #[cfg(target_os = "macos")]
        {
            ioreg_platform_value("IOPlatformSerialNumber")
        }

        #[cfg(not(any(target_os = "macos", target_os = "windows", target_os = "linux")))]
        {
            None
        }
    }

    fn machine_guid(&self) -> Option<String> {
        #[cfg(target_os = "windows")]
        {
            command_output(
                "reg",
                &[
                    "query",
                    r"HKEY_LOCAL_MACHINE\SOFTWARE\Microsoft\Cryptography",
                    "/v",
                    "MachineGuid",
                ],
            )
            .and_then(|output| {
                output
                    .lines()
                    .find(|l| l.contains("MachineGuid"))
                    .and_then(|l| l.split_whitespace().nth(2))
                    .map(String::from)
            })
        }

        #[cfg(target_os = "linux")]
        {
            read_trimmed("/etc/machine-id").or_else(|| read_trimmed("/var/lib/dbus/machine-id"))
        }

        #[cfg(target_os = "macos")]
        {
            ioreg_platform_value("IOPlatformUUID")
        }

        #[cfg(not(any(target_os = "macos", target_os = "windows", target_os = "linux")))]
        {
            None
        }
    }

    fn disk_serial(&self) -> Option<String> {
        #[cfg(target_os = "windows")]
        {
            command_output("wmic", &["diskdrive", "get", "SerialNumber"])
                .and_then(|o| wmic_value(&o))
        }

        #[cfg(target_os = "linux")]
        {
            command_output("lsblk", &["-ndo", "SERIAL"]).and_then(|output| {
                output
                    .lines()
                    .map(str::trim)
                    .find(|l| !l.is_empty())
                    .map(String::from)
            })
        }

        #[cfg(not(any(target_os = "windows", target_os = "linux")))]
        {
            None
        }
    }
}

/// Runs a system utility and returns its trimmed stdout when it succeeds.
#[allow(dead_code)]
fn command_output(program: &str, args: &[&str]) -> Option<String> {
    let output = Command::new(program).args(args).output().ok()?;
    if !output.status.success() {
        tracing::debug!(program, "hardware query exited with failure");
        return None;
    }
    non_empty(String::from_utf8_lossy(&output.stdout).trim())
}

/// `wmic ... get X` prints a header line followed by the value.
#[allow(dead_code)]
fn wmic_value(output: &str) -> Option<String> {
    output.lines().nth(1).and_then(|l| non_empty(l.trim()))
}

#[allow(dead_code)]
fn cpuinfo_field(cpuinfo: &str, field: &str) -> Option<String> {
    cpuinfo
        .lines()
        .find(|l| l.split(':').next().is_some_and(|k| k.trim() == field))
        .and_then(|l| l.split_once(':'))
        .and_then(|(_, v)| non_empty(v.trim()))
}

#[allow(dead_code)]
fn read_trimmed(path: &str) -> Option<String> {
    std::fs::read_to_string(path)
        .ok()
        .and_then(|s| non_empty(s.trim()))
}

#[cfg(target_os = "macos")]
fn ioreg_platform_value(key: &str) -> Option<String> {
    command_output("ioreg", &["-rd1", "-c", "IOPlatformExpertDevice"]).and_then(|output| {
        output
            .lines()
            .find(|l| l.contains(key))
            .and_then(|l| l.split('"').nth(3))
            .and_then(non_empty)
    })
}

fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

fn os_version() -> Option<String> {
    #[cfg(target_os = "macos")]
    {
        command_output("sw_vers", &["-productVersion"])
    }

    #[cfg(target_os = "windows")]
    {
        command_output("cmd", &["/C", "ver"])
    }

    #[cfg(target_os = "linux")]
    {
        let release = std::fs::read_to_string("/etc/os-release").ok()?;
        os_release_field(&release, "PRETTY_NAME")
            .or_else(|| os_release_field(&release, "VERSION_ID"))
    }

    #[cfg(not(any(target_os = "macos", target_os = "windows", target_os = "linux")))]
    {
        None
    }
}

/// `KEY="value"` lookup in an os-release file.
#[allow(dead_code)]
fn os_release_field(release: &str, key: &str) -> Option<String> {
    release
        .lines()
        .filter_map(|l| l.split_once('='))
        .find(|(k, _)| *k == key)
        .and_then(|(_, v)| non_empty(v.trim().trim_matches('"')))
}
