#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Installed-package inventory collection
//!
//! Probes the OS family by marker files, then queries the native package
//! manager and the language package index. Every source degrades to an
//! empty list when its query tool is missing or fails; a bare host with no
//! tooling still yields a (possibly empty) inventory rather than an error.

mod exec;
mod lang;
mod os;

pub use lang::parse_pip_listing;
pub use os::{parse_dpkg_line, parse_rpm_line};

use std::path::Path;
use vigil_types::{OsFamily, Package};

/// Detect the host OS family by probing family-specific marker files
#[must_use]
pub fn detect_os_family() -> OsFamily {
    detect_os_family_in(Path::new("/"))
}

/// Marker-file probe against an alternate root (test seam)
#[must_use]
pub fn detect_os_family_in(root: &Path) -> OsFamily {
    if root.join("etc/debian_version").exists() {
        return OsFamily::Debian;
    }
    if root.join("etc/redhat-release").exists() || root.join("etc/centos-release").exists() {
        return OsFamily::Redhat;
    }
    OsFamily::Unknown
}

/// Collect the installed-package inventory for this host
///
/// Unknown OS families contribute no OS packages; the language index is
/// always queried. Never fails — degraded sources are logged and skipped.
pub async fn collect(os_family: OsFamily) -> Vec<Package> {
    let mut packages = Vec::new();

    match os_family {
        OsFamily::Debian => packages.extend(os::collect_dpkg().await),
        OsFamily::Redhat => packages.extend(os::collect_rpm().await),
        OsFamily::Unknown => {
            tracing::warn!("unknown OS family, skipping OS package inventory");
        }
    }

    packages.extend(lang::collect_pip().await);

    tracing::info!(
        os_family = %os_family,
        packages = packages.len(),
        "inventory collected"
    );

    packages
}

/// Hostname of this machine
///
/// Reads the kernel hostname, falling back to the `HOSTNAME` environment
/// variable, then to `localhost`.
#[must_use]
pub fn hostname() -> String {
    if let Ok(name) = std::fs::read_to_string("/proc/sys/kernel/hostname") {
        let name = name.trim();
        if !name.is_empty() {
            return name.to_string();
        }
    }
    std::env::var("HOSTNAME").unwrap_or_else(|_| "localhost".to_string())
}
