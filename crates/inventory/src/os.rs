//! OS package manager adapters

use crate::exec::run_query_tool;
use vigil_types::{Ecosystem, Package};

/// List installed Debian packages via dpkg-query
pub(crate) async fn collect_dpkg() -> Vec<Package> {
    let Some(listing) =
        run_query_tool("dpkg-query", &["-W", "-f=${Package} ${Version}\n"]).await
    else {
        return Vec::new();
    };

    listing.lines().filter_map(parse_dpkg_line).collect()
}

/// List installed RPM packages via rpm -qa
pub(crate) async fn collect_rpm() -> Vec<Package> {
    let Some(listing) = run_query_tool(
        "rpm",
        &["-qa", "--qf", "%{NAME} %{EPOCH}:%{VERSION}-%{RELEASE}\n"],
    )
    .await
    else {
        return Vec::new();
    };

    listing.lines().filter_map(parse_rpm_line).collect()
}

/// Parse one `name version` record; malformed lines yield `None`
#[must_use]
pub fn parse_dpkg_line(line: &str) -> Option<Package> {
    let line = line.trim();
    let (name, version) = line.split_once(' ')?;
    if name.is_empty() || version.is_empty() {
        return None;
    }
    Some(Package::new(name, version, Ecosystem::OsDebian))
}

/// Parse one rpm record, stripping the unset-epoch placeholder
#[must_use]
pub fn parse_rpm_line(line: &str) -> Option<Package> {
    let line = line.trim();
    let (name, version) = line.split_once(' ')?;
    if name.is_empty() || version.is_empty() {
        return None;
    }
    let version = version.replace("(none):", "");
    Some(Package::new(name, version, Ecosystem::OsRpm))
}
