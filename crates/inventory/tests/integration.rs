//! Integration tests for the inventory crate

use vigil_inventory::detect_os_family_in;
use vigil_types::OsFamily;

fn seed_root(markers: &[&str]) -> tempfile::TempDir {
    let root = tempfile::TempDir::new().unwrap();
    std::fs::create_dir_all(root.path().join("etc")).unwrap();
    for marker in markers {
        std::fs::write(root.path().join(marker), "").unwrap();
    }
    root
}

#[test]
fn test_debian_marker_detected() {
    let root = seed_root(&["etc/debian_version"]);
    assert_eq!(detect_os_family_in(root.path()), OsFamily::Debian);
}

#[test]
fn test_redhat_markers_detected() {
    let root = seed_root(&["etc/redhat-release"]);
    assert_eq!(detect_os_family_in(root.path()), OsFamily::Redhat);

    let root = seed_root(&["etc/centos-release"]);
    assert_eq!(detect_os_family_in(root.path()), OsFamily::Redhat);
}

#[test]
fn test_debian_marker_wins_over_redhat() {
    let root = seed_root(&["etc/debian_version", "etc/redhat-release"]);
    assert_eq!(detect_os_family_in(root.path()), OsFamily::Debian);
}

#[test]
fn test_no_markers_is_unknown() {
    let root = seed_root(&[]);
    assert_eq!(detect_os_family_in(root.path()), OsFamily::Unknown);
}

#[test]
fn test_hostname_is_nonempty() {
    assert!(!vigil_inventory::hostname().is_empty());
}
