//! Language package index adapter

use crate::exec::run_query_tool;
use serde::Deserialize;
use vigil_types::{Ecosystem, Package};

#[derive(Debug, Deserialize)]
struct PipEntry {
    name: String,
    version: String,
}

/// List installed Python packages via pip
pub(crate) async fn collect_pip() -> Vec<Package> {
    let Some(listing) =
        run_query_tool("python3", &["-m", "pip", "list", "--format=json"]).await
    else {
        return Vec::new();
    };

    parse_pip_listing(&listing)
}

/// Parse pip's JSON listing; unparseable output yields an empty list
#[must_use]
pub fn parse_pip_listing(listing: &str) -> Vec<Package> {
    let entries: Vec<PipEntry> = match serde_json::from_str(listing) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!(error = %e, "pip listing parse failed");
            return Vec::new();
        }
    };

    entries
        .into_iter()
        .map(|e| Package::new(e.name, e.version, Ecosystem::LangIndex))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pip_listing_parses() {
        let listing = r#"[{"name": "requests", "version": "2.31.0"},
                          {"name": "urllib3", "version": "1.26.18"}]"#;
        let packages = parse_pip_listing(listing);
        assert_eq!(packages.len(), 2);
        assert_eq!(packages[0].name, "requests");
        assert_eq!(packages[0].ecosystem, Ecosystem::LangIndex);
    }

    #[test]
    fn pip_garbage_yields_empty() {
        assert!(parse_pip_listing("WARNING: not json").is_empty());
    }
}
