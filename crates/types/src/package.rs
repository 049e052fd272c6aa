//! Package and ecosystem type definitions

use serde::{Deserialize, Serialize};
use std::fmt;

/// Operating system family of the host, detected by marker-file probing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OsFamily {
    Debian,
    Redhat,
    Unknown,
}

impl OsFamily {
    /// The OS package ecosystem for this family, if one is mapped
    #[must_use]
    pub fn ecosystem(self) -> Option<Ecosystem> {
        match self {
            Self::Debian => Some(Ecosystem::OsDebian),
            Self::Redhat => Some(Ecosystem::OsRpm),
            Self::Unknown => None,
        }
    }
}

impl fmt::Display for OsFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Debian => write!(f, "debian"),
            Self::Redhat => write!(f, "redhat"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// The namespace an advisory service uses to disambiguate package names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ecosystem {
    OsDebian,
    OsRpm,
    LangIndex,
    Unknown,
}

impl Ecosystem {
    /// Name of this ecosystem on the advisory service, if it has one
    #[must_use]
    pub fn advisory_name(self) -> Option<&'static str> {
        match self {
            Self::OsDebian => Some("Debian"),
            Self::OsRpm => Some("RPM"),
            Self::LangIndex => Some("PyPI"),
            Self::Unknown => None,
        }
    }
}

/// One installed package as reported by its package manager
///
/// Identity is `(name, ecosystem)`. The version is a free-form string; the
/// advisory service does all version comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Package {
    pub name: String,
    pub version: String,
    pub ecosystem: Ecosystem,
}

impl Package {
    pub fn new(name: impl Into<String>, version: impl Into<String>, ecosystem: Ecosystem) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            ecosystem,
        }
    }
}

impl fmt::Display for Package {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.name, self.version)
    }
}
