use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LocationType {
    #[default]
    NugetFeed,
    Container,
    None,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetLocation {
    pub location: String,
    #[serde(default)]
    pub location_type: LocationType,
}

/// An artifact produced by a build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub locations: Vec<AssetLocation>,
}

impl Asset {
    /// Name matches case-insensitively, version exactly.
    pub fn matches(&self, name: &str, version: &str) -> bool {
        self.name.eq_ignore_ascii_case(name) && self.version == version
    }

    pub fn location_uris(&self) -> Vec<String> {
        self.locations.iter().map(|l| l.location.clone()).collect()
    }
}

/// A build recorded in the build registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Build {
    pub id: u64,
    pub repository: String,
    pub commit: String,
    #[serde(default)]
    pub build_number: String,
    pub date_produced: DateTime<Utc>,
    #[serde(default)]
    pub assets: Vec<Asset>,
}

impl Build {
    /// First asset with this name (case-insensitive) and exact version.
    pub fn find_asset(&self, name: &str, version: &str) -> Option<&Asset> {
        self.assets.iter().find(|a| a.matches(name, version))
    }

    pub fn produced(&self, name: &str, version: &str) -> bool {
        self.find_asset(name, version).is_some()
    }
}
