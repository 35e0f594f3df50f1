use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Whether a dependency ships in the product or is only build tooling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DependencyType {
    #[default]
    Product,
    Toolset,
}

impl fmt::Display for DependencyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DependencyType::Product => write!(f, "Product"),
            DependencyType::Toolset => write!(f, "Toolset"),
        }
    }
}

/// One dependency declaration from a repository manifest.
///
/// An empty `repo_uri` or `commit` means the manifest did not record where the
/// artifact was built; such entries cannot be traversed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyDetail {
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub repo_uri: String,
    #[serde(default)]
    pub commit: String,
    #[serde(default)]
    pub pinned: bool,
    #[serde(default, rename = "type")]
    pub dependency_type: DependencyType,
    /// Name of the dependency whose source build dictates this one's version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coherent_parent: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub coherent_products: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub locations: Vec<String>,
}

impl DependencyDetail {
    pub fn new(name: &str, version: &str, repo_uri: &str, commit: &str) -> Self {
        Self {
            name: name.to_string(),
            version: version.to_string(),
            repo_uri: repo_uri.to_string(),
            commit: commit.to_string(),
            pinned: false,
            dependency_type: DependencyType::Product,
            coherent_parent: None,
            coherent_products: BTreeSet::new(),
            locations: Vec::new(),
        }
    }

    pub fn with_coherent_parent(mut self, parent: &str) -> Self {
        self.coherent_parent = Some(parent.to_string());
        self
    }

    pub fn pinned(mut self) -> Self {
        self.pinned = true;
        self
    }

    pub fn toolset(mut self) -> Self {
        self.dependency_type = DependencyType::Toolset;
        self
    }

    pub fn with_locations(mut self, locations: Vec<String>) -> Self {
        self.locations = locations;
        self
    }

    /// True when both the source repository and commit are known.
    pub fn has_source_info(&self) -> bool {
        !self.repo_uri.trim().is_empty() && !self.commit.trim().is_empty()
    }

    pub fn has_coherent_parent(&self) -> bool {
        self.coherent_parent
            .as_deref()
            .is_some_and(|p| !p.trim().is_empty())
    }

    /// Case-insensitive name match, the way manifests compare names.
    pub fn is_named(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }

    /// Same name, version, commit and repository (all case-sensitive).
    pub fn same_source(&self, other: &DependencyDetail) -> bool {
        self.name == other.name
            && self.version == other.version
            && self.commit == other.commit
            && self.repo_uri == other.repo_uri
    }
}

impl fmt::Display for DependencyDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.name, self.version)
    }
}

/// A proposed manifest edit: replace `from` with `to`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyUpdate {
    pub from: DependencyDetail,
    pub to: DependencyDetail,
}
