use crate::dependency_flow::domain::{
    Build, BuildTime, DefaultChannel, DependencyDetail, Subscription,
};
use crate::ports::outbound::{BuildRegistry, FlowConfigSource, ManifestSource};
use crate::shared::error::FlowError;
use crate::shared::security::read_bounded_file;
use crate::shared::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Parsed manifest of one repository at one commit or branch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestRecord {
    pub repository: String,
    /// Commit sha or branch name the manifest was read at.
    pub commit: String,
    #[serde(default)]
    pub dependencies: Vec<DependencyDetail>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageSourceRecord {
    pub repository: String,
    pub commit: String,
    #[serde(default)]
    pub feeds: Vec<String>,
}

/// On-disk layout of a snapshot file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub manifests: Vec<ManifestRecord>,
    #[serde(default)]
    pub builds: Vec<Build>,
    #[serde(default)]
    pub package_sources: Vec<PackageSourceRecord>,
    #[serde(default)]
    pub default_channels: Vec<DefaultChannel>,
    #[serde(default)]
    pub subscriptions: Vec<Subscription>,
    /// Pre-aggregated averages; one entry per default channel.
    #[serde(default)]
    pub build_times: Vec<BuildTime>,
}

/// SnapshotStore adapter backed by an in-memory [`Snapshot`]
///
/// Implements every data port the analyses need, so a single exported
/// snapshot is enough to run graph, coherency and flow commands offline.
/// Repository URIs compare case-insensitively, commits exactly.
pub struct SnapshotStore {
    snapshot: Snapshot,
}

impl SnapshotStore {
    pub fn new(snapshot: Snapshot) -> Self {
        Self { snapshot }
    }

    /// Loads a snapshot file with the usual input-file safety checks.
    ///
    /// # Errors
    /// Returns [`FlowError::SnapshotLoad`] when the JSON does not parse, or
    /// the error from [`read_bounded_file`] when the file cannot be read.
    pub fn load(path: &Path) -> Result<Self> {
        let content = read_bounded_file(path, "snapshot")?;
        let snapshot: Snapshot =
            serde_json::from_str(&content).map_err(|e| FlowError::SnapshotLoad {
                path: path.to_path_buf(),
                details: e.to_string(),
            })?;

        debug!(
            path = %path.display(),
            manifests = snapshot.manifests.len(),
            builds = snapshot.builds.len(),
            subscriptions = snapshot.subscriptions.len(),
            "Loaded snapshot"
        );
        Ok(Self::new(snapshot))
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }
}

fn same_location(repository: &str, commit: &str, repo_uri: &str, wanted_commit: &str) -> bool {
    repository.eq_ignore_ascii_case(repo_uri) && commit == wanted_commit
}

#[async_trait]
impl ManifestSource for SnapshotStore {
    async fn get_dependencies(
        &self,
        repo_uri: &str,
        commit_or_branch: &str,
    ) -> Result<Vec<DependencyDetail>> {
        self.snapshot
            .manifests
            .iter()
            .find(|m| same_location(&m.repository, &m.commit, repo_uri, commit_or_branch))
            .map(|m| m.dependencies.clone())
            .ok_or_else(|| {
                FlowError::ManifestNotFound {
                    repository: repo_uri.to_string(),
                    commit: commit_or_branch.to_string(),
                }
                .into()
            })
    }
}

#[async_trait]
impl BuildRegistry for SnapshotStore {
    async fn get_builds(&self, repo_uri: &str, commit: &str) -> Result<Vec<Build>> {
        Ok(self
            .snapshot
            .builds
            .iter()
            .filter(|b| same_location(&b.repository, &b.commit, repo_uri, commit))
            .cloned()
            .collect())
    }

    async fn get_build(&self, id: u64) -> Result<Option<Build>> {
        Ok(self.snapshot.builds.iter().find(|b| b.id == id).cloned())
    }

    async fn get_package_sources(&self, repo_uri: &str, commit: &str) -> Result<Vec<String>> {
        Ok(self
            .snapshot
            .package_sources
            .iter()
            .filter(|p| same_location(&p.repository, &p.commit, repo_uri, commit))
            .flat_map(|p| p.feeds.iter().cloned())
            .collect())
    }
}

#[async_trait]
impl FlowConfigSource for SnapshotStore {
    async fn get_default_channels(&self) -> Result<Vec<DefaultChannel>> {
        Ok(self.snapshot.default_channels.clone())
    }

    async fn get_subscriptions(&self) -> Result<Vec<Subscription>> {
        Ok(self.snapshot.subscriptions.clone())
    }

    async fn get_build_time(&self, default_channel_id: u64, days: u32) -> Result<BuildTime> {
        debug!(default_channel_id, days, "Build time from snapshot averages");
        Ok(self
            .snapshot
            .build_times
            .iter()
            .find(|t| t.default_channel_id == default_channel_id)
            .copied()
            .unwrap_or_else(|| BuildTime::unknown(default_channel_id)))
    }
}
