use crate::dependency_flow::domain::DependencyDetail;
use crate::ports::outbound::ManifestSource;
use crate::shared::error::FlowError;
use crate::shared::security::read_bounded_file;
use crate::shared::Result;
use anyhow::Context;
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File holding one parsed manifest inside a `<folder>/<commit>/` directory.
pub const MANIFEST_FILE_NAME: &str = "dependencies.json";

/// DirectoryManifestSource adapter reading manifests from a local checkout tree
///
/// Layout: `<root>/<folder>/<commit or branch>/dependencies.json`, where the
/// file is a JSON array of dependency entries. `folder` comes from the
/// remotes map given at construction; unmapped URIs fall back to the last
/// path segment of the URI.
pub struct DirectoryManifestSource {
    root: PathBuf,
    remotes: HashMap<String, String>,
}

impl DirectoryManifestSource {
    pub fn new(root: PathBuf, remotes: HashMap<String, String>) -> Self {
        let remotes = remotes
            .into_iter()
            .map(|(uri, folder)| (uri.to_lowercase(), folder))
            .collect();
        Self { root, remotes }
    }

    /// Folder name for a repository URI.
    pub fn folder_for(&self, repo_uri: &str) -> String {
        if let Some(folder) = self.remotes.get(&repo_uri.to_lowercase()) {
            return folder.clone();
        }
        repo_uri
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or(repo_uri)
            .trim_end_matches(".git")
            .to_string()
    }

    fn manifest_path(&self, repo_uri: &str, commit_or_branch: &str) -> PathBuf {
        self.root
            .join(self.folder_for(repo_uri))
            .join(commit_or_branch)
            .join(MANIFEST_FILE_NAME)
    }

    /// Parses a single manifest file, such as explicit root dependencies.
    pub fn read_manifest(path: &Path) -> Result<Vec<DependencyDetail>> {
        let content = read_bounded_file(path, "manifest")?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse manifest {}", path.display()))
    }
}

#[async_trait]
impl ManifestSource for DirectoryManifestSource {
    async fn get_dependencies(
        &self,
        repo_uri: &str,
        commit_or_branch: &str,
    ) -> Result<Vec<DependencyDetail>> {
        let path = self.manifest_path(repo_uri, commit_or_branch);
        if !path.exists() {
            return Err(FlowError::ManifestNotFound {
                repository: repo_uri.to_string(),
                commit: commit_or_branch.to_string(),
            }
            .into());
        }
        debug!(path = %path.display(), "Reading manifest");
        Self::read_manifest(&path)
    }
}
