use crate::dependency_flow::domain::DependencyDetail;
use crate::shared::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// ManifestSource port for reading parsed dependency manifests
///
/// Implementations may read from a recorded snapshot, a directory of
/// manifests, or a remote host. Parsing of the on-disk manifest format
/// happens behind this port.
#[async_trait]
pub trait ManifestSource: Send + Sync {
    /// Returns the dependencies declared by a repository at a commit or branch
    ///
    /// # Arguments
    /// * `repo_uri` - Repository URI (e.g. "https://github.com/org/repo")
    /// * `commit_or_branch` - Commit SHA or branch name
    ///
    /// # Errors
    /// Returns an error if the manifest cannot be found or read. Callers treat
    /// this as fatal for the current operation.
    async fn get_dependencies(
        &self,
        repo_uri: &str,
        commit_or_branch: &str,
    ) -> Result<Vec<DependencyDetail>>;
}

#[async_trait]
impl<T: ManifestSource + ?Sized> ManifestSource for Arc<T> {
    async fn get_dependencies(
        &self,
        repo_uri: &str,
        commit_or_branch: &str,
    ) -> Result<Vec<DependencyDetail>> {
        (**self).get_dependencies(repo_uri, commit_or_branch).await
    }
}
