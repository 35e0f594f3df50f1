use crate::dependency_flow::domain::Build;
use crate::shared::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// BuildRegistry port for querying builds, their assets and package feeds
#[async_trait]
pub trait BuildRegistry: Send + Sync {
    /// Returns every build recorded for a repository at a commit
    ///
    /// # Arguments
    /// * `repo_uri` - Repository URI
    /// * `commit` - Commit SHA the builds were produced from
    async fn get_builds(&self, repo_uri: &str, commit: &str) -> Result<Vec<Build>>;

    /// Looks up a single build by id, `None` when the registry has no such build
    async fn get_build(&self, id: u64) -> Result<Option<Build>>;

    /// Returns the package-source feed URIs declared by a repository at a commit
    async fn get_package_sources(&self, repo_uri: &str, commit: &str) -> Result<Vec<String>>;
}

#[async_trait]
impl<T: BuildRegistry + ?Sized> BuildRegistry for Arc<T> {
    async fn get_builds(&self, repo_uri: &str, commit: &str) -> Result<Vec<Build>> {
        (**self).get_builds(repo_uri, commit).await
    }

    async fn get_build(&self, id: u64) -> Result<Option<Build>> {
        (**self).get_build(id).await
    }

    async fn get_package_sources(&self, repo_uri: &str, commit: &str) -> Result<Vec<String>> {
        (**self).get_package_sources(repo_uri, commit).await
    }
}
