use async_trait::async_trait;
use depflow::prelude::*;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Mock ManifestSource for testing
#[derive(Default, Clone)]
pub struct MockManifestSource {
    manifests: HashMap<String, Vec<DependencyDetail>>,
    pub should_fail: bool,
    pub requests: Arc<Mutex<Vec<String>>>,
}

#[allow(dead_code)]
impl MockManifestSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_manifest(mut self, repo_uri: &str, commit: &str, deps: Vec<DependencyDetail>) -> Self {
        self.manifests.insert(Self::key(repo_uri, commit), deps);
        self
    }

    pub fn with_failure() -> Self {
        Self {
            should_fail: true,
            ..Self::default()
        }
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    fn key(repo_uri: &str, commit: &str) -> String {
        format!("{}@{}", repo_uri.to_lowercase(), commit)
    }
}

#[async_trait]
impl ManifestSource for MockManifestSource {
    async fn get_dependencies(
        &self,
        repo_uri: &str,
        commit_or_branch: &str,
    ) -> Result<Vec<DependencyDetail>> {
        let key = Self::key(repo_uri, commit_or_branch);
        self.requests.lock().unwrap().push(key.clone());
        if self.should_fail {
            anyhow::bail!("Mock manifest read failure");
        }
        self.manifests.get(&key).cloned().ok_or_else(|| {
            FlowError::ManifestNotFound {
                repository: repo_uri.to_string(),
                commit: commit_or_branch.to_string(),
            }
            .into()
        })
    }
}
