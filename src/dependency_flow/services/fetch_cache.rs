use crate::dependency_flow::domain::repo_commit_key;
use crate::shared::Result;
use dashmap::DashMap;
use std::future::Future;

/// Memoizes fetch results keyed by `repo@commit` for one invocation.
///
/// A cache is owned by the service that fills it and dropped with it, so
/// nothing leaks between separate graph builds or resolutions. Failed fetches
/// are not cached.
pub struct FetchCache<V: Clone> {
    entries: DashMap<String, V>,
}

impl<V: Clone> FetchCache<V> {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Returns the cached value for `repo_uri@commit`, running `fetch` on a miss.
    pub async fn get_or_fetch<F, Fut>(&self, repo_uri: &str, commit: &str, fetch: F) -> Result<V>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V>>,
    {
        let key = repo_commit_key(repo_uri, commit);
        if let Some(hit) = self.entries.get(&key) {
            return Ok(hit.value().clone());
        }

        let value = fetch().await?;
        self.entries.insert(key, value.clone());
        Ok(value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V: Clone> Default for FetchCache<V> {
    fn default() -> Self {
        Self::new()
    }
}
