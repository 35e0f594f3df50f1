//! Identity rules shared by the graph builder, resolver and flow graph.

use super::dependency::DependencyDetail;

const BRANCH_PREFIX: &str = "refs/heads/";

/// Cache and node key for a repository at a commit: `repo@commit`.
pub fn repo_commit_key(repo_uri: &str, commit: &str) -> String {
    format!("{}@{}", repo_uri, commit)
}

/// Strips a leading `refs/heads/` from a branch name.
pub fn normalize_branch(branch: &str) -> &str {
    branch.strip_prefix(BRANCH_PREFIX).unwrap_or(branch)
}

/// Deduplication identity of a dependency: name, version, repository and commit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DependencyKey {
    pub name: String,
    pub version: String,
    pub repo_uri: String,
    pub commit: String,
}

impl From<&DependencyDetail> for DependencyKey {
    fn from(dep: &DependencyDetail) -> Self {
        Self {
            name: dep.name.clone(),
            version: dep.version.clone(),
            repo_uri: dep.repo_uri.clone(),
            commit: dep.commit.clone(),
        }
    }
}
