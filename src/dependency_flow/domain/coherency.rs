use super::dependency::{DependencyDetail, DependencyUpdate};
use serde::{Deserialize, Serialize};

/// A broken coherent-parent link: the parent's manifest lacks the dependency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoherencyError {
    pub dependency: DependencyDetail,
    pub error: String,
    pub potential_solutions: Vec<String>,
}

impl CoherencyError {
    /// `parent_repo` @ `parent_commit` does not declare `dependency`.
    pub fn missing_in_parent(
        dependency: DependencyDetail,
        parent_repo: &str,
        parent_commit: &str,
    ) -> Self {
        let error = format!(
            "{} @ {} does not contain dependency {}",
            parent_repo, parent_commit, dependency.name
        );
        Self {
            dependency,
            error,
            potential_solutions: vec![
                format!("Add the dependency to {}.", parent_repo),
                "Pin the dependency.".to_string(),
                "Remove the CoherentParentDependency attribute.".to_string(),
            ],
        }
    }
}

/// Everything a manifest needs to become current and coherent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdatePlan {
    pub non_coherency_updates: Vec<DependencyUpdate>,
    pub coherency_updates: Vec<DependencyUpdate>,
}

impl UpdatePlan {
    pub fn is_empty(&self) -> bool {
        self.non_coherency_updates.is_empty() && self.coherency_updates.is_empty()
    }

    pub fn len(&self) -> usize {
        self.non_coherency_updates.len() + self.coherency_updates.len()
    }
}
