//! Update plan view

use crate::dependency_flow::domain::DependencyUpdate;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct UpdatesReport {
    pub repository: String,
    pub commit: String,
    pub build_id: Option<u64>,
    pub non_coherency_updates: Vec<DependencyUpdate>,
    pub coherency_updates: Vec<DependencyUpdate>,
}

impl UpdatesReport {
    pub fn is_empty(&self) -> bool {
        self.non_coherency_updates.is_empty() && self.coherency_updates.is_empty()
    }
}
