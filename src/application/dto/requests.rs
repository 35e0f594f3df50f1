use crate::dependency_flow::domain::{DependencyDetail, UpdateFrequency};

/// Request DTO for building a dependency graph
#[derive(Debug, Clone)]
pub struct GraphRequest {
    pub repository: String,
    pub commit: String,
    /// Follow toolset dependencies as well as product ones
    pub include_toolset: bool,
    /// Attach contributing builds to each node
    pub lookup_builds: bool,
    /// Record the paths of cycles that were skipped
    pub compute_cycle_paths: bool,
    /// Start from these dependencies instead of the root manifest
    pub root_dependencies: Option<Vec<DependencyDetail>>,
}

impl GraphRequest {
    pub fn new(repository: impl Into<String>, commit: impl Into<String>) -> Self {
        Self {
            repository: repository.into(),
            commit: commit.into(),
            include_toolset: false,
            lookup_builds: false,
            compute_cycle_paths: false,
            root_dependencies: None,
        }
    }
}

/// Request DTO for planning dependency updates of one repository
#[derive(Debug, Clone)]
pub struct CoherencyRequest {
    pub repository: String,
    pub commit: String,
    /// Build whose assets should flow in before coherency is resolved
    pub build_id: Option<u64>,
}

impl CoherencyRequest {
    pub fn new(repository: impl Into<String>, commit: impl Into<String>) -> Self {
        Self {
            repository: repository.into(),
            commit: commit.into(),
            build_id: None,
        }
    }
}

/// Request DTO for building the channel flow graph
#[derive(Debug, Clone)]
pub struct FlowRequest {
    /// Prune to what feeds this channel
    pub channel: Option<String>,
    pub include_disabled_subscriptions: bool,
    pub included_frequencies: Vec<UpdateFrequency>,
    /// Fetch build times and run the critical-path analysis
    pub include_build_times: bool,
    /// Averaging window for build times
    pub days: u32,
}

impl Default for FlowRequest {
    fn default() -> Self {
        Self {
            channel: None,
            include_disabled_subscriptions: false,
            included_frequencies: UpdateFrequency::ALL.to_vec(),
            include_build_times: false,
            days: 7,
        }
    }
}
