//! Flow graph views

use crate::dependency_flow::domain::UpdateFrequency;
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize)]
pub struct FlowNodeView {
    pub index: usize,
    pub uid: Uuid,
    pub repository: String,
    pub branch: String,
    pub output_channels: Vec<String>,
    pub input_channels: Vec<String>,
    pub official_build_time: f64,
    pub pr_build_time: f64,
    pub goal_time_in_minutes: i32,
    pub best_case_time: f64,
    pub worst_case_time: f64,
    pub on_longest_build_path: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct FlowEdgeView {
    pub from: usize,
    pub to: usize,
    pub subscription_id: Uuid,
    pub channel: String,
    pub update_frequency: UpdateFrequency,
    pub enabled: bool,
    pub part_of_cycle: bool,
    pub back_edge: bool,
    pub on_longest_build_path: bool,
    pub tooling_only: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct FlowReport {
    /// Channel the graph was pruned to, if any
    pub channel: Option<String>,
    /// Whether build times and critical-path fields were computed
    pub build_times: bool,
    pub nodes: Vec<FlowNodeView>,
    pub edges: Vec<FlowEdgeView>,
}

impl FlowReport {
    pub fn longest_path(&self) -> impl Iterator<Item = &FlowNodeView> {
        self.nodes.iter().filter(|n| n.on_longest_build_path)
    }
}
