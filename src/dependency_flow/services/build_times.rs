use crate::dependency_flow::domain::{BuildTime, DefaultChannel, DependencyFlowGraph};
use crate::ports::outbound::FlowConfigSource;
use crate::shared::Result;
use anyhow::Context;
use futures::future::try_join_all;

/// Copies per-channel build durations onto flow nodes.
pub struct BuildTimeAssigner;

impl BuildTimeAssigner {
    /// Looks up build times for every default channel whose node is still in
    /// the graph and stores them on that node.
    ///
    /// Lookups run concurrently; the graph is written once all have finished.
    /// A channel id of 0 is unknown to the registry and yields zero times.
    ///
    /// # Errors
    /// Returns the first failed lookup
    pub async fn populate(
        graph: &mut DependencyFlowGraph,
        source: &dyn FlowConfigSource,
        default_channels: &[DefaultChannel],
        days: u32,
    ) -> Result<()> {
        let present: Vec<&DefaultChannel> = default_channels
            .iter()
            .filter(|dc| graph.find_node(&dc.repository, &dc.branch).is_some())
            .collect();

        let lookups = present.iter().map(|dc| async move {
            if dc.id == 0 {
                return Ok(BuildTime::unknown(0));
            }
            source
                .get_build_time(dc.id, days)
                .await
                .with_context(|| format!("Failed to get build time for default channel {}", dc.id))
        });
        let times = try_join_all(lookups).await?;

        for (dc, time) in present.iter().zip(times) {
            let Some(id) = graph.find_node(&dc.repository, &dc.branch) else {
                continue;
            };
            if let Some(node) = graph.node_mut(id) {
                node.official_build_time = time.official_build_time;
                node.pr_build_time = time.pr_build_time;
                node.goal_time_in_minutes = time.goal_time_in_minutes;
            }
        }

        Ok(())
    }
}
