use crate::application::dto::FlowRequest;
use crate::dependency_flow::domain::{DefaultChannel, DependencyFlowGraph};
use crate::dependency_flow::services::{
    BuildTimeAssigner, CriticalPathAnalyzer, FlowFilter, ToolingClassifier,
};
use crate::ports::outbound::{BuildRegistry, FlowConfigSource, ManifestSource, ProgressReporter};
use crate::shared::Result;
use anyhow::Context;
use tracing::{debug, warn};

const ANALYSIS_STEPS: usize = 3;

/// BuildFlowGraphUseCase - builds, prunes and analyzes the channel flow graph
///
/// Pipeline: build from channels and subscriptions, prune to a channel when
/// one is requested, then (with build times) populate times, classify
/// tooling edges and run the critical-path analysis.
///
/// # Type Parameters
/// * `F` - FlowConfigSource implementation
/// * `M` - ManifestSource implementation (tooling classification only)
/// * `B` - BuildRegistry implementation (tooling classification only)
/// * `PR` - ProgressReporter implementation
pub struct BuildFlowGraphUseCase<F, M, B, PR> {
    config: F,
    manifests: Option<M>,
    registry: Option<B>,
    progress_reporter: PR,
}

impl<F, M, B, PR> BuildFlowGraphUseCase<F, M, B, PR>
where
    F: FlowConfigSource,
    M: ManifestSource,
    B: BuildRegistry,
    PR: ProgressReporter,
{
    pub fn new(config: F, manifests: Option<M>, registry: Option<B>, progress_reporter: PR) -> Self {
        Self {
            config,
            manifests,
            registry,
            progress_reporter,
        }
    }

    pub async fn execute(&self, request: FlowRequest) -> Result<DependencyFlowGraph> {
        let default_channels = self
            .config
            .get_default_channels()
            .await
            .context("Failed to load default channels")?;
        let subscriptions = self
            .config
            .get_subscriptions()
            .await
            .context("Failed to load subscriptions")?;

        self.progress_reporter.report(&format!(
            "🌐 Building flow graph from {} default channels and {} subscriptions",
            default_channels.len(),
            subscriptions.len()
        ));
        let mut graph = DependencyFlowGraph::build(&default_channels, &subscriptions);

        let filter = FlowFilter {
            channel: request.channel.clone(),
            include_disabled_subscriptions: request.include_disabled_subscriptions,
            included_frequencies: request.included_frequencies.clone(),
        };
        if filter.apply(&mut graph) {
            let channel = request.channel.as_deref().unwrap_or_default();
            if graph.node_count() == 0 {
                self.progress_reporter.report_error(&format!(
                    "⚠️  No repository publishes to channel '{}'",
                    channel
                ));
            } else {
                self.progress_reporter.report(&format!(
                    "✂️  Kept {} nodes feeding '{}'",
                    graph.node_count(),
                    channel
                ));
            }
        }

        if request.include_build_times {
            self.analyze(&mut graph, &default_channels, request.days)
                .await?;
        }

        self.progress_reporter.report_completion(&format!(
            "✅ Flow graph: {} nodes, {} edges",
            graph.node_count(),
            graph.edge_count()
        ));
        Ok(graph)
    }

    async fn analyze(
        &self,
        graph: &mut DependencyFlowGraph,
        default_channels: &[DefaultChannel],
        days: u32,
    ) -> Result<()> {
        self.progress_reporter
            .report_progress(0, ANALYSIS_STEPS, Some("build times"));
        BuildTimeAssigner::populate(graph, &self.config, default_channels, days).await?;

        self.progress_reporter
            .report_progress(1, ANALYSIS_STEPS, Some("tooling edges"));
        match (&self.manifests, &self.registry) {
            (Some(manifests), Some(registry)) => {
                let tooling = ToolingClassifier::mark_tooling_edges(graph, manifests, registry).await?;
                debug!(tooling, "Classified tooling-only edges");
            }
            _ => warn!("Skipping tooling classification without manifests and a build registry"),
        }

        self.progress_reporter
            .report_progress(2, ANALYSIS_STEPS, Some("critical path"));
        CriticalPathAnalyzer::analyze(graph);
        self.progress_reporter
            .report_progress(ANALYSIS_STEPS, ANALYSIS_STEPS, None);
        Ok(())
    }
}
