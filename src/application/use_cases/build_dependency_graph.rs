use crate::application::dto::GraphRequest;
use crate::dependency_flow::domain::DependencyGraph;
use crate::dependency_flow::services::{DependencyGraphBuilder, GraphBuildOptions, GraphRoot};
use crate::ports::outbound::{BuildRegistry, ManifestSource, ProgressReporter};
use crate::shared::Result;

/// BuildDependencyGraphUseCase - walks manifests from a root repository
///
/// # Type Parameters
/// * `M` - ManifestSource implementation (optional; its absence is a configuration error)
/// * `B` - BuildRegistry implementation (only needed for build lookup)
/// * `PR` - ProgressReporter implementation
pub struct BuildDependencyGraphUseCase<M, B, PR> {
    manifests: Option<M>,
    registry: Option<B>,
    progress_reporter: PR,
}

impl<M, B, PR> BuildDependencyGraphUseCase<M, B, PR>
where
    M: ManifestSource,
    B: BuildRegistry,
    PR: ProgressReporter,
{
    pub fn new(manifests: Option<M>, registry: Option<B>, progress_reporter: PR) -> Self {
        Self {
            manifests,
            registry,
            progress_reporter,
        }
    }

    /// Builds the dependency graph for the requested repository and commit
    pub async fn execute(&self, request: GraphRequest) -> Result<DependencyGraph> {
        self.progress_reporter.report(&format!(
            "🔍 Building dependency graph for {} @ {}",
            request.repository, request.commit
        ));

        let options = GraphBuildOptions {
            include_toolset: request.include_toolset,
            lookup_builds: request.lookup_builds,
            compute_cycle_paths: request.compute_cycle_paths,
        };
        let mut root = GraphRoot::at(&request.repository, &request.commit);
        if let Some(dependencies) = request.root_dependencies {
            root = root.with_dependencies(dependencies);
        }
        let graph = DependencyGraphBuilder::build(
            root,
            self.manifests.as_ref().map(|m| m as &dyn ManifestSource),
            self.registry.as_ref().map(|r| r as &dyn BuildRegistry),
            options,
        )
        .await
        .inspect_err(|e| {
            self.progress_reporter
                .report_error(&format!("❌ Dependency graph build failed: {}", e))
        })?;

        let incoherent = graph.incoherent_nodes().count();
        self.progress_reporter.report_completion(&format!(
            "✅ {} nodes, {} unique dependencies, {} incoherent nodes",
            graph.node_count(),
            graph.unique_dependencies().len(),
            incoherent
        ));
        if !graph.cycles().is_empty() {
            self.progress_reporter.report(&format!(
                "🔁 {} dependency cycles found",
                graph.cycles().len()
            ));
        }
        if incoherent > 0 {
            self.progress_reporter.report(&format!(
                "⚠️  {} repositories are referenced at more than one commit",
                incoherent
            ));
        }

        Ok(graph)
    }
}
