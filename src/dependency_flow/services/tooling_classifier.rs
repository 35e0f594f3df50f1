use crate::dependency_flow::domain::{
    Build, DependencyDetail, DependencyFlowGraph, DependencyType,
};
use crate::dependency_flow::services::FetchCache;
use crate::ports::outbound::{BuildRegistry, ManifestSource};
use crate::shared::Result;
use anyhow::Context;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Decides which flow edges only carry build tooling.
pub struct ToolingClassifier;

impl ToolingClassifier {
    /// Marks edges whose last applied build shipped nothing the target consumes
    /// as a product dependency.
    ///
    /// Edges without a last applied build are left as they are. A target whose
    /// manifest cannot be read is logged and treated as a product consumer.
    ///
    /// # Returns
    /// The number of edges marked tooling-only
    ///
    /// # Errors
    /// Returns an error if the build registry lookup fails
    pub async fn mark_tooling_edges(
        graph: &mut DependencyFlowGraph,
        manifests: &dyn ManifestSource,
        registry: &dyn BuildRegistry,
    ) -> Result<usize> {
        let manifest_cache: FetchCache<Vec<DependencyDetail>> = FetchCache::new();
        let mut build_cache: HashMap<u64, Option<Build>> = HashMap::new();
        let mut tooling_edges = 0;

        for edge_id in graph.edge_ids() {
            let Some((build_id, target)) = graph.edge(edge_id).and_then(|e| {
                e.subscription
                    .last_applied_build_id
                    .map(|build_id| (build_id, e.to))
            }) else {
                continue;
            };
            let Some((repository, branch)) = graph
                .node(target)
                .map(|n| (n.repository.clone(), n.branch.clone()))
            else {
                continue;
            };

            let build = match build_cache.get(&build_id) {
                Some(cached) => cached.clone(),
                None => {
                    let fetched = registry
                        .get_build(build_id)
                        .await
                        .with_context(|| format!("Failed to look up build {}", build_id))?;
                    build_cache.insert(build_id, fetched.clone());
                    fetched
                }
            };
            let Some(build) = build else {
                warn!(build_id, "Last applied build not found in registry");
                continue;
            };

            let manifest = match manifest_cache
                .get_or_fetch(&repository, &branch, || {
                    manifests.get_dependencies(&repository, &branch)
                })
                .await
            {
                Ok(manifest) => manifest,
                Err(e) => {
                    warn!(
                        repository = %repository,
                        branch = %branch,
                        error = %e,
                        "Cannot read target manifest, assuming product dependency"
                    );
                    continue;
                }
            };

            let tooling_only = !Self::is_product_dependency(&build, &manifest);
            if let Some(edge) = graph.edge_mut(edge_id) {
                edge.tooling_only = tooling_only;
            }
            if tooling_only {
                debug!(repository = %repository, branch = %branch, build_id, "Tooling-only edge");
                tooling_edges += 1;
            }
        }

        Ok(tooling_edges)
    }

    /// True when the manifest has a product dependency named like one of the build's assets.
    pub fn is_product_dependency(build: &Build, manifest: &[DependencyDetail]) -> bool {
        manifest
            .iter()
            .filter(|d| d.dependency_type == DependencyType::Product)
            .any(|d| build.assets.iter().any(|a| a.name.eq_ignore_ascii_case(&d.name)))
    }
}
