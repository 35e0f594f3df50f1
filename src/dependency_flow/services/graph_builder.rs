use crate::dependency_flow::domain::{
    repo_commit_key, Build, DependencyDetail, DependencyGraph, DependencyType, NodeId,
};
use crate::dependency_flow::services::FetchCache;
use crate::ports::outbound::{BuildRegistry, ManifestSource};
use crate::shared::error::FlowError;
use crate::shared::Result;
use anyhow::Context;
use std::collections::{HashMap, HashSet};
use tracing::{debug, error, info, warn};

/// Where a graph build starts.
#[derive(Debug, Clone)]
pub struct GraphRoot {
    pub repository: String,
    pub commit: String,
    /// Pre-resolved root dependencies; when `None` they are read from the
    /// manifest source at `repository@commit`.
    pub dependencies: Option<Vec<DependencyDetail>>,
}

impl GraphRoot {
    pub fn at(repository: &str, commit: &str) -> Self {
        Self {
            repository: repository.to_string(),
            commit: commit.to_string(),
            dependencies: None,
        }
    }

    pub fn with_dependencies(mut self, dependencies: Vec<DependencyDetail>) -> Self {
        self.dependencies = Some(dependencies);
        self
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct GraphBuildOptions {
    pub include_toolset: bool,
    /// Attach the builds that produced each node's incoming dependencies.
    pub lookup_builds: bool,
    /// Record the node paths that close each skipped cycle.
    pub compute_cycle_paths: bool,
}

/// Builds a [`DependencyGraph`] by walking manifests across repositories.
///
/// The walk is an explicit depth-first worklist of nodes. Each node carries the
/// visited repositories of the path it was first reached on, so a repository
/// reachable through two unrelated paths is not mistaken for a cycle.
pub struct DependencyGraphBuilder;

impl DependencyGraphBuilder {
    /// Builds the transitive dependency graph rooted at `root`.
    ///
    /// # Errors
    /// - [`FlowError::MissingManifestSource`] when `manifests` is `None`
    /// - [`FlowError::EmptyRootDependencies`] when root dependencies are supplied but empty
    /// - [`FlowError::Validation`] when build lookup is requested without a registry
    /// - any manifest or build fetch failure, which aborts the whole build
    pub async fn build(
        root: GraphRoot,
        manifests: Option<&dyn ManifestSource>,
        builds: Option<&dyn BuildRegistry>,
        options: GraphBuildOptions,
    ) -> Result<DependencyGraph> {
        let manifests = manifests.ok_or(FlowError::MissingManifestSource)?;
        if matches!(root.dependencies.as_deref(), Some([])) {
            return Err(FlowError::EmptyRootDependencies.into());
        }
        let registry = match (options.lookup_builds, builds) {
            (true, None) => {
                return Err(FlowError::Validation {
                    message: "Build lookup requires a build registry".to_string(),
                }
                .into())
            }
            (true, Some(registry)) => Some(registry),
            (false, _) => None,
        };

        info!(
            repository = %root.repository,
            commit = %root.commit,
            "Starting dependency graph build"
        );

        let build_cache: FetchCache<Vec<Build>> = FetchCache::new();
        let root_dependencies = match root.dependencies {
            Some(dependencies) => filter_toolset(dependencies, options.include_toolset),
            None => {
                fetch_dependencies(
                    manifests,
                    &root.repository,
                    &root.commit,
                    options.include_toolset,
                )
                .await?
            }
        };

        let mut graph = DependencyGraph::with_root(&root.repository, &root.commit);
        let root_id = graph.root();
        for dependency in &root_dependencies {
            graph.record_dependency(dependency);
        }
        graph.node_mut(root_id).dependencies = root_dependencies;

        // Builds at each node's repo@commit, filtered once every parent is known.
        let mut node_builds: HashMap<NodeId, Vec<Build>> = HashMap::new();
        if let Some(registry) = registry {
            let builds = fetch_builds(registry, &build_cache, &root.repository, &root.commit).await?;
            node_builds.insert(root_id, builds);
        }

        let mut first_node_for_repo: HashMap<String, NodeId> = HashMap::new();
        let mut first_seen_by_name: HashMap<String, DependencyDetail> = HashMap::new();
        let mut root_visited = HashSet::new();
        root_visited.insert(root.repository.clone());
        // Visited set of the path each node was first reached on.
        let mut path_visited: HashMap<NodeId, HashSet<String>> = HashMap::new();
        path_visited.insert(root_id, root_visited);
        let mut worklist: Vec<NodeId> = vec![root_id];

        while let Some(node_id) = worklist.pop() {
            let (repository, commit) = {
                let node = graph.node(node_id);
                (node.repository.clone(), node.commit.clone())
            };
            debug!(repository = %repository, commit = %commit, "Visiting node");

            let dependencies = if node_id == root_id {
                graph.node(root_id).dependencies.clone()
            } else {
                let fetched =
                    fetch_dependencies(manifests, &repository, &commit, options.include_toolset)
                        .await?;
                graph.node_mut(node_id).dependencies = fetched.clone();
                fetched
            };
            let visited = path_visited.get(&node_id).cloned().unwrap_or_default();

            for dependency in &dependencies {
                if !dependency.has_source_info() {
                    warn!(
                        dependency = %dependency,
                        repository = %repository,
                        commit = %commit,
                        "Dependency is missing repository uri or commit information, skipping"
                    );
                    continue;
                }

                if visited.contains(&dependency.repo_uri) {
                    info!(
                        repository = %repository,
                        commit = %commit,
                        target = %dependency.repo_uri,
                        "Dependency introduces a cycle, skipping"
                    );
                    if options.compute_cycle_paths {
                        let paths =
                            cycle_paths(&graph, &path_visited, node_id, &dependency.repo_uri);
                        for path in paths {
                            graph.record_cycle(path);
                        }
                    }
                    continue;
                }

                graph.record_dependency(dependency);
                match first_seen_by_name.get(&dependency.name) {
                    Some(existing)
                        if existing.version != dependency.version
                            || existing.commit != dependency.commit =>
                    {
                        let existing = existing.clone();
                        graph.mark_incoherent_dependency(&existing);
                        graph.mark_incoherent_dependency(dependency);
                    }
                    Some(_) => {}
                    None => {
                        first_seen_by_name.insert(dependency.name.clone(), dependency.clone());
                    }
                }

                let (child, created) = graph.insert_node(&dependency.repo_uri, &dependency.commit);
                graph.link(node_id, child);
                if !created {
                    debug!(
                        repository = %dependency.repo_uri,
                        commit = %dependency.commit,
                        "Node already exists, adding as child"
                    );
                    continue;
                }

                if let Some(registry) = registry {
                    let builds = fetch_builds(
                        registry,
                        &build_cache,
                        &dependency.repo_uri,
                        &dependency.commit,
                    )
                    .await?;
                    node_builds.insert(child, builds);
                }

                let mut child_visited = visited.clone();
                child_visited.insert(dependency.repo_uri.clone());
                path_visited.insert(child, child_visited);
                worklist.push(child);

                match first_node_for_repo.get(&dependency.repo_uri) {
                    Some(&first) => {
                        graph.mark_incoherent_node(first);
                        graph.mark_incoherent_node(child);
                    }
                    None => {
                        first_node_for_repo.insert(dependency.repo_uri.clone(), child);
                    }
                }
            }
        }

        for (node_id, builds) in node_builds {
            let contributing = builds
                .into_iter()
                .filter(|b| node_id == root_id || contributes_to_node(&graph, node_id, b))
                .collect();
            graph.node_mut(node_id).contributing_builds = contributing;
        }

        info!(
            nodes = graph.node_count(),
            unique_dependencies = graph.unique_dependencies().len(),
            incoherent_nodes = graph.incoherent_nodes().count(),
            cycles = graph.cycles().len(),
            "Dependency graph build complete"
        );

        Ok(graph)
    }
}

/// True when `build` produced an asset named by any parent's dependency on `node_id`.
fn contributes_to_node(graph: &DependencyGraph, node_id: NodeId, build: &Build) -> bool {
    let node = graph.node(node_id);
    let key = node.key();
    node.parents.iter().any(|&parent| {
        graph
            .node(parent)
            .dependencies
            .iter()
            .filter(|d| repo_commit_key(&d.repo_uri, &d.commit) == key)
            .any(|d| build.produced(&d.name, &d.version))
    })
}

/// Paths from the node of `cycle_root` down to `node_id`, following parents
/// whose path already held `cycle_root`.
fn cycle_paths(
    graph: &DependencyGraph,
    path_visited: &HashMap<NodeId, HashSet<String>>,
    node_id: NodeId,
    cycle_root: &str,
) -> Vec<Vec<NodeId>> {
    let mut paths = Vec::new();
    let mut stack: Vec<Vec<NodeId>> = vec![vec![node_id]];
    while let Some(path) = stack.pop() {
        let Some(&head) = path.last() else {
            continue;
        };
        if graph.node(head).repository == cycle_root {
            paths.push(path.into_iter().rev().collect());
            continue;
        }
        for &parent in &graph.node(head).parents {
            let on_path = path_visited
                .get(&parent)
                .is_some_and(|v| v.contains(cycle_root));
            if on_path && !path.contains(&parent) {
                let mut extended = path.clone();
                extended.push(parent);
                stack.push(extended);
            }
        }
    }
    paths
}

fn filter_toolset(dependencies: Vec<DependencyDetail>, include_toolset: bool) -> Vec<DependencyDetail> {
    if include_toolset {
        return dependencies;
    }
    dependencies
        .into_iter()
        .filter(|d| d.dependency_type != DependencyType::Toolset)
        .collect()
}

async fn fetch_dependencies(
    manifests: &dyn ManifestSource,
    repository: &str,
    commit: &str,
    include_toolset: bool,
) -> Result<Vec<DependencyDetail>> {
    let dependencies = manifests
        .get_dependencies(repository, commit)
        .await
        .inspect_err(|e| {
            error!(repository, commit, error = %e, "Failed to get dependencies");
        })
        .with_context(|| format!("Failed to get dependencies at {}@{}", repository, commit))?;
    Ok(filter_toolset(dependencies, include_toolset))
}

async fn fetch_builds(
    registry: &dyn BuildRegistry,
    cache: &FetchCache<Vec<Build>>,
    repository: &str,
    commit: &str,
) -> Result<Vec<Build>> {
    cache
        .get_or_fetch(repository, commit, || registry.get_builds(repository, commit))
        .await
        .with_context(|| format!("Failed to look up builds of {}@{}", repository, commit))
}
