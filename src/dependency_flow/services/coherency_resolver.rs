use crate::dependency_flow::domain::{
    Asset, CoherencyError, DependencyDetail, DependencyUpdate,
};
use crate::dependency_flow::services::{AssetDisambiguator, FetchCache};
use crate::ports::outbound::{BuildRegistry, ManifestSource};
use crate::shared::error::FlowError;
use crate::shared::Result;
use anyhow::Context;
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// Resolves coherent-parent constraints for one manifest.
///
/// A resolver owns its manifest, build and feed caches, so create one per
/// resolution pass.
pub struct CoherencyResolver<'a> {
    manifests: &'a dyn ManifestSource,
    manifest_cache: FetchCache<Vec<DependencyDetail>>,
    disambiguator: AssetDisambiguator<'a>,
}

impl<'a> CoherencyResolver<'a> {
    pub fn new(manifests: &'a dyn ManifestSource, registry: &'a dyn BuildRegistry) -> Self {
        Self {
            manifests,
            manifest_cache: FetchCache::new(),
            disambiguator: AssetDisambiguator::new(registry),
        }
    }

    /// Updates needed to take the assets of a new build from `source_repo`.
    ///
    /// Only dependencies without a coherent parent are considered; pinned
    /// dependencies and dependencies that already match are left alone.
    pub fn required_non_coherency_updates(
        source_repo: &str,
        source_commit: &str,
        assets: &[Asset],
        dependencies: &[DependencyDetail],
    ) -> Vec<DependencyUpdate> {
        let mut updates: Vec<DependencyUpdate> = Vec::new();

        for asset in assets {
            let Some(current) = dependencies
                .iter()
                .find(|d| d.is_named(&asset.name) && !d.has_coherent_parent())
            else {
                continue;
            };

            if current.pinned || updates.iter().any(|u| u.from.is_named(&current.name)) {
                continue;
            }

            let mut to = current.clone();
            to.name = asset.name.clone();
            to.version = asset.version.clone();
            to.repo_uri = source_repo.to_string();
            to.commit = source_commit.to_string();
            to.locations = asset.location_uris();

            if current.same_source(&to) {
                continue;
            }

            updates.push(DependencyUpdate {
                from: current.clone(),
                to,
            });
        }

        updates
    }

    /// Computes the updates that make every coherent-parent chain consistent.
    ///
    /// Chains are walked from their leaves up to a pinned dependency or one
    /// without a parent, then resolved head first so each link is compared
    /// with its parent's already-updated value. A link whose parent manifest
    /// lacks it abandons the rest of that chain only; all such failures are
    /// reported together at the end.
    ///
    /// # Errors
    /// - [`FlowError::NonExistentParent`] when a parent name is not in `dependencies`
    /// - [`FlowError::CoherencyUpdateFailed`] carrying every broken link
    /// - any manifest, build or feed fetch failure
    pub async fn resolve(&self, dependencies: &[DependencyDetail]) -> Result<Vec<DependencyUpdate>> {
        let mut updates: Vec<DependencyUpdate> = Vec::new();
        let mut errors: BTreeMap<(String, String, String), CoherencyError> = BTreeMap::new();

        let leaves = dependencies.iter().filter(|d| {
            d.has_coherent_parent()
                && !dependencies.iter().any(|other| {
                    !other.pinned
                        && other
                            .coherent_parent
                            .as_deref()
                            .is_some_and(|p| p.eq_ignore_ascii_case(&d.name))
                })
        });

        for leaf in leaves {
            let mut chain = Self::walk_chain(leaf, dependencies)?;
            debug!(leaf = %leaf, length = chain.len(), "Resolving coherency chain");

            while let Some(link) = chain.pop() {
                if updates.iter().any(|u| u.from.is_named(&link.name)) {
                    continue;
                }
                let Some(parent_name) = link.coherent_parent.as_deref() else {
                    continue;
                };

                // An already-updated parent wins over the manifest's value.
                let parent = updates
                    .iter()
                    .map(|u| &u.to)
                    .find(|d| d.is_named(parent_name))
                    .or_else(|| dependencies.iter().find(|d| d.is_named(parent_name)))
                    .cloned()
                    .ok_or_else(|| FlowError::NonExistentParent {
                        dependency: link.name.clone(),
                        parent: parent_name.to_string(),
                    })?;

                let parent_manifest = self
                    .manifest_cache
                    .get_or_fetch(&parent.repo_uri, &parent.commit, || {
                        self.manifests
                            .get_dependencies(&parent.repo_uri, &parent.commit)
                    })
                    .await
                    .with_context(|| {
                        format!(
                            "Failed to get dependencies at {}@{}",
                            parent.repo_uri, parent.commit
                        )
                    })?;

                let Some(observed) = parent_manifest.iter().find(|d| d.is_named(&link.name)) else {
                    warn!(
                        dependency = %link,
                        parent_repository = %parent.repo_uri,
                        parent_commit = %parent.commit,
                        "Coherent parent does not declare dependency"
                    );
                    errors
                        .entry((
                            parent.repo_uri.clone(),
                            parent.commit.clone(),
                            link.name.clone(),
                        ))
                        .or_insert_with(|| {
                            CoherencyError::missing_in_parent(
                                link.clone(),
                                &parent.repo_uri,
                                &parent.commit,
                            )
                        });
                    chain.clear();
                    break;
                };

                if observed.same_source(&link) {
                    continue;
                }

                let mut to = link.clone();
                to.name = observed.name.clone();
                to.version = observed.version.clone();
                to.repo_uri = observed.repo_uri.clone();
                to.commit = observed.commit.clone();
                to.locations = self
                    .disambiguator
                    .disambiguate(&parent, &to)
                    .await?
                    .map(|asset| asset.location_uris())
                    .unwrap_or_default();

                info!(from = %link, to = %to, parent = %parent, "Coherency update");
                updates.push(DependencyUpdate { from: link, to });
            }
        }

        if !errors.is_empty() {
            return Err(FlowError::CoherencyUpdateFailed {
                errors: errors.into_values().collect(),
            }
            .into());
        }

        Ok(updates)
    }

    /// Links from `leaf` up to, but excluding, the chain head. Head-nearest last.
    fn walk_chain(
        leaf: &DependencyDetail,
        dependencies: &[DependencyDetail],
    ) -> Result<Vec<DependencyDetail>> {
        let mut chain = Vec::new();
        let mut current = leaf;

        while !current.pinned {
            let Some(parent_name) = current
                .coherent_parent
                .as_deref()
                .filter(|p| !p.trim().is_empty())
            else {
                break;
            };
            chain.push(current.clone());
            current = dependencies
                .iter()
                .find(|d| d.is_named(parent_name))
                .ok_or_else(|| FlowError::NonExistentParent {
                    dependency: current.name.clone(),
                    parent: parent_name.to_string(),
                })?;
            // Parent pointers may loop back on themselves.
            if chain.len() > dependencies.len() {
                break;
            }
        }

        Ok(chain)
    }
}
