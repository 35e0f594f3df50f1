use crate::dependency_flow::domain::{Asset, Build, DependencyDetail};
use crate::dependency_flow::services::FetchCache;
use crate::ports::outbound::BuildRegistry;
use crate::shared::Result;
use anyhow::Context;
use std::collections::HashSet;
use tracing::debug;

/// Chooses which registry asset a dependency update should point at.
///
/// Builds are cached per `repo@commit` of the dependency, package feeds per
/// `repo@commit` of the coherent parent. Both caches live as long as the
/// disambiguator.
pub struct AssetDisambiguator<'a> {
    registry: &'a dyn BuildRegistry,
    builds: FetchCache<Vec<Build>>,
    feeds: FetchCache<Vec<String>>,
}

impl<'a> AssetDisambiguator<'a> {
    pub fn new(registry: &'a dyn BuildRegistry) -> Self {
        Self {
            registry,
            builds: FetchCache::new(),
            feeds: FetchCache::new(),
        }
    }

    /// Finds the asset for `dependency` as observed by `parent`.
    ///
    /// With several candidate builds, prefers the single asset published to one
    /// of the parent's declared feeds. If that does not single one out, the
    /// asset from the highest build id wins.
    ///
    /// # Errors
    /// Returns an error if the build or feed query fails.
    pub async fn disambiguate(
        &self,
        parent: &DependencyDetail,
        dependency: &DependencyDetail,
    ) -> Result<Option<Asset>> {
        let builds = self
            .builds
            .get_or_fetch(&dependency.repo_uri, &dependency.commit, || {
                self.registry
                    .get_builds(&dependency.repo_uri, &dependency.commit)
            })
            .await
            .with_context(|| {
                format!(
                    "Failed to look up builds of {}@{}",
                    dependency.repo_uri, dependency.commit
                )
            })?;

        let mut matching: Vec<(u64, Asset)> = builds
            .iter()
            .filter_map(|b| {
                b.find_asset(&dependency.name, &dependency.version)
                    .map(|a| (b.id, a.clone()))
            })
            .collect();
        matching.sort_by(|a, b| b.0.cmp(&a.0));

        if matching.len() <= 1 {
            return Ok(matching.pop().map(|(_, asset)| asset));
        }

        let feeds = self
            .feeds
            .get_or_fetch(&parent.repo_uri, &parent.commit, || {
                self.registry
                    .get_package_sources(&parent.repo_uri, &parent.commit)
            })
            .await
            .with_context(|| {
                format!(
                    "Failed to look up package sources of {}@{}",
                    parent.repo_uri, parent.commit
                )
            })?;
        let feeds: HashSet<&str> = feeds.iter().map(String::as_str).collect();

        let in_parent_feeds: Vec<&Asset> = matching
            .iter()
            .map(|(_, asset)| asset)
            .filter(|asset| {
                asset
                    .locations
                    .iter()
                    .any(|l| feeds.contains(l.location.as_str()))
            })
            .collect();

        if let [only] = in_parent_feeds.as_slice() {
            return Ok(Some((*only).clone()));
        }

        debug!(
            dependency = %dependency,
            candidates = matching.len(),
            newest_build = matching[0].0,
            "Ambiguous asset, using the newest build"
        );
        Ok(matching.into_iter().next().map(|(_, asset)| asset))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dependency_flow::services::test_support::{build, dep, StubBuilds};

    const X: &str = "https://github.com/org/x";
    const Y: &str = "https://github.com/org/y";

    fn parent() -> DependencyDetail {
        dep("Y.Pkg", "2.0", Y, "y1")
    }

    fn target() -> DependencyDetail {
        dep("X.Pkg", "1.5", X, "x1")
    }

    #[tokio::test]
    async fn test_no_matching_build_yields_none() {
        let registry = StubBuilds::new().with_build(build(1, X, "x1", &[("Other", "1.5", &["f"])]));
        let disambiguator = AssetDisambiguator::new(&registry);

        let asset = disambiguator.disambiguate(&parent(), &target()).await.unwrap();
        assert!(asset.is_none());
    }

    #[tokio::test]
    async fn test_single_build_is_used_without_feed_lookup() {
        let registry =
            StubBuilds::new().with_build(build(1, X, "x1", &[("x.pkg", "1.5", &["https://feed/one"])]));
        let disambiguator = AssetDisambiguator::new(&registry);

        let asset = disambiguator
            .disambiguate(&parent(), &target())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(asset.location_uris(), vec!["https://feed/one".to_string()]);
        assert_eq!(registry.feed_calls(), 0);
    }

    #[tokio::test]
    async fn test_parent_feed_selects_older_build() {
        let registry = StubBuilds::new()
            .with_build(build(5, X, "x1", &[("X.Pkg", "1.5", &["https://feed/public"])]))
            .with_build(build(9, X, "x1", &[("X.Pkg", "1.5", &["https://feed/internal"])]))
            .with_feeds(Y, "y1", &["https://feed/public"]);
        let disambiguator = AssetDisambiguator::new(&registry);

        let asset = disambiguator
            .disambiguate(&parent(), &target())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(asset.location_uris(), vec!["https://feed/public".to_string()]);
    }

    #[tokio::test]
    async fn test_ambiguous_feeds_fall_back_to_newest_build() {
        let registry = StubBuilds::new()
            .with_build(build(5, X, "x1", &[("X.Pkg", "1.5", &["https://feed/a"])]))
            .with_build(build(9, X, "x1", &[("X.Pkg", "1.5", &["https://feed/b"])]))
            .with_build(build(7, X, "x1", &[("X.Pkg", "1.5", &["https://feed/c"])]))
            .with_feeds(Y, "y1", &["https://feed/a", "https://feed/c"]);
        let disambiguator = AssetDisambiguator::new(&registry);

        let asset = disambiguator
            .disambiguate(&parent(), &target())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(asset.location_uris(), vec!["https://feed/b".to_string()]);
    }

    #[tokio::test]
    async fn test_no_feed_match_falls_back_to_newest_build() {
        let registry = StubBuilds::new()
            .with_build(build(3, X, "x1", &[("X.Pkg", "1.5", &["https://feed/a"])]))
            .with_build(build(4, X, "x1", &[("X.Pkg", "1.5", &["https://feed/b"])]));
        let disambiguator = AssetDisambiguator::new(&registry);

        let asset = disambiguator
            .disambiguate(&parent(), &target())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(asset.location_uris(), vec!["https://feed/b".to_string()]);
    }

    #[tokio::test]
    async fn test_builds_and_feeds_are_cached() {
        let registry = StubBuilds::new()
            .with_build(build(1, X, "x1", &[("X.Pkg", "1.5", &["https://feed/a"])]))
            .with_build(build(2, X, "x1", &[("X.Pkg", "1.5", &["https://feed/b"])]));
        let disambiguator = AssetDisambiguator::new(&registry);

        disambiguator.disambiguate(&parent(), &target()).await.unwrap();
        disambiguator.disambiguate(&parent(), &target()).await.unwrap();

        assert_eq!(registry.build_calls(), 1);
        assert_eq!(registry.feed_calls(), 1);
    }
}
