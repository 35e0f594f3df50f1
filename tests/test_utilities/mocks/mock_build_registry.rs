use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use depflow::prelude::*;
use std::collections::HashMap;

/// Mock BuildRegistry for testing
#[derive(Default, Clone)]
pub struct MockBuildRegistry {
    builds: Vec<Build>,
    package_sources: HashMap<String, Vec<String>>,
}

#[allow(dead_code)]
impl MockBuildRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a build producing `assets` as `(name, version, feed)` triples.
    pub fn with_build(
        mut self,
        id: u64,
        repo_uri: &str,
        commit: &str,
        assets: &[(&str, &str, &str)],
    ) -> Self {
        self.builds.push(Build {
            id,
            repository: repo_uri.to_string(),
            commit: commit.to_string(),
            build_number: format!("2024.{}", id),
            date_produced: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            assets: assets
                .iter()
                .map(|(name, version, feed)| Asset {
                    name: name.to_string(),
                    version: version.to_string(),
                    locations: vec![AssetLocation {
                        location: feed.to_string(),
                        location_type: LocationType::NugetFeed,
                    }],
                })
                .collect(),
        });
        self
    }

    pub fn with_package_sources(mut self, repo_uri: &str, commit: &str, feeds: &[&str]) -> Self {
        self.package_sources.insert(
            format!("{}@{}", repo_uri.to_lowercase(), commit),
            feeds.iter().map(|f| f.to_string()).collect(),
        );
        self
    }
}

#[async_trait]
impl BuildRegistry for MockBuildRegistry {
    async fn get_builds(&self, repo_uri: &str, commit: &str) -> Result<Vec<Build>> {
        Ok(self
            .builds
            .iter()
            .filter(|b| b.repository.eq_ignore_ascii_case(repo_uri) && b.commit == commit)
            .cloned()
            .collect())
    }

    async fn get_build(&self, id: u64) -> Result<Option<Build>> {
        Ok(self.builds.iter().find(|b| b.id == id).cloned())
    }

    async fn get_package_sources(&self, repo_uri: &str, commit: &str) -> Result<Vec<String>> {
        Ok(self
            .package_sources
            .get(&format!("{}@{}", repo_uri.to_lowercase(), commit))
            .cloned()
            .unwrap_or_default())
    }
}
