//! In-memory ports shared by the service tests.

use crate::dependency_flow::domain::{
    repo_commit_key, Asset, AssetLocation, Build, BuildTime, DefaultChannel, DependencyDetail,
    LocationType, Subscription,
};
use crate::ports::outbound::{BuildRegistry, FlowConfigSource, ManifestSource, ProgressReporter};
use crate::shared::error::FlowError;
use crate::shared::Result;
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

pub(crate) const NO_LOCATIONS: &[&str] = &[];

pub(crate) fn dep(name: &str, version: &str, repo: &str, commit: &str) -> DependencyDetail {
    DependencyDetail::new(name, version, repo, commit)
}

/// A build whose assets are `(name, version, locations)`.
pub(crate) fn build(id: u64, repo: &str, commit: &str, assets: &[(&str, &str, &[&str])]) -> Build {
    Build {
        id,
        repository: repo.to_string(),
        commit: commit.to_string(),
        build_number: format!("2024{:04}.1", id),
        date_produced: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        assets: assets
            .iter()
            .map(|(name, version, locations)| Asset {
                name: name.to_string(),
                version: version.to_string(),
                locations: locations
                    .iter()
                    .map(|l| AssetLocation {
                        location: l.to_string(),
                        location_type: LocationType::NugetFeed,
                    })
                    .collect(),
            })
            .collect(),
    }
}

#[derive(Default)]
pub(crate) struct StubManifests {
    manifests: HashMap<String, Vec<DependencyDetail>>,
    calls: AtomicUsize,
}

impl StubManifests {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with(mut self, repo: &str, commit: &str, deps: Vec<DependencyDetail>) -> Self {
        self.manifests.insert(repo_commit_key(repo, commit), deps);
        self
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ManifestSource for StubManifests {
    async fn get_dependencies(&self, repo_uri: &str, commit: &str) -> Result<Vec<DependencyDetail>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.manifests
            .get(&repo_commit_key(repo_uri, commit))
            .cloned()
            .ok_or_else(|| {
                FlowError::ManifestNotFound {
                    repository: repo_uri.to_string(),
                    commit: commit.to_string(),
                }
                .into()
            })
    }
}

#[derive(Default)]
pub(crate) struct StubBuilds {
    builds: Vec<Build>,
    feeds: HashMap<String, Vec<String>>,
    build_calls: AtomicUsize,
    feed_calls: AtomicUsize,
}

impl StubBuilds {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_build(mut self, build: Build) -> Self {
        self.builds.push(build);
        self
    }

    pub(crate) fn with_feeds(mut self, repo: &str, commit: &str, feeds: &[&str]) -> Self {
        self.feeds.insert(
            repo_commit_key(repo, commit),
            feeds.iter().map(|f| f.to_string()).collect(),
        );
        self
    }

    pub(crate) fn build_calls(&self) -> usize {
        self.build_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn feed_calls(&self) -> usize {
        self.feed_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BuildRegistry for StubBuilds {
    async fn get_builds(&self, repo_uri: &str, commit: &str) -> Result<Vec<Build>> {
        self.build_calls.fetch_add(1, Ordering::SeqCst);
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
        self.feed_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .feeds
            .get(&repo_commit_key(repo_uri, commit))
            .cloned()
            .unwrap_or_default())
    }
}

#[derive(Default)]
pub(crate) struct StubFlowConfig {
    default_channels: Vec<DefaultChannel>,
    subscriptions: Vec<Subscription>,
    build_times: HashMap<u64, BuildTime>,
    build_time_calls: AtomicUsize,
}

impl StubFlowConfig {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_flow(
        mut self,
        default_channels: Vec<DefaultChannel>,
        subscriptions: Vec<Subscription>,
    ) -> Self {
        self.default_channels = default_channels;
        self.subscriptions = subscriptions;
        self
    }

    pub(crate) fn with_build_time(mut self, time: BuildTime) -> Self {
        self.build_times.insert(time.default_channel_id, time);
        self
    }

    pub(crate) fn build_time_calls(&self) -> usize {
        self.build_time_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FlowConfigSource for StubFlowConfig {
    async fn get_default_channels(&self) -> Result<Vec<DefaultChannel>> {
        Ok(self.default_channels.clone())
    }

    async fn get_subscriptions(&self) -> Result<Vec<Subscription>> {
        Ok(self.subscriptions.clone())
    }

    async fn get_build_time(&self, default_channel_id: u64, _days: u32) -> Result<BuildTime> {
        self.build_time_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .build_times
            .get(&default_channel_id)
            .copied()
            .unwrap_or_else(|| BuildTime::unknown(default_channel_id)))
    }
}

/// Progress reporter that keeps every message for assertions.
#[derive(Default)]
pub(crate) struct RecordingReporter {
    messages: Mutex<Vec<String>>,
}

impl RecordingReporter {
    pub(crate) fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }

    fn push(&self, message: String) {
        self.messages.lock().unwrap().push(message);
    }
}

impl ProgressReporter for RecordingReporter {
    fn report(&self, message: &str) {
        self.push(message.to_string());
    }

    fn report_progress(&self, current: usize, total: usize, message: Option<&str>) {
        self.push(format!("[{}/{}] {}", current, total, message.unwrap_or_default()));
    }

    fn report_error(&self, message: &str) {
        self.push(message.to_string());
    }

    fn report_completion(&self, message: &str) {
        self.push(message.to_string());
    }
}
