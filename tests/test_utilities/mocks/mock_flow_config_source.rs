use async_trait::async_trait;
use depflow::prelude::*;
use std::collections::HashMap;
use uuid::Uuid;

/// Mock FlowConfigSource for testing
#[derive(Default, Clone)]
pub struct MockFlowConfigSource {
    default_channels: Vec<DefaultChannel>,
    subscriptions: Vec<Subscription>,
    build_times: HashMap<u64, BuildTime>,
}

#[allow(dead_code)]
impl MockFlowConfigSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publishes `repo_uri`'s main branch to `channel` with the given official build time.
    pub fn with_channel(mut self, id: u64, repo_uri: &str, channel: &str, minutes: f64) -> Self {
        self.default_channels.push(DefaultChannel {
            id,
            repository: repo_uri.to_string(),
            branch: "main".to_string(),
            channel: channel.to_string(),
            enabled: true,
        });
        self.build_times.insert(
            id,
            BuildTime {
                default_channel_id: id,
                official_build_time: minutes,
                pr_build_time: minutes / 2.0,
                goal_time_in_minutes: 0,
            },
        );
        self
    }

    /// `target`'s main branch subscribes to builds of `source` on `channel`.
    pub fn with_subscription(
        mut self,
        source: &str,
        target: &str,
        channel: &str,
        frequency: UpdateFrequency,
        enabled: bool,
    ) -> Self {
        self.subscriptions.push(Subscription {
            id: Uuid::new_v4(),
            source_repository: source.to_string(),
            target_repository: target.to_string(),
            target_branch: "main".to_string(),
            channel: channel.to_string(),
            enabled,
            policy: SubscriptionPolicy {
                update_frequency: frequency,
                batchable: false,
            },
            last_applied_build_id: None,
        });
        self
    }
}

#[async_trait]
impl FlowConfigSource for MockFlowConfigSource {
    async fn get_default_channels(&self) -> Result<Vec<DefaultChannel>> {
        Ok(self.default_channels.clone())
    }

    async fn get_subscriptions(&self) -> Result<Vec<Subscription>> {
        Ok(self.subscriptions.clone())
    }

    async fn get_build_time(&self, default_channel_id: u64, _days: u32) -> Result<BuildTime> {
        Ok(self
            .build_times
            .get(&default_channel_id)
            .copied()
            .unwrap_or_else(|| BuildTime::unknown(default_channel_id)))
    }
}
