use crate::dependency_flow::domain::{BuildTime, DefaultChannel, Subscription};
use crate::shared::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// FlowConfigSource port for channel and subscription configuration
#[async_trait]
pub trait FlowConfigSource: Send + Sync {
    async fn get_default_channels(&self) -> Result<Vec<DefaultChannel>>;

    async fn get_subscriptions(&self) -> Result<Vec<Subscription>>;

    /// Average build times for a default channel over the last `days` days
    ///
    /// # Arguments
    /// * `default_channel_id` - Id of the default channel; 0 means unknown
    /// * `days` - Size of the averaging window
    async fn get_build_time(&self, default_channel_id: u64, days: u32) -> Result<BuildTime>;
}

#[async_trait]
impl<T: FlowConfigSource + ?Sized> FlowConfigSource for Arc<T> {
    async fn get_default_channels(&self) -> Result<Vec<DefaultChannel>> {
        (**self).get_default_channels().await
    }

    async fn get_subscriptions(&self) -> Result<Vec<Subscription>> {
        (**self).get_subscriptions().await
    }

    async fn get_build_time(&self, default_channel_id: u64, days: u32) -> Result<BuildTime> {
        (**self).get_build_time(default_channel_id, days).await
    }
}
