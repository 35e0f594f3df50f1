use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// How often a subscription pulls new builds from its channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UpdateFrequency {
    None,
    EveryDay,
    TwiceDaily,
    EveryWeek,
    EveryBuild,
}

impl UpdateFrequency {
    pub const ALL: [UpdateFrequency; 5] = [
        UpdateFrequency::None,
        UpdateFrequency::EveryDay,
        UpdateFrequency::TwiceDaily,
        UpdateFrequency::EveryWeek,
        UpdateFrequency::EveryBuild,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            UpdateFrequency::None => "none",
            UpdateFrequency::EveryDay => "everyDay",
            UpdateFrequency::TwiceDaily => "twiceDaily",
            UpdateFrequency::EveryWeek => "everyWeek",
            UpdateFrequency::EveryBuild => "everyBuild",
        }
    }
}

impl fmt::Display for UpdateFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UpdateFrequency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        UpdateFrequency::ALL
            .into_iter()
            .find(|f| f.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                format!(
                    "Invalid update frequency: {}. Expected one of: none, everyDay, twiceDaily, everyWeek, everyBuild",
                    s
                )
            })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionPolicy {
    pub update_frequency: UpdateFrequency,
    #[serde(default)]
    pub batchable: bool,
}

/// "target repo+branch wants builds of `source_repository` published to `channel`".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    pub id: Uuid,
    pub source_repository: String,
    pub target_repository: String,
    pub target_branch: String,
    pub channel: String,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
    pub policy: SubscriptionPolicy,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_applied_build_id: Option<u64>,
}

/// Builds of `repository`/`branch` are published to `channel` by default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultChannel {
    pub id: u64,
    pub repository: String,
    pub branch: String,
    pub channel: String,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
}

fn enabled_by_default() -> bool {
    true
}

/// Average build durations, in minutes, for one default channel.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BuildTime {
    pub default_channel_id: u64,
    pub official_build_time: f64,
    pub pr_build_time: f64,
    #[serde(default)]
    pub goal_time_in_minutes: i32,
}

impl BuildTime {
    /// Times for a channel the registry knows nothing about.
    pub fn unknown(default_channel_id: u64) -> Self {
        Self {
            default_channel_id,
            ..Self::default()
        }
    }
}
