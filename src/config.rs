//! Configuration file support for depflow.
//!
//! Provides YAML-based configuration through `depflow.config.yml` files,
//! including data structures, file loading, and validation.

use anyhow::{bail, Context};
use depflow::application::dto::OutputFormat;
use depflow::dependency_flow::domain::UpdateFrequency;
use depflow::shared::security::read_bounded_file;
use depflow::shared::Result;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub const CONFIG_FILENAME: &str = "depflow.config.yml";

/// Top-level configuration file schema.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    pub snapshot: Option<PathBuf>,
    pub manifests_dir: Option<PathBuf>,
    /// Repository URI to manifests folder.
    pub remotes: Option<HashMap<String, String>>,
    pub include_toolset: Option<bool>,
    pub lookup_builds: Option<bool>,
    pub format: Option<String>,
    pub flow: Option<FlowConfig>,
    /// Captures unknown fields for warnings.
    #[serde(flatten)]
    pub unknown_fields: HashMap<String, serde_yaml_ng::Value>,
}

/// Defaults for the `flow` command.
#[derive(Debug, Deserialize, Default)]
pub struct FlowConfig {
    pub channel: Option<String>,
    pub include_disabled_subscriptions: Option<bool>,
    pub included_frequencies: Option<Vec<String>>,
    pub include_build_times: Option<bool>,
    pub days: Option<u32>,
    #[serde(flatten)]
    pub unknown_fields: HashMap<String, serde_yaml_ng::Value>,
}

impl ConfigFile {
    /// Format from the file, already validated on load.
    pub fn output_format(&self) -> Option<OutputFormat> {
        self.format.as_deref().and_then(|f| f.parse().ok())
    }
}

impl FlowConfig {
    /// Frequencies from the file, already validated on load.
    pub fn frequencies(&self) -> Option<Vec<UpdateFrequency>> {
        self.included_frequencies
            .as_ref()
            .map(|names| names.iter().filter_map(|n| n.parse().ok()).collect())
    }
}

/// Load config from an explicit path. Returns an error if the file is not found.
pub fn load_config_from_path(path: &Path) -> Result<ConfigFile> {
    let content = read_bounded_file(path, "config file").with_context(|| {
        format!(
            "Failed to read config file: {}\n\n💡 Hint: Check that the file exists and is readable.",
            path.display()
        )
    })?;

    let config: ConfigFile = serde_yaml_ng::from_str(&content).with_context(|| {
        format!(
            "Failed to parse config file: {}\n\n💡 Hint: Ensure the file contains valid YAML syntax.",
            path.display()
        )
    })?;

    validate_config(&config)?;
    warn_unknown_fields(&config);

    Ok(config)
}

/// Auto-discover config in a directory. Returns `None` silently if not found.
pub fn discover_config(dir: &Path) -> Result<Option<ConfigFile>> {
    let config_path = dir.join(CONFIG_FILENAME);

    if !config_path.exists() {
        return Ok(None);
    }

    let config = load_config_from_path(&config_path)?;
    Ok(Some(config))
}

/// Validate the loaded configuration.
fn validate_config(config: &ConfigFile) -> Result<()> {
    if let Some(format) = config.format.as_deref() {
        if let Err(e) = format.parse::<OutputFormat>() {
            bail!(
                "Invalid config: format.\n{}\n\n💡 Hint: Use one of: text, json, dot.",
                e
            );
        }
    }

    if let Some(remotes) = &config.remotes {
        for (uri, folder) in remotes {
            if uri.trim().is_empty() || folder.trim().is_empty() {
                bail!(
                    "Invalid config: remotes entries must have a non-empty URI and folder.\n\n\
                     💡 Hint: Write each entry as `https://github.com/org/repo: repo-folder`."
                );
            }
        }
    }

    if let Some(flow) = &config.flow {
        for (i, name) in flow.included_frequencies.iter().flatten().enumerate() {
            if let Err(e) = name.parse::<UpdateFrequency>() {
                bail!(
                    "Invalid config: flow.included_frequencies[{}].\n{}\n\n\
                     💡 Hint: Frequencies are none, everyDay, twiceDaily, everyWeek or everyBuild.",
                    i,
                    e
                );
            }
        }
        if flow.days == Some(0) {
            bail!(
                "Invalid config: flow.days must be at least 1.\n\n\
                 💡 Hint: Build times are averaged over the last N days."
            );
        }
    }

    Ok(())
}

/// Warn about unknown fields in the config file.
fn warn_unknown_fields(config: &ConfigFile) {
    for key in config.unknown_fields.keys() {
        eprintln!("⚠️  Warning: Unknown config field '{}' will be ignored.", key);
    }
    if let Some(flow) = &config.flow {
        for key in flow.unknown_fields.keys() {
            eprintln!(
                "⚠️  Warning: Unknown config field 'flow.{}' will be ignored.",
                key
            );
        }
    }
}
