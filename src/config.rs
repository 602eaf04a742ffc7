// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Configuration management
//!
//! Sources, later ones winning: built-in defaults, a TOML file, then
//! `JOBGRAPH_*` environment variables.

use crate::graphviz::{self, DotTool};
use crate::providers::EdgeSource;
use crate::render::{DotOptions, LabelCompaction};
use anyhow::{Context, Result};
use config::{Config as Settings, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Prefix of configuration environment variables
pub const ENV_PREFIX: &str = "JOBGRAPH";

/// Graphviz rank directions
pub const RANK_DIRECTIONS: [&str; 4] = ["TB", "LR", "BT", "RL"];

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding `jobs.json`
    pub data_dir: PathBuf,
    /// Graphviz executable; empty means `dot` on the search path
    pub dot_exe: String,
    /// Whether image formats may run the external tool
    pub graphviz_enabled: bool,
    /// Whether edge mutation requests are accepted
    pub edit_enabled: bool,
    /// Seconds the external tool may run
    pub dot_timeout_secs: u64,
    /// Graphviz `rankdir`
    pub rank_direction: String,
    /// Regex applied to node labels
    pub project_name_strip_regex: String,
    /// Capture group used as the label
    pub project_name_strip_regex_group: usize,
    /// Capture group shown as superscript, 0 for none
    pub project_name_superscript_regex_group: usize,
    /// Enabled relationship sources
    pub edge_sources: Vec<String>,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            dot_exe: String::new(),
            graphviz_enabled: true,
            edit_enabled: false,
            dot_timeout_secs: 30,
            rank_direction: "TB".to_string(),
            project_name_strip_regex: ".*".to_string(),
            project_name_strip_regex_group: 0,
            project_name_superscript_regex_group: 0,
            edge_sources: EdgeSource::ALL.iter().map(ToString::to_string).collect(),
            log_level: "info".to_string(),
        }
    }
}

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("org", "hyperpolymath", "jobgraph")
}

fn default_data_dir() -> PathBuf {
    project_dirs().map_or_else(
        || {
            std::env::current_dir()
                .unwrap_or_else(|_| PathBuf::from("."))
                .join(".jobgraph")
        },
        |d| d.data_dir().to_path_buf(),
    )
}

/// `<config dir>/config.toml`, if a home directory is known
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    project_dirs().map(|d| d.config_dir().join("config.toml"))
}

impl Config {
    /// Load configuration; an explicit `path` must exist, the default one may not
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let defaults = Settings::try_from(&Config::default()).context("Failed to encode defaults")?;
        let mut builder = Settings::builder().add_source(defaults);

        match path {
            Some(path) => {
                debug!("Reading config from {}", path.display());
                builder = builder.add_source(File::from(path).format(FileFormat::Toml).required(true));
            }
            None => {
                if let Some(path) = default_config_path() {
                    builder = builder.add_source(File::from(path).format(FileFormat::Toml).required(false));
                }
            }
        }

        let settings = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("edge_sources"),
            )
            .build()
            .context("Failed to load configuration")?;

        let config: Config = settings
            .try_deserialize()
            .context("Invalid configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that cannot work
    pub fn validate(&self) -> Result<()> {
        if !RANK_DIRECTIONS.contains(&self.rank_direction.as_str()) {
            anyhow::bail!(
                "Invalid rank_direction: {}. Valid: {}",
                self.rank_direction,
                RANK_DIRECTIONS.join(", ")
            );
        }
        for name in &self.edge_sources {
            name.parse::<EdgeSource>().map_err(anyhow::Error::msg)?;
        }
        if self.dot_timeout_secs == 0 {
            anyhow::bail!("dot_timeout_secs must be positive");
        }
        Ok(())
    }

    /// Configured executable, or the platform default
    #[must_use]
    pub fn dot_exe_or_default(&self) -> &str {
        let exe = self.dot_exe.trim();
        if exe.is_empty() {
            graphviz::default_exe()
        } else {
            exe
        }
    }

    /// The external layout tool
    #[must_use]
    pub fn dot_tool(&self) -> DotTool {
        DotTool::new(
            self.dot_exe_or_default(),
            Duration::from_secs(self.dot_timeout_secs),
        )
    }

    /// DOT renderer options
    #[must_use]
    pub fn dot_options(&self) -> DotOptions {
        DotOptions {
            rank_direction: self.rank_direction.clone(),
            compaction: LabelCompaction::new(
                &self.project_name_strip_regex,
                self.project_name_strip_regex_group,
                self.project_name_superscript_regex_group,
            ),
        }
    }

    /// One key as display text
    pub fn get(&self, key: &str) -> Result<String> {
        let value = serde_json::to_value(self).context("Failed to serialize config")?;
        match value.get(key) {
            Some(serde_json::Value::String(s)) => Ok(s.clone()),
            Some(serde_json::Value::Array(items)) => Ok(items
                .iter()
                .map(|v| v.as_str().map_or_else(|| v.to_string(), str::to_string))
                .collect::<Vec<_>>()
                .join(",")),
            Some(other) => Ok(other.to_string()),
            None => anyhow::bail!("Unknown config key: {}", key),
        }
    }

    /// The whole configuration as TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }
}
