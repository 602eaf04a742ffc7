// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Config command - show the effective configuration

use crate::config::{default_config_path, Config};
use anyhow::Result;

/// Show the effective configuration or one key of it
pub fn run(config: &Config, action: &str, key: Option<String>) -> Result<()> {
    match action {
        "show" => print!("{}", config.to_toml()?),
        "get" => {
            let key = key.ok_or_else(|| anyhow::anyhow!("A key is required"))?;
            tracing::debug!("Getting {}", key);
            println!("{}", config.get(&key)?);
        }
        "path" => match default_config_path() {
            Some(path) => println!("{}", path.display()),
            None => anyhow::bail!("No configuration directory on this platform"),
        },
        other => anyhow::bail!("Unknown action: {}. Valid: show, get, path", other),
    }
    Ok(())
}
