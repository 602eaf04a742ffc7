// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//
//! Command implementations

pub mod completions;
pub mod config;
pub mod edge;
pub mod graph;
pub mod legend;
pub mod levels;
pub mod request;

use crate::config::Config;
use crate::error::GraphError;
use crate::registry::JobRegistry;
use crate::types::ProjectNode;
use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::path::Path;

/// Load the job registry from the configured data directory
pub(crate) fn load_registry(config: &Config) -> Result<JobRegistry> {
    JobRegistry::load(&config.data_dir)
        .with_context(|| format!("Failed to load jobs from {}", config.data_dir.display()))
}

/// Nodes for the named jobs, or for every job when no name is given.
///
/// A name that is not a job but a folder stands for all jobs below it.
pub(crate) fn seed_nodes(registry: &JobRegistry, names: &[String]) -> Result<Vec<ProjectNode>> {
    if names.is_empty() {
        if registry.is_empty() {
            eprintln!("Warning: No jobs defined. Add them to jobs.json in the data directory.");
        }
        return Ok(registry.nodes().to_vec());
    }
    let mut seeds = Vec::new();
    for name in names {
        let name = name.trim();
        if let Some(node) = registry.node(name) {
            seeds.push(node);
            continue;
        }
        let prefix = format!("{}/", name.trim_matches('/'));
        let before = seeds.len();
        seeds.extend(
            registry
                .nodes()
                .iter()
                .filter(|n| n.full_name().starts_with(&prefix))
                .cloned(),
        );
        if seeds.len() == before {
            return Err(GraphError::JobNotFound(name.to_string()).into());
        }
    }
    Ok(seeds)
}

/// Write `bytes` to a file, or to stdout
pub(crate) fn write_output(bytes: &[u8], output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            fs::write(path, bytes).with_context(|| format!("Failed to write to {}", path.display()))?;
            println!("Wrote {}", path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(bytes)?;
            stdout.flush()?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{Job, RegistryStore};

    fn registry() -> JobRegistry {
        JobRegistry::from_store(RegistryStore {
            root_url: String::new(),
            jobs: vec![Job::new("a"), Job::new("f/b")],
        })
        .unwrap()
    }

    #[test]
    fn test_seed_nodes_default_to_all() {
        assert_eq!(seed_nodes(&registry(), &[]).unwrap().len(), 2);
    }

    #[test]
    fn test_seed_nodes_by_name() {
        let seeds = seed_nodes(&registry(), &[" f/b ".to_string()]).unwrap();
        assert_eq!(seeds[0].full_name(), "f/b");
    }

    #[test]
    fn test_folder_seeds_its_jobs() {
        let reg = JobRegistry::from_store(RegistryStore {
            root_url: String::new(),
            jobs: vec![Job::new("a"), Job::new("f/b"), Job::new("f/g/c"), Job::new("fx")],
        })
        .unwrap();
        let mut names: Vec<_> = seed_nodes(&reg, &["f".to_string()])
            .unwrap()
            .iter()
            .map(|n| n.full_name().to_string())
            .collect();
        names.sort();
        assert_eq!(names, vec!["f/b", "f/g/c"]);
        assert_eq!(seed_nodes(&reg, &["/f/g/".to_string()]).unwrap().len(), 1);
    }

    #[test]
    fn test_unknown_seed() {
        let err = seed_nodes(&registry(), &["nope".to_string()]).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<GraphError>(),
            Some(GraphError::JobNotFound(_))
        ));
    }
}
