// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Levels command - longest upstream chain for each job

use super::{graph, load_registry, seed_nodes};
use crate::config::Config;
use crate::error::GraphError;
use crate::level::{levels, CyclePolicy};
use crate::registry::JobRegistry;
use crate::render::node_order;
use crate::types::ProjectNode;
use anyhow::Result;
use serde::Serialize;

/// A job and its level
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LevelEntry {
    /// Job full name
    pub job: String,
    /// 1 for a job without parents, else one more than its deepest parent
    pub level: usize,
}

/// Levels of every job in the graph around `jobs`, shallowest first
pub fn compute(
    config: &Config,
    registry: &JobRegistry,
    jobs: &[String],
    policy: CyclePolicy,
) -> Result<Vec<LevelEntry>> {
    let seeds = seed_nodes(registry, jobs)?;
    let (graph, _) = graph::build(config, registry, seeds);

    let levels = match levels(&graph, policy) {
        Ok(levels) => levels,
        Err(e @ GraphError::CyclicRelationship { .. }) => {
            return Err(anyhow::Error::new(e).context("Hint: pass --ignore-cycles to skip back edges"));
        }
        Err(e) => return Err(e.into()),
    };

    let mut sorted: Vec<(&ProjectNode, usize)> = levels.iter().map(|(n, l)| (n, *l)).collect();
    sorted.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| node_order(a.0, b.0)));
    Ok(sorted
        .into_iter()
        .map(|(node, level)| LevelEntry {
            job: node.full_name().to_string(),
            level,
        })
        .collect())
}

/// Run the levels command
pub fn run(config: &Config, jobs: &[String], ignore_cycles: bool, json: bool) -> Result<()> {
    let policy = if ignore_cycles {
        CyclePolicy::IgnoreBackEdges
    } else {
        CyclePolicy::Fail
    };
    let registry = load_registry(config)?;
    let entries = compute(config, &registry, jobs, policy)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }
    for entry in &entries {
        println!("{:>4}  {}", entry.level, entry.job);
    }
    Ok(())
}
