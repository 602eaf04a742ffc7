// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Edge management commands - add and remove build triggers between jobs

use super::{graph, load_registry};
use crate::config::Config;
use crate::operations::{EdgeChange, EdgeOperation};
use crate::registry::JobRegistry;
use crate::render::edge_order;
use crate::types::Edge;
use anyhow::{Context, Result};
use owo_colors::OwoColorize;

/// Run edge command
pub fn run(config: &Config, action: &str, from: Option<String>, to: Option<String>, color: bool) -> Result<()> {
    let mut registry = load_registry(config)?;

    match action {
        "add" | "create" => {
            let (from, to) = endpoints(from, to)?;
            let change = EdgeOperation::new(&from, &to).put(&mut registry)?;
            persist(config, &registry, change)?;
            match change {
                EdgeChange::AlreadyPresent => println!("{} already triggers {}", from, to),
                _ => println!("Created trigger: {} -> {}", from, to),
            }
        }

        "remove" | "delete" | "rm" => {
            let (from, to) = endpoints(from, to)?;
            let change = EdgeOperation::new(&from, &to).delete(&mut registry)?;
            persist(config, &registry, change)?;
            match change {
                EdgeChange::Removed(n) => println!("Removed {} trigger(s) from {} -> {}", n, from, to),
                _ => println!("No trigger found from {} -> {}", from, to),
            }
        }

        "list" | "ls" => {
            let edges = list(config, &registry);
            if edges.is_empty() {
                println!("No edges found. Use 'jobgraph edge add' to create a trigger.");
                return Ok(());
            }

            println!("Edges ({}):", edges.len());
            for edge in &edges {
                let kind = edge.kind.to_string();
                if color {
                    println!("  {} --[{}]--> {}", edge.source, kind.cyan(), edge.target);
                } else {
                    println!("  {} --[{}]--> {}", edge.source, kind, edge.target);
                }
            }
        }

        other => {
            anyhow::bail!("Unknown action: {}. Valid: add, remove, list", other);
        }
    }

    Ok(())
}

fn endpoints(from: Option<String>, to: Option<String>) -> Result<(String, String)> {
    let from = from.ok_or_else(|| anyhow::anyhow!("--from is required"))?;
    let to = to.ok_or_else(|| anyhow::anyhow!("--to is required"))?;
    Ok((from, to))
}

/// Save the registry if `change` modified it
pub(crate) fn persist(config: &Config, registry: &JobRegistry, change: EdgeChange) -> Result<()> {
    if change.is_modified() {
        registry
            .save(&config.data_dir)
            .with_context(|| format!("Failed to save jobs to {}", config.data_dir.display()))?;
    }
    Ok(())
}

/// Every edge between readable jobs, sorted for display
#[must_use]
pub fn list(config: &Config, registry: &JobRegistry) -> Vec<Edge> {
    let (graph, _) = graph::build(config, registry, registry.nodes().to_vec());
    let mut edges: Vec<Edge> = graph.edges().cloned().collect();
    edges.sort_by(edge_order);
    edges
}
