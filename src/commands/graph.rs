// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Graph command - expand seed jobs and render the dependency graph

use super::{load_registry, seed_nodes, write_output};
use crate::calculator::{GraphCalculator, SubprojectCalculator, SubprojectMap};
use crate::config::Config;
use crate::graph::DependencyGraph;
use crate::providers::ProviderSet;
use crate::registry::JobRegistry;
use crate::render::{self, OutputFormat};
use crate::types::ProjectNode;
use anyhow::Result;
use std::path::PathBuf;
use tracing::info;

/// Expand `seeds` with the configured providers, honouring job read permissions
#[must_use]
pub fn build(
    config: &Config,
    registry: &JobRegistry,
    seeds: Vec<ProjectNode>,
) -> (DependencyGraph, SubprojectMap) {
    let providers = ProviderSet::from_config(registry, &config.edge_sources);
    let graph = GraphCalculator::new(providers.edge_providers())
        .with_access_control(registry)
        .generate_graph(seeds);
    let subprojects = SubprojectCalculator::new(providers.sub_project_providers()).generate(&graph);
    (graph, subprojects)
}

/// Turn rendered text into the response body for `format`
pub fn finish(config: &Config, text: String, format: OutputFormat) -> Result<Vec<u8>> {
    if !format.requires_processing() {
        return Ok(text.into_bytes());
    }
    if !config.graphviz_enabled {
        anyhow::bail!(
            "Graphviz is disabled; {} output needs it. Use gv or json instead.",
            format
        );
    }
    Ok(config.dot_tool().render(&text, format)?)
}

/// Render the graph around the named jobs (all jobs when empty)
pub fn render_body(
    config: &Config,
    registry: &JobRegistry,
    jobs: &[String],
    format: OutputFormat,
) -> Result<Vec<u8>> {
    let seeds = seed_nodes(registry, jobs)?;
    let (graph, subprojects) = build(config, registry, seeds);
    info!(
        "Graph has {} jobs and {} edges",
        graph.node_count(),
        graph.edge_count()
    );
    let text = render::render_graph(format, &graph, &subprojects, &config.dot_options())?;
    finish(config, text, format)
}

/// Run the graph command
pub fn run(config: &Config, jobs: &[String], format: &str, output: Option<PathBuf>) -> Result<()> {
    let format = OutputFormat::from_extension(format)?;
    info!("Rendering graph as {}", format);

    let registry = load_registry(config)?;
    let body = render_body(config, &registry, jobs, format)?;
    write_output(&body, output.as_deref())
}
