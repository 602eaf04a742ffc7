// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Graph expansion from seed jobs, and the sub-project map

use crate::graph::DependencyGraph;
use crate::provider::{AccessControl, AllowAll, EdgeProvider, SubProjectProvider};
use crate::types::{Direction, ProjectNode};
use std::collections::{HashMap, HashSet};
use tracing::{debug, trace};

/// Sub-nodes per node; only nodes with at least one sub-node have an entry
pub type SubprojectMap = HashMap<ProjectNode, Vec<ProjectNode>>;

/// Expands seed nodes into the connected graph of related jobs
pub struct GraphCalculator<'a> {
    edge_providers: Vec<&'a dyn EdgeProvider>,
    access: &'a dyn AccessControl,
}

impl<'a> GraphCalculator<'a> {
    /// Calculator over the given providers, reading everything
    #[must_use]
    pub fn new(edge_providers: Vec<&'a dyn EdgeProvider>) -> Self {
        Self {
            edge_providers,
            access: &AllowAll,
        }
    }

    /// Restrict expansion to nodes `access` lets the caller read
    #[must_use]
    pub fn with_access_control(mut self, access: &'a dyn AccessControl) -> Self {
        self.access = access;
        self
    }

    /// Build the graph reachable from `seeds`.
    ///
    /// Each round asks every provider for both directions of every readable
    /// frontier node; the next frontier is the nodes first seen in that round.
    /// Unreadable nodes stay in the graph but are never expanded.
    pub fn generate_graph<I>(&self, seeds: I) -> DependencyGraph
    where
        I: IntoIterator<Item = ProjectNode>,
    {
        let mut graph = DependencyGraph::new();
        let mut frontier: Vec<ProjectNode> = Vec::new();
        for seed in seeds {
            if graph.add_node(seed.clone()) {
                frontier.push(seed);
            }
        }

        let mut round = 0usize;
        while !frontier.is_empty() {
            round += 1;
            let mut found = Vec::new();
            for node in &frontier {
                if !self.access.can_read(node) {
                    trace!("Not expanding unreadable job {}", node.full_name());
                    continue;
                }
                for provider in &self.edge_providers {
                    for direction in Direction::BOTH {
                        found.extend(provider.edges_incident_with(node, direction));
                    }
                }
            }

            let found_edges = found.len();
            let new_nodes: HashSet<ProjectNode> = graph.add_edges_with_nodes(found);
            debug!(
                round,
                frontier = frontier.len(),
                edges = found_edges,
                new_nodes = new_nodes.len(),
                "expansion round"
            );
            frontier = new_nodes.into_iter().collect();
        }

        debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            rounds = round,
            "graph complete"
        );
        graph
    }
}

/// Collects sub-projects for every node in a graph
pub struct SubprojectCalculator<'a> {
    providers: Vec<&'a dyn SubProjectProvider>,
}

impl<'a> SubprojectCalculator<'a> {
    /// Calculator over the given providers
    #[must_use]
    pub fn new(providers: Vec<&'a dyn SubProjectProvider>) -> Self {
        Self { providers }
    }

    /// One level of sub-projects per node, providers concatenated in order
    #[must_use]
    pub fn generate(&self, graph: &DependencyGraph) -> SubprojectMap {
        let mut map = SubprojectMap::new();
        for node in graph.nodes() {
            let subs: Vec<ProjectNode> = self
                .providers
                .iter()
                .flat_map(|p| p.sub_projects_of(node))
                .collect();
            if !subs.is_empty() {
                map.insert(node.clone(), subs);
            }
        }
        map
    }
}
