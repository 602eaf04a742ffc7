// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Sorted view of a graph shared by the renderers

use crate::calculator::SubprojectMap;
use crate::graph::DependencyGraph;
use crate::types::{Edge, ProjectNode};
use std::cmp::Ordering;

/// Total order on nodes: display name, then identity
#[must_use]
pub fn node_order(a: &ProjectNode, b: &ProjectNode) -> Ordering {
    a.name()
        .cmp(b.name())
        .then_with(|| a.full_name().cmp(b.full_name()))
}

/// Edge order: grouped by target, then by source, then by kind
#[must_use]
pub fn edge_order(a: &Edge, b: &Edge) -> Ordering {
    node_order(&a.target, &b.target)
        .then_with(|| node_order(&a.source, &b.source))
        .then_with(|| a.kind.cmp(&b.kind))
}

/// A graph with its edges and nodes in render order.
///
/// Every renderer goes through this so output never depends on hash
/// iteration order.
pub struct GraphView<'g> {
    graph: &'g DependencyGraph,
    subprojects: &'g SubprojectMap,
    edges: Vec<&'g Edge>,
    isolated: Vec<&'g ProjectNode>,
    connected: Vec<&'g ProjectNode>,
}

impl<'g> GraphView<'g> {
    /// Sort `graph` for rendering
    #[must_use]
    pub fn new(graph: &'g DependencyGraph, subprojects: &'g SubprojectMap) -> Self {
        let mut edges: Vec<&Edge> = graph.edges().collect();
        edges.sort_by(|a, b| edge_order(a, b));

        let mut isolated = graph.isolated_nodes();
        isolated.sort_by(|a, b| node_order(a, b));

        let mut connected = graph.connected_nodes();
        connected.sort_by(|a, b| node_order(a, b));

        Self {
            graph,
            subprojects,
            edges,
            isolated,
            connected,
        }
    }

    /// The underlying graph
    #[must_use]
    pub fn graph(&self) -> &'g DependencyGraph {
        self.graph
    }

    /// Edges in render order
    #[must_use]
    pub fn edges(&self) -> &[&'g Edge] {
        &self.edges
    }

    /// Nodes without edges, sorted
    #[must_use]
    pub fn isolated(&self) -> &[&'g ProjectNode] {
        &self.isolated
    }

    /// Nodes with edges, sorted
    #[must_use]
    pub fn connected(&self) -> &[&'g ProjectNode] {
        &self.connected
    }

    /// Sub-projects of a node, empty if it has none
    #[must_use]
    pub fn subprojects_of(&self, node: &ProjectNode) -> &'g [ProjectNode] {
        self.subprojects.get(node).map(Vec::as_slice).unwrap_or(&[])
    }
}
