// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Graph data structures for the job dependency graph

use crate::types::{Edge, ProjectNode};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::unionfind::UnionFind;
use petgraph::Direction as Side;
use std::collections::{HashMap, HashSet};

/// The dependency graph which gets drawn.
///
/// A directed multigraph: distinct edges (differing in kind) may connect the
/// same ordered pair of nodes. The graph only grows; nothing is ever removed.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    /// The underlying directed graph
    graph: DiGraph<ProjectNode, Edge>,
    /// Map from node to its index in `graph`
    node_indices: HashMap<ProjectNode, NodeIndex>,
    /// Structural de-duplication of edges
    edge_set: HashSet<Edge>,
}

impl DependencyGraph {
    /// Create a new empty graph
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node, returning `true` if it was not present before
    pub fn add_node(&mut self, node: ProjectNode) -> bool {
        if self.node_indices.contains_key(&node) {
            return false;
        }
        let idx = self.graph.add_node(node.clone());
        self.node_indices.insert(node, idx);
        true
    }

    /// Add several nodes
    pub fn add_nodes<I>(&mut self, nodes: I)
    where
        I: IntoIterator<Item = ProjectNode>,
    {
        for node in nodes {
            self.add_node(node);
        }
    }

    /// Add an edge, inserting missing endpoints.
    ///
    /// Returns `false` if an equal edge is already stored.
    pub fn add_edge(&mut self, edge: Edge) -> bool {
        if self.edge_set.contains(&edge) {
            return false;
        }
        let from = self.ensure_node(&edge.source);
        let to = self.ensure_node(&edge.target);
        self.graph.add_edge(from, to, edge.clone());
        self.edge_set.insert(edge);
        true
    }

    /// Add edges and return the endpoints that were not in the graph before
    pub fn add_edges_with_nodes<I>(&mut self, edges: I) -> HashSet<ProjectNode>
    where
        I: IntoIterator<Item = Edge>,
    {
        let mut new_nodes = HashSet::new();
        for edge in edges {
            for node in edge.nodes() {
                if self.add_node(node.clone()) {
                    new_nodes.insert(node.clone());
                }
            }
            self.add_edge(edge);
        }
        new_nodes
    }

    fn ensure_node(&mut self, node: &ProjectNode) -> NodeIndex {
        if let Some(&idx) = self.node_indices.get(node) {
            return idx;
        }
        let idx = self.graph.add_node(node.clone());
        self.node_indices.insert(node.clone(), idx);
        idx
    }

    /// Check whether a node is part of the graph
    #[must_use]
    pub fn contains_node(&self, node: &ProjectNode) -> bool {
        self.node_indices.contains_key(node)
    }

    /// Check whether an equal edge is stored
    #[must_use]
    pub fn contains_edge(&self, edge: &Edge) -> bool {
        self.edge_set.contains(edge)
    }

    /// Iterate over all nodes, in no particular order
    pub fn nodes(&self) -> impl Iterator<Item = &ProjectNode> {
        self.graph.node_weights()
    }

    /// Iterate over all edges, in no particular order
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.graph.edge_weights()
    }

    /// Get node count
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Get edge count
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Check if the graph is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Number of edges incident with `node`; a self-loop counts twice.
    #[must_use]
    pub fn degree(&self, node: &ProjectNode) -> usize {
        self.node_indices.get(node).map_or(0, |&idx| self.degree_at(idx))
    }

    fn degree_at(&self, idx: NodeIndex) -> usize {
        self.graph.edges_directed(idx, Side::Incoming).count()
            + self.graph.edges_directed(idx, Side::Outgoing).count()
    }

    /// All edges going from `from` to `to`
    #[must_use]
    pub fn find_edge_set(&self, from: &ProjectNode, to: &ProjectNode) -> Vec<&Edge> {
        match (self.node_indices.get(from), self.node_indices.get(to)) {
            (Some(&a), Some(&b)) => self.graph.edges_connecting(a, b).map(|e| e.weight()).collect(),
            _ => vec![],
        }
    }

    /// Distinct sources of the edges ending at `node`
    #[must_use]
    pub fn parents(&self, node: &ProjectNode) -> Vec<&ProjectNode> {
        self.node_indices
            .get(node)
            .map(|&idx| {
                self.parent_indices(idx)
                    .into_iter()
                    .map(|p| &self.graph[p])
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Distinct targets of the edges starting at `node`
    #[must_use]
    pub fn children(&self, node: &ProjectNode) -> Vec<&ProjectNode> {
        let Some(&idx) = self.node_indices.get(node) else {
            return vec![];
        };
        let mut children: Vec<NodeIndex> =
            self.graph.neighbors_directed(idx, Side::Outgoing).collect();
        children.sort_unstable();
        children.dedup();
        children.into_iter().map(|c| &self.graph[c]).collect()
    }

    /// Nodes without any incident edge
    #[must_use]
    pub fn isolated_nodes(&self) -> Vec<&ProjectNode> {
        self.graph
            .node_indices()
            .filter(|&idx| self.degree_at(idx) == 0)
            .map(|idx| &self.graph[idx])
            .collect()
    }

    /// Nodes with at least one incident edge
    #[must_use]
    pub fn connected_nodes(&self) -> Vec<&ProjectNode> {
        self.graph
            .node_indices()
            .filter(|&idx| self.degree_at(idx) > 0)
            .map(|idx| &self.graph[idx])
            .collect()
    }

    /// Weakly connected components, in no particular order
    #[must_use]
    pub fn clusters(&self) -> Vec<Vec<ProjectNode>> {
        let mut components = UnionFind::<usize>::new(self.graph.node_count());
        for edge in self.graph.raw_edges() {
            components.union(edge.source().index(), edge.target().index());
        }

        let mut by_root: HashMap<usize, usize> = HashMap::new();
        let mut clusters: Vec<Vec<ProjectNode>> = Vec::new();
        for idx in self.graph.node_indices() {
            let root = components.find(idx.index());
            let slot = *by_root.entry(root).or_insert_with(|| {
                clusters.push(Vec::new());
                clusters.len() - 1
            });
            clusters[slot].push(self.graph[idx].clone());
        }
        clusters
    }

    /// The subgraph made of `nodes` and every edge between two of them
    #[must_use]
    pub fn induced_subgraph(&self, nodes: &[ProjectNode]) -> DependencyGraph {
        let mut sub = DependencyGraph::new();
        sub.add_nodes(nodes.iter().filter(|n| self.contains_node(n)).cloned());
        for edge in self.edges() {
            if sub.contains_node(&edge.source) && sub.contains_node(&edge.target) {
                sub.add_edge(edge.clone());
            }
        }
        sub
    }

    pub(crate) fn index_of(&self, node: &ProjectNode) -> Option<NodeIndex> {
        self.node_indices.get(node).copied()
    }

    pub(crate) fn node_at(&self, idx: NodeIndex) -> &ProjectNode {
        &self.graph[idx]
    }

    pub(crate) fn node_indices(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.node_indices()
    }

    pub(crate) fn parent_indices(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        let mut parents: Vec<NodeIndex> =
            self.graph.neighbors_directed(idx, Side::Incoming).collect();
        parents.sort_unstable();
        parents.dedup();
        parents
    }
}
