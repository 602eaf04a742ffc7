// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Topological levels along parent edges
//!
//! `level(n) = 1` for a node without parents, otherwise one more than the
//! highest parent level. The walk is an explicit-stack depth first search so
//! that deep graphs cannot exhaust the call stack, and nodes currently on the
//! stack are tracked to detect cycles.

use crate::error::GraphError;
use crate::graph::DependencyGraph;
use crate::types::ProjectNode;
use petgraph::graph::NodeIndex;
use std::collections::{HashMap, HashSet};

/// What to do when a parent is reached that is still being computed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CyclePolicy {
    /// Raise [`GraphError::CyclicRelationship`]
    #[default]
    Fail,
    /// Skip the back edge; the result depends on traversal order
    IgnoreBackEdges,
}

/// Level of a single node; `JobNotFound` if the node is not in the graph
pub fn level(
    graph: &DependencyGraph,
    node: &ProjectNode,
    policy: CyclePolicy,
) -> Result<usize, GraphError> {
    let idx = graph
        .index_of(node)
        .ok_or_else(|| GraphError::JobNotFound(node.full_name().to_string()))?;
    Leveler::new(graph, policy).compute(idx)
}

/// Levels of every node in the graph
pub fn levels(
    graph: &DependencyGraph,
    policy: CyclePolicy,
) -> Result<HashMap<ProjectNode, usize>, GraphError> {
    let mut leveler = Leveler::new(graph, policy);
    let mut result = HashMap::with_capacity(graph.node_count());
    for idx in graph.node_indices() {
        let level = leveler.compute(idx)?;
        result.insert(graph.node_at(idx).clone(), level);
    }
    Ok(result)
}

struct Frame {
    idx: NodeIndex,
    parents: Vec<NodeIndex>,
    cursor: usize,
    best: usize,
}

struct Leveler<'g> {
    graph: &'g DependencyGraph,
    policy: CyclePolicy,
    memo: HashMap<NodeIndex, usize>,
    on_stack: HashSet<NodeIndex>,
}

impl<'g> Leveler<'g> {
    fn new(graph: &'g DependencyGraph, policy: CyclePolicy) -> Self {
        Self {
            graph,
            policy,
            memo: HashMap::new(),
            on_stack: HashSet::new(),
        }
    }

    fn frame(&self, idx: NodeIndex) -> Frame {
        Frame {
            idx,
            parents: self.graph.parent_indices(idx),
            cursor: 0,
            best: 0,
        }
    }

    fn compute(&mut self, start: NodeIndex) -> Result<usize, GraphError> {
        if let Some(&known) = self.memo.get(&start) {
            return Ok(known);
        }

        let mut stack = vec![self.frame(start)];
        self.on_stack.insert(start);

        while let Some(top) = stack.last_mut() {
            if top.cursor < top.parents.len() {
                let parent = top.parents[top.cursor];
                top.cursor += 1;

                if let Some(&known) = self.memo.get(&parent) {
                    top.best = top.best.max(known);
                    continue;
                }
                if self.on_stack.contains(&parent) {
                    match self.policy {
                        CyclePolicy::Fail => {
                            self.on_stack.clear();
                            return Err(GraphError::CyclicRelationship {
                                node: self.graph.node_at(parent).full_name().to_string(),
                            });
                        }
                        CyclePolicy::IgnoreBackEdges => continue,
                    }
                }

                self.on_stack.insert(parent);
                let next = self.frame(parent);
                stack.push(next);
            } else {
                let level = top.best + 1;
                let idx = top.idx;
                stack.pop();
                self.on_stack.remove(&idx);
                self.memo.insert(idx, level);
                if let Some(child) = stack.last_mut() {
                    child.best = child.best.max(level);
                }
            }
        }

        Ok(self.memo.get(&start).copied().unwrap_or(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Edge, EdgeKind};

    fn node(name: &str) -> ProjectNode {
        ProjectNode::new(name, name, format!("http://ci/job/{name}/")).unwrap()
    }

    fn graph(edges: &[(&str, &str)]) -> DependencyGraph {
        let mut g = DependencyGraph::new();
        for (a, b) in edges {
            g.add_edge(Edge::new(node(a), node(b), EdgeKind::Dependency));
        }
        g
    }

    fn level_of(g: &DependencyGraph, name: &str) -> usize {
        level(g, &node(name), CyclePolicy::Fail).unwrap()
    }

    #[test]
    fn test_chain_with_branch() {
        let g = graph(&[("j1", "j2"), ("j2", "j3"), ("j3", "j4"), ("j3", "j5"), ("j5", "j6")]);

        assert_eq!(level_of(&g, "j1"), 1);
        assert_eq!(level_of(&g, "j2"), 2);
        assert_eq!(level_of(&g, "j3"), 3);
        assert_eq!(level_of(&g, "j4"), 4);
        assert_eq!(level_of(&g, "j5"), 4);
        assert_eq!(level_of(&g, "j6"), 5);
    }

    #[test]
    fn test_longest_path_wins() {
        let g = graph(&[("a", "b"), ("b", "c"), ("b", "e"), ("d", "c"), ("g", "a"), ("g", "d")]);
        let all = levels(&g, CyclePolicy::Fail).unwrap();

        assert_eq!(all[&node("g")], 1);
        assert_eq!(all[&node("a")], 2);
        assert_eq!(all[&node("d")], 2);
        assert_eq!(all[&node("b")], 3);
        assert_eq!(all[&node("c")], 4);
        assert_eq!(all[&node("e")], 4);
    }

    #[test]
    fn test_cycle_detected() {
        let g = graph(&[("a", "b"), ("b", "c"), ("b", "e"), ("d", "c"), ("g", "a"), ("g", "d"), ("c", "g")]);

        let err = level(&g, &node("c"), CyclePolicy::Fail).unwrap_err();
        match err {
            GraphError::CyclicRelationship { node } => {
                assert!(["a", "b", "c", "g"].contains(&node.as_str()), "{node}");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(levels(&g, CyclePolicy::Fail).is_err());
    }

    #[test]
    fn test_self_loop_is_a_cycle() {
        let g = graph(&[("a", "a")]);
        assert!(matches!(
            level(&g, &node("a"), CyclePolicy::Fail),
            Err(GraphError::CyclicRelationship { .. })
        ));
        assert_eq!(level(&g, &node("a"), CyclePolicy::IgnoreBackEdges).unwrap(), 1);
    }

    #[test]
    fn test_ignore_back_edges_terminates() {
        let g = graph(&[("a", "b"), ("b", "c"), ("c", "a")]);
        let all = levels(&g, CyclePolicy::IgnoreBackEdges).unwrap();

        assert_eq!(all.len(), 3);
        assert!(all.values().all(|&l| (1..=3).contains(&l)));
    }

    #[test]
    fn test_parallel_edges_count_once() {
        let mut g = graph(&[("a", "b")]);
        g.add_edge(Edge::new(node("a"), node("b"), EdgeKind::CopyArtifact));
        assert_eq!(level_of(&g, "b"), 2);
    }

    #[test]
    fn test_unknown_node() {
        let g = graph(&[("a", "b")]);
        assert!(matches!(
            level(&g, &node("zz"), CyclePolicy::Fail),
            Err(GraphError::JobNotFound(_))
        ));
    }

    #[test]
    fn test_deep_chain_does_not_overflow() {
        let names: Vec<String> = (0..20_000).map(|i| format!("n{i}")).collect();
        let mut g = DependencyGraph::new();
        for pair in names.windows(2) {
            g.add_edge(Edge::new(node(&pair[0]), node(&pair[1]), EdgeKind::Dependency));
        }
        assert_eq!(level_of(&g, "n19999"), 20_000);
    }
}
