// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Node placement for the JSON renderer

use super::view::node_order;
use crate::graph::DependencyGraph;
use crate::level::{self, CyclePolicy};
use crate::types::ProjectNode;
use std::collections::HashMap;
use tracing::trace;

/// A position in layout space
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    /// Horizontal
    pub x: f64,
    /// Vertical, growing downwards
    pub y: f64,
}

/// Size of the virtual drawing area
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Canvas {
    /// Width
    pub width: f64,
    /// Height
    pub height: f64,
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            width: 300.0,
            height: 800.0,
        }
    }
}

/// Assigns a position to every node of a (connected) graph
pub trait LayoutAlgorithm {
    /// Positions for all nodes of `graph`
    fn layout(&self, graph: &DependencyGraph, canvas: Canvas) -> HashMap<ProjectNode, Point>;
}

/// Layered placement: one row per level, rows ordered by barycenter sweeps.
///
/// Edges point downwards except where a cycle forces a back edge. Rows are
/// centred on the canvas; a graph wider than the canvas extends past it.
#[derive(Debug, Clone, Copy)]
pub struct LayeredLayout {
    /// Upper bound on refinement sweeps
    pub max_steps: usize,
    /// Distance between neighbours in a row
    pub h_spacing: f64,
    /// Distance between rows
    pub v_spacing: f64,
}

impl Default for LayeredLayout {
    fn default() -> Self {
        Self {
            max_steps: 700,
            h_spacing: 150.0,
            v_spacing: 90.0,
        }
    }
}

impl LayeredLayout {
    fn layers(graph: &DependencyGraph) -> Vec<Vec<ProjectNode>> {
        let levels = level::levels(graph, CyclePolicy::IgnoreBackEdges).unwrap_or_default();
        let depth = levels.values().copied().max().unwrap_or(1);
        let mut layers: Vec<Vec<ProjectNode>> = vec![Vec::new(); depth];
        for node in graph.nodes() {
            let level = levels.get(node).copied().unwrap_or(1);
            layers[level - 1].push(node.clone());
        }
        for layer in &mut layers {
            layer.sort_by(node_order);
        }
        layers.retain(|l| !l.is_empty());
        layers
    }

    /// Reorder `layers[i]` by the mean position of neighbours in `layers[reference]`.
    /// Returns whether the order changed.
    #[allow(clippy::cast_precision_loss)]
    fn sweep_layer(
        graph: &DependencyGraph,
        layers: &mut [Vec<ProjectNode>],
        i: usize,
        reference: usize,
    ) -> bool {
        let positions: HashMap<&ProjectNode, usize> = layers[reference]
            .iter()
            .enumerate()
            .map(|(pos, n)| (n, pos))
            .collect();

        let mut keyed: Vec<(f64, usize, ProjectNode)> = layers[i]
            .iter()
            .enumerate()
            .map(|(current, node)| {
                let neighbours: Vec<usize> = graph
                    .parents(node)
                    .into_iter()
                    .chain(graph.children(node))
                    .filter_map(|n| positions.get(n).copied())
                    .collect();
                let key = if neighbours.is_empty() {
                    current as f64
                } else {
                    neighbours.iter().sum::<usize>() as f64 / neighbours.len() as f64
                };
                (key, current, node.clone())
            })
            .collect();
        keyed.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));

        let changed = keyed.iter().enumerate().any(|(pos, (_, current, _))| pos != *current);
        layers[i] = keyed.into_iter().map(|(_, _, n)| n).collect();
        changed
    }
}

impl LayoutAlgorithm for LayeredLayout {
    #[allow(clippy::cast_precision_loss)]
    fn layout(&self, graph: &DependencyGraph, canvas: Canvas) -> HashMap<ProjectNode, Point> {
        let mut layers = Self::layers(graph);

        let mut steps = 0;
        while steps < self.max_steps {
            steps += 1;
            let mut changed = false;
            for i in 1..layers.len() {
                changed |= Self::sweep_layer(graph, &mut layers, i, i - 1);
            }
            for i in (0..layers.len().saturating_sub(1)).rev() {
                changed |= Self::sweep_layer(graph, &mut layers, i, i + 1);
            }
            if !changed {
                break;
            }
        }
        trace!(steps, layers = layers.len(), "layered layout");

        let mut points = HashMap::with_capacity(graph.node_count());
        for (row, layer) in layers.iter().enumerate() {
            let row_width = (layer.len().saturating_sub(1)) as f64 * self.h_spacing;
            let left = canvas.width / 2.0 - row_width / 2.0;
            let y = self.v_spacing / 2.0 + row as f64 * self.v_spacing;
            for (col, node) in layer.iter().enumerate() {
                let x = left + col as f64 * self.h_spacing;
                points.insert(node.clone(), Point { x, y });
            }
        }
        points
    }
}
