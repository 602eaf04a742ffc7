// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Layout JSON renderer for interactive clients

use super::layout::{Canvas, LayeredLayout, LayoutAlgorithm, Point};
use super::view::{node_order, GraphView};
use super::GraphRenderer;
use crate::calculator::SubprojectMap;
use crate::error::GraphError;
use crate::graph::DependencyGraph;
use crate::types::ProjectNode;
use serde::Serialize;
use tracing::debug;

/// Grid cell width for standalone nodes
pub const STANDALONE_NODE_WIDTH: f64 = 150.0;
/// Grid cell height for standalone nodes
pub const STANDALONE_NODE_HEIGHT: f64 = 90.0;
/// Standalone nodes per grid row
pub const STANDALONE_NODES_PER_ROW: usize = 5;
/// Width reported for the standalone cluster
pub const STANDALONE_WIDTH: f64 = 700.0;

#[derive(Debug, Serialize)]
struct JsonEdge<'a> {
    from: &'a str,
    to: &'a str,
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonNode<'a> {
    name: &'a str,
    full_name: &'a str,
    url: &'a str,
    x: f64,
    y: f64,
}

impl<'a> JsonNode<'a> {
    fn new(node: &'a ProjectNode, x: f64, y: f64) -> Self {
        Self {
            name: node.name(),
            full_name: node.full_name(),
            url: node.url(),
            x,
            y,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonCluster<'a> {
    nodes: Vec<JsonNode<'a>>,
    h_size: f64,
    v_size: f64,
}

#[derive(Debug, Serialize)]
struct JsonDocument<'a> {
    edges: Vec<JsonEdge<'a>>,
    clusters: Vec<JsonCluster<'a>>,
}

/// Renders edges plus laid-out clusters as pretty JSON.
///
/// Multi-node clusters come first, largest first, each laid out on its own
/// and translated to start at the origin. Single-node clusters are placed on
/// a fixed grid in a final standalone cluster.
pub struct JsonStringGenerator<'g> {
    view: GraphView<'g>,
    layout: Box<dyn LayoutAlgorithm + 'g>,
    canvas: Canvas,
}

impl<'g> JsonStringGenerator<'g> {
    /// Generator using [`LayeredLayout`]
    #[must_use]
    pub fn new(graph: &'g DependencyGraph, subprojects: &'g SubprojectMap) -> Self {
        Self {
            view: GraphView::new(graph, subprojects),
            layout: Box::new(LayeredLayout::default()),
            canvas: Canvas::default(),
        }
    }

    /// Replace the layout algorithm
    #[must_use]
    pub fn with_layout(mut self, layout: Box<dyn LayoutAlgorithm + 'g>) -> Self {
        self.layout = layout;
        self
    }

    fn sorted_clusters(&self) -> Vec<Vec<ProjectNode>> {
        let mut clusters = self.view.graph().clusters();
        for cluster in &mut clusters {
            cluster.sort_by(node_order);
        }
        clusters.sort_by(|a, b| {
            b.len()
                .cmp(&a.len())
                .then_with(|| match (a.first(), b.first()) {
                    (Some(x), Some(y)) => node_order(x, y),
                    _ => std::cmp::Ordering::Equal,
                })
        });
        clusters
    }

    fn laid_out<'n>(&self, cluster: &'n [ProjectNode]) -> JsonCluster<'n> {
        let subgraph = self.view.graph().induced_subgraph(cluster);
        let points = self.layout.layout(&subgraph, self.canvas);
        let point = |n: &ProjectNode| points.get(n).copied().unwrap_or_default();

        let (mut min_x, mut min_y) = (f64::INFINITY, f64::INFINITY);
        let (mut max_x, mut max_y) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
        for node in cluster {
            let Point { x, y } = point(node);
            min_x = min_x.min(x);
            max_x = max_x.max(x);
            min_y = min_y.min(y);
            max_y = max_y.max(y);
        }

        let nodes = cluster
            .iter()
            .map(|node| {
                let p = point(node);
                JsonNode::new(node, p.x - min_x, p.y - min_y)
            })
            .collect();
        JsonCluster {
            nodes,
            h_size: max_x - min_x,
            v_size: max_y - min_y,
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn standalone<'n>(nodes: &[&'n ProjectNode]) -> JsonCluster<'n> {
        let json_nodes = nodes
            .iter()
            .enumerate()
            .map(|(i, node)| {
                let row = i / STANDALONE_NODES_PER_ROW;
                let column = i % STANDALONE_NODES_PER_ROW;
                JsonNode::new(
                    node,
                    column as f64 * STANDALONE_NODE_WIDTH,
                    row as f64 * STANDALONE_NODE_HEIGHT,
                )
            })
            .collect();
        let rows = nodes.len() / STANDALONE_NODES_PER_ROW + 1;
        JsonCluster {
            nodes: json_nodes,
            h_size: STANDALONE_WIDTH,
            v_size: rows as f64 * STANDALONE_NODE_HEIGHT,
        }
    }
}

impl GraphRenderer for JsonStringGenerator<'_> {
    fn generate(&self) -> Result<String, GraphError> {
        let edges = self
            .view
            .edges()
            .iter()
            .map(|e| JsonEdge {
                from: e.source.name(),
                to: e.target.name(),
                kind: e.type_name(),
            })
            .collect();

        let all = self.sorted_clusters();
        let (multi, single): (Vec<_>, Vec<_>) = all.iter().partition(|c| c.len() > 1);

        let mut clusters: Vec<JsonCluster<'_>> = multi.iter().map(|c| self.laid_out(c)).collect();
        let mut standalone: Vec<&ProjectNode> = single.iter().filter_map(|c| c.first()).collect();
        standalone.sort_by(|a, b| node_order(a, b));
        clusters.push(Self::standalone(&standalone));

        debug!(
            clusters = clusters.len(),
            standalone = standalone.len(),
            "rendered json"
        );
        let doc = JsonDocument { edges, clusters };
        Ok(serde_json::to_string_pretty(&doc)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Edge, EdgeKind};
    use serde_json::Value;
    use std::collections::HashMap;

    fn node(name: &str) -> ProjectNode {
        ProjectNode::new(name, name, format!("http://ci/job/{name}/")).unwrap()
    }

    fn render(g: &DependencyGraph) -> Value {
        let subs = SubprojectMap::new();
        let json = JsonStringGenerator::new(g, &subs).generate().unwrap();
        serde_json::from_str(&json).unwrap()
    }

    #[test]
    fn test_edges_and_clusters() {
        let mut g = DependencyGraph::new();
        g.add_edge(Edge::new(node("a"), node("b"), EdgeKind::CopyArtifact));
        g.add_edge(Edge::new(node("b"), node("c"), EdgeKind::Dependency));
        g.add_edge(Edge::new(node("x"), node("y"), EdgeKind::BuildTrigger));
        g.add_node(node("solo"));

        let doc = render(&g);
        let edges = doc["edges"].as_array().unwrap();
        assert_eq!(edges.len(), 3);
        assert_eq!(edges[0], serde_json::json!({"from": "a", "to": "b", "type": "copy-artifact"}));
        assert_eq!(edges[2]["type"], "trigger");

        let clusters = doc["clusters"].as_array().unwrap();
        assert_eq!(clusters.len(), 3);
        assert_eq!(clusters[0]["nodes"].as_array().unwrap().len(), 3);
        assert_eq!(clusters[1]["nodes"].as_array().unwrap().len(), 2);
        assert_eq!(clusters[2]["nodes"][0]["name"], "solo");
    }

    #[test]
    fn test_cluster_normalized_to_origin() {
        let mut g = DependencyGraph::new();
        g.add_edge(Edge::new(node("a"), node("b"), EdgeKind::Dependency));
        g.add_edge(Edge::new(node("a"), node("c"), EdgeKind::Dependency));

        let doc = render(&g);
        let nodes = doc["clusters"][0]["nodes"].as_array().unwrap();
        let min_x = nodes.iter().map(|n| n["x"].as_f64().unwrap()).fold(f64::MAX, f64::min);
        let min_y = nodes.iter().map(|n| n["y"].as_f64().unwrap()).fold(f64::MAX, f64::min);
        assert!(min_x.abs() < f64::EPSILON);
        assert!(min_y.abs() < f64::EPSILON);
        assert!((doc["clusters"][0]["hSize"].as_f64().unwrap() - 150.0).abs() < f64::EPSILON);
        assert!((doc["clusters"][0]["vSize"].as_f64().unwrap() - 90.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_node_record_fields() {
        let mut g = DependencyGraph::new();
        g.add_node(ProjectNode::new("f/job", "Job", "http://ci/job/f/job/job/").unwrap());

        let doc = render(&g);
        let record = &doc["clusters"][0]["nodes"][0];
        assert_eq!(record["name"], "Job");
        assert_eq!(record["fullName"], "f/job");
        assert_eq!(record["url"], "http://ci/job/f/job/job/");
        assert_eq!(record["x"], 0.0);
        assert_eq!(record["y"], 0.0);
    }

    #[test]
    fn test_standalone_grid() {
        let mut g = DependencyGraph::new();
        for i in 0..7 {
            g.add_node(node(&format!("s{i}")));
        }

        let doc = render(&g);
        let standalone = &doc["clusters"][0];
        let nodes = standalone["nodes"].as_array().unwrap();
        assert_eq!(nodes.len(), 7);
        assert_eq!(nodes[4]["x"], 600.0);
        assert_eq!(nodes[5]["x"], 0.0);
        assert_eq!(nodes[5]["y"], 90.0);
        assert_eq!(standalone["hSize"], 700.0);
        assert_eq!(standalone["vSize"], 180.0);
    }

    #[test]
    fn test_empty_graph_has_empty_standalone_cluster() {
        let doc = render(&DependencyGraph::new());
        assert_eq!(doc["edges"].as_array().unwrap().len(), 0);
        assert_eq!(doc["clusters"][0]["vSize"], 90.0);
    }

    #[test]
    fn test_self_loop_node_goes_to_standalone() {
        let mut g = DependencyGraph::new();
        g.add_edge(Edge::new(node("loop"), node("loop"), EdgeKind::Dependency));

        let doc = render(&g);
        assert_eq!(doc["clusters"].as_array().unwrap().len(), 1);
        assert_eq!(doc["clusters"][0]["nodes"][0]["name"], "loop");
    }

    struct Fixed;

    impl LayoutAlgorithm for Fixed {
        fn layout(&self, graph: &DependencyGraph, _canvas: Canvas) -> HashMap<ProjectNode, Point> {
            graph
                .nodes()
                .map(|n| (n.clone(), Point { x: 40.0, y: 10.0 }))
                .collect()
        }
    }

    #[test]
    fn test_custom_layout() {
        let mut g = DependencyGraph::new();
        g.add_edge(Edge::new(node("a"), node("b"), EdgeKind::Dependency));
        let subs = SubprojectMap::new();

        let json = JsonStringGenerator::new(&g, &subs)
            .with_layout(Box::new(Fixed))
            .generate()
            .unwrap();
        let doc: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(doc["clusters"][0]["hSize"], 0.0);
        assert_eq!(doc["clusters"][0]["nodes"][1]["x"], 0.0);
    }
}
