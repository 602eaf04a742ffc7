// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//
//! Jobgraph library - dependency graphs for build jobs
//!
//! This crate expands a set of seed jobs into the full connected graph of
//! related jobs by querying pluggable edge providers, and renders the result
//! as Graphviz DOT or as a layout-annotated JSON document.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod calculator;
pub mod commands;
pub mod config;
pub mod error;
pub mod graph;
pub mod graphviz;
pub mod level;
pub mod operations;
pub mod provider;
pub mod providers;
pub mod registry;
pub mod render;
pub mod routes;

/// Core value types: graph nodes and typed edges
pub mod types {
    use crate::error::GraphError;
    use serde::{Deserialize, Serialize};
    use std::fmt;
    use std::hash::{Hash, Hasher};
    use std::sync::Arc;

    // =========================================================================
    // ProjectNode
    // =========================================================================

    #[derive(Debug)]
    struct NodeData {
        full_name: String,
        name: String,
        url: String,
    }

    /// A node in the dependency graph, standing for one job.
    ///
    /// Cloning is cheap. Equality and hashing use the full name only, so the
    /// same job always maps to one logical node within a graph build.
    #[derive(Debug, Clone)]
    pub struct ProjectNode {
        inner: Arc<NodeData>,
    }

    impl ProjectNode {
        /// Create a node for the job identified by `full_name`.
        ///
        /// `name` is the display label and `url` the job's absolute URL.
        pub fn new(
            full_name: impl Into<String>,
            name: impl Into<String>,
            url: impl Into<String>,
        ) -> Result<Self, GraphError> {
            let full_name = full_name.into();
            if full_name.trim().is_empty() {
                return Err(GraphError::EmptyIdentity);
            }
            Ok(Self {
                inner: Arc::new(NodeData {
                    full_name,
                    name: name.into(),
                    url: url.into(),
                }),
            })
        }

        /// Identity of the underlying job
        #[must_use]
        pub fn full_name(&self) -> &str {
            &self.inner.full_name
        }

        /// Display label
        #[must_use]
        pub fn name(&self) -> &str {
            &self.inner.name
        }

        /// Absolute URL of the job
        #[must_use]
        pub fn url(&self) -> &str {
            &self.inner.url
        }
    }

    impl PartialEq for ProjectNode {
        fn eq(&self, other: &Self) -> bool {
            self.inner.full_name == other.inner.full_name
        }
    }

    impl Eq for ProjectNode {}

    impl Hash for ProjectNode {
        fn hash<H: Hasher>(&self, state: &mut H) {
            self.inner.full_name.hash(state);
        }
    }

    impl fmt::Display for ProjectNode {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(self.name())
        }
    }

    // =========================================================================
    // Edges
    // =========================================================================

    /// Relationship types between jobs
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
    #[serde(rename_all = "kebab-case")]
    pub enum EdgeKind {
        /// Declared dependency
        Dependency,
        /// Post-build trigger
        #[serde(rename = "trigger")]
        BuildTrigger,
        /// Parameterized trigger (post-build or build step)
        ParameterizedTrigger,
        /// Artifacts copied from the upstream job
        CopyArtifact,
        /// Upstream jobs listed on the downstream job (fan-in)
        ReverseTrigger,
        /// Maven module dependency
        Maven,
    }

    /// Color used for edges that do not override it
    pub const DEFAULT_EDGE_COLOR: &str = "black";

    impl EdgeKind {
        /// Every edge kind, in legend order
        pub const ALL: [EdgeKind; 6] = [
            Self::Dependency,
            Self::BuildTrigger,
            Self::ParameterizedTrigger,
            Self::CopyArtifact,
            Self::ReverseTrigger,
            Self::Maven,
        ];

        /// Semantic type tag, as emitted in JSON output
        #[must_use]
        pub fn type_name(self) -> &'static str {
            match self {
                Self::Dependency => "dependency",
                Self::BuildTrigger => "trigger",
                Self::ParameterizedTrigger => "parameterized-trigger",
                Self::CopyArtifact => "copy-artifact",
                Self::ReverseTrigger => "reverse-trigger",
                Self::Maven => "maven",
            }
        }

        /// Rendering color
        #[must_use]
        pub fn color(self) -> &'static str {
            match self {
                Self::Dependency | Self::BuildTrigger => DEFAULT_EDGE_COLOR,
                Self::ParameterizedTrigger => "blue",
                Self::CopyArtifact => "lightblue",
                Self::ReverseTrigger => "red",
                Self::Maven => "green",
            }
        }

        /// Human readable label for the legend
        #[must_use]
        pub fn legend_label(self) -> &'static str {
            match self {
                Self::Dependency => "Dependency",
                Self::BuildTrigger => "Build Trigger",
                Self::ParameterizedTrigger => "Parameterized Trigger",
                Self::CopyArtifact => "Copy Artifact",
                Self::ReverseTrigger => "Reverse Trigger",
                Self::Maven => "Maven Dependency",
            }
        }
    }

    impl fmt::Display for EdgeKind {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(self.type_name())
        }
    }

    /// A directed, typed relationship between two jobs.
    ///
    /// Two edges are equal only if kind, source and target all match, so
    /// different relationship types between the same pair stay distinct.
    #[derive(Debug, Clone, PartialEq, Eq, Hash)]
    pub struct Edge {
        /// Upstream end
        pub source: ProjectNode,
        /// Downstream end
        pub target: ProjectNode,
        /// Relationship type
        pub kind: EdgeKind,
    }

    impl Edge {
        /// Create an edge
        #[must_use]
        pub fn new(source: ProjectNode, target: ProjectNode, kind: EdgeKind) -> Self {
            Self { source, target, kind }
        }

        /// Type tag of this edge
        #[must_use]
        pub fn type_name(&self) -> &'static str {
            self.kind.type_name()
        }

        /// Rendering color of this edge
        #[must_use]
        pub fn color(&self) -> &'static str {
            self.kind.color()
        }

        /// Both endpoints
        #[must_use]
        pub fn nodes(&self) -> [&ProjectNode; 2] {
            [&self.source, &self.target]
        }
    }

    /// Which side of a node an edge query looks at
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub enum Direction {
        /// Edges ending at the node
        Upstream,
        /// Edges starting at the node
        Downstream,
    }

    impl Direction {
        /// Both directions, upstream first
        pub const BOTH: [Direction; 2] = [Self::Upstream, Self::Downstream];
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use std::collections::HashSet;

        fn node(name: &str) -> ProjectNode {
            ProjectNode::new(name, name, format!("http://ci/job/{name}/")).unwrap()
        }

        #[test]
        fn test_empty_identity_rejected() {
            assert!(matches!(
                ProjectNode::new("", "x", "u"),
                Err(GraphError::EmptyIdentity)
            ));
            assert!(ProjectNode::new("  ", "x", "u").is_err());
        }

        #[test]
        fn test_node_identity_ignores_label() {
            let a = ProjectNode::new("folder/a", "A", "u1").unwrap();
            let b = ProjectNode::new("folder/a", "Other label", "u2").unwrap();
            assert_eq!(a, b);

            let set: HashSet<_> = [a, b].into_iter().collect();
            assert_eq!(set.len(), 1);
        }

        #[test]
        fn test_edge_equality_includes_kind() {
            let a = node("a");
            let b = node("b");
            let dep = Edge::new(a.clone(), b.clone(), EdgeKind::Dependency);
            let copy = Edge::new(a.clone(), b.clone(), EdgeKind::CopyArtifact);
            assert_ne!(dep, copy);
            assert_eq!(dep, Edge::new(a.clone(), b.clone(), EdgeKind::Dependency));
            assert_ne!(dep, Edge::new(b, a, EdgeKind::Dependency));
        }

        #[test]
        fn test_edge_colors() {
            assert_eq!(EdgeKind::Dependency.color(), DEFAULT_EDGE_COLOR);
            assert_eq!(EdgeKind::BuildTrigger.color(), "black");
            assert_eq!(EdgeKind::CopyArtifact.color(), "lightblue");
            assert_eq!(EdgeKind::ParameterizedTrigger.color(), "blue");
            assert_eq!(EdgeKind::ReverseTrigger.color(), "red");
            assert_eq!(EdgeKind::Maven.color(), "green");
        }

        #[test]
        fn test_edge_kind_serde_matches_type_name() {
            for kind in EdgeKind::ALL {
                let json = serde_json::to_string(&kind).unwrap();
                assert_eq!(json, format!("\"{}\"", kind.type_name()));
            }
        }
    }
}

/// Prelude for common imports
pub mod prelude {
    pub use crate::error::GraphError;
    pub use crate::graph::DependencyGraph;
    pub use crate::types::*;
    pub use anyhow::{Context, Result};
}
