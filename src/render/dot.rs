// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Graphviz DOT renderer

use super::view::GraphView;
use super::{cluster, escape_html, escape_id, GraphRenderer, SUBPROJECT_COLOR};
use crate::calculator::SubprojectMap;
use crate::error::GraphError;
use crate::graph::DependencyGraph;
use crate::types::ProjectNode;
use regex::Regex;
use tracing::{debug, warn};

/// Rewrites node labels with a regex: one capture group becomes the label,
/// another optionally becomes a small superscript line above it.
///
/// The pattern must match the whole name. Group `0` with the default
/// pattern leaves labels unchanged.
#[derive(Debug, Clone, Default)]
pub struct LabelCompaction {
    pattern: Option<Regex>,
    group: usize,
    superscript_group: usize,
}

impl LabelCompaction {
    /// Compile `pattern`; an invalid pattern matches every name as a whole
    #[must_use]
    pub fn new(pattern: &str, group: usize, superscript_group: usize) -> Self {
        let pattern = match Regex::new(&format!("^(?:{pattern})$")) {
            Ok(re) => Some(re),
            Err(e) => {
                warn!("Invalid project name strip regex {:?}, using .*: {}", pattern, e);
                None
            }
        };
        Self {
            pattern,
            group,
            superscript_group,
        }
    }

    /// HTML label text for `name`
    #[must_use]
    pub fn apply(&self, name: &str) -> String {
        let Some(pattern) = &self.pattern else {
            return escape_html(name);
        };
        let Some(caps) = pattern.captures(name) else {
            return escape_html(name);
        };
        let groups = pattern.captures_len();
        if self.group >= groups {
            return escape_html(name);
        }

        let text = |i: usize| caps.get(i).map_or("", |m| m.as_str());
        let mut label = String::new();
        if self.superscript_group > 0 && self.superscript_group < groups {
            label.push_str("<FONT POINT-SIZE=\"10\">");
            label.push_str(&escape_html(text(self.superscript_group)));
            label.push_str("</FONT><BR />");
        }
        label.push_str(&escape_html(text(self.group)));
        label
    }
}

/// Options for [`DotStringGenerator`]
#[derive(Debug, Clone)]
pub struct DotOptions {
    /// Graphviz `rankdir`
    pub rank_direction: String,
    /// Label rewriting
    pub compaction: LabelCompaction,
}

impl Default for DotOptions {
    fn default() -> Self {
        Self {
            rank_direction: "TB".to_string(),
            compaction: LabelCompaction::default(),
        }
    }
}

/// Renders a graph as DOT text for the external layout tool
pub struct DotStringGenerator<'g> {
    view: GraphView<'g>,
    options: DotOptions,
}

impl<'g> DotStringGenerator<'g> {
    /// Generator over `graph` with its sub-projects
    #[must_use]
    pub fn new(graph: &'g DependencyGraph, subprojects: &'g SubprojectMap, options: DotOptions) -> Self {
        Self {
            view: GraphView::new(graph, subprojects),
            options,
        }
    }

    fn nodes(&self, nodes: &[&ProjectNode]) -> String {
        let mut out = String::new();
        for node in nodes {
            let subs = self.view.subprojects_of(node);
            if subs.is_empty() {
                out.push_str(&self.plain_node(node));
            } else {
                out.push_str(&self.composite_node(node, subs));
            }
            out.push_str(";\n");
        }
        out
    }

    fn plain_node(&self, node: &ProjectNode) -> String {
        format!(
            "{} [label=<{}> href={}]",
            escape_id(node.name()),
            self.options.compaction.apply(node.name()),
            escape_id(node.url())
        )
    }

    fn composite_node(&self, node: &ProjectNode, subs: &[ProjectNode]) -> String {
        let mut out = format!(
            "{} [shape=\"Mrecord\" href={} label=<<table border=\"0\" cellborder=\"0\" cellpadding=\"3\" bgcolor=\"white\">\n",
            escape_id(node.name()),
            escape_id(node.url())
        );
        out.push_str(&self.row(node, None));
        for sub in subs {
            out.push_str(&self.row(sub, Some(SUBPROJECT_COLOR)));
        }
        out.push_str("</table>>]");
        out
    }

    fn row(&self, node: &ProjectNode, bgcolor: Option<&str>) -> String {
        let bg = bgcolor.map_or_else(String::new, |c| format!(" bgcolor=\"{c}\""));
        format!(
            "<tr><td align=\"center\" href=\"{}\"{}>{}</td></tr>\n",
            escape_html(node.url()),
            bg,
            self.options.compaction.apply(node.name())
        )
    }
}

impl GraphRenderer for DotStringGenerator<'_> {
    fn generate(&self) -> Result<String, GraphError> {
        let mut out = String::from("digraph {\n");
        out.push_str("node [shape=box, style=rounded];\n");
        out.push_str(&format!("rankdir={};\n", self.options.rank_direction));

        out.push_str(&cluster("Main", &self.nodes(self.view.connected()), &["color=invis;"]));
        out.push_str(&cluster(
            "Standalone",
            &self.nodes(self.view.isolated()),
            &["color=invis;"],
        ));

        for edge in self.view.edges() {
            out.push_str(&format!(
                "{} -> {} [ color={} ] ;\n",
                escape_id(edge.source.name()),
                escape_id(edge.target.name()),
                edge.color()
            ));
        }

        // Invisible chain keeping standalone nodes together
        let standalone = self.view.isolated();
        if standalone.len() > 1 {
            let ids: Vec<String> = standalone.iter().map(|n| escape_id(n.name())).collect();
            out.push_str("edge[style=\"invisible\",dir=\"none\"];\n");
            out.push_str(&ids.join(" -> "));
            out.push_str(";\n");
        }

        out.push_str("}\n");
        debug!(
            nodes = self.view.graph().node_count(),
            edges = self.view.edges().len(),
            bytes = out.len(),
            "rendered dot"
        );
        Ok(out)
    }
}
