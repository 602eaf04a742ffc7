// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Renderers turning a dependency graph into DOT or layout JSON

mod dot;
mod format;
mod json;
mod layout;
mod legend;
mod view;

pub use dot::{DotOptions, DotStringGenerator, LabelCompaction};
pub use format::OutputFormat;
pub use json::JsonStringGenerator;
pub use layout::{Canvas, LayeredLayout, LayoutAlgorithm, Point};
pub use legend::LegendDotStringGenerator;
pub use view::{edge_order, node_order, GraphView};

use crate::calculator::SubprojectMap;
use crate::error::GraphError;
use crate::graph::DependencyGraph;

/// Background of sub-project rows
pub const SUBPROJECT_COLOR: &str = "#F0F0F0";

/// Something that produces a textual rendering
pub trait GraphRenderer {
    /// Render to a string
    fn generate(&self) -> Result<String, GraphError>;
}

/// Quote a DOT identifier, escaping `"` and `\`
#[must_use]
pub fn escape_id(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        if c == '"' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}

/// Escape text placed inside an HTML-like DOT label
#[must_use]
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            other => out.push(other),
        }
    }
    out
}

/// A DOT `subgraph cluster<name>` block
pub(crate) fn cluster(name: &str, contents: &str, options: &[&str]) -> String {
    let mut out = format!("subgraph cluster{name} {{\n");
    out.push_str(contents);
    out.push_str(&options.join("\n"));
    out.push_str("}\n");
    out
}

/// Render a graph in the body format `format` calls for
pub fn render_graph(
    format: OutputFormat,
    graph: &DependencyGraph,
    subprojects: &SubprojectMap,
    options: &DotOptions,
) -> Result<String, GraphError> {
    if format.is_json() {
        JsonStringGenerator::new(graph, subprojects).generate()
    } else {
        DotStringGenerator::new(graph, subprojects, options.clone()).generate()
    }
}

/// Render the legend; there is no JSON legend
pub fn render_legend(format: OutputFormat) -> Result<String, GraphError> {
    if format.is_json() {
        return Err(GraphError::UnsupportedFormat(format!(
            "{} legend",
            format.extension()
        )));
    }
    LegendDotStringGenerator::new().generate()
}
