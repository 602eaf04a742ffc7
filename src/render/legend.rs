// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Static legend explaining edge colors and sub-project rows

use super::{cluster, escape_id, GraphRenderer, SUBPROJECT_COLOR};
use crate::error::GraphError;
use crate::types::EdgeKind;

/// Renders the color key; independent of any graph
#[derive(Debug, Clone, Copy, Default)]
pub struct LegendDotStringGenerator;

impl LegendDotStringGenerator {
    /// Create the generator
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn legend() -> String {
        let mut out =
            String::from("label=\"Legend:\" labelloc=t centered=false color=black node [shape=plaintext]\n");
        for kind in EdgeKind::ALL {
            out.push_str(&escape_id(kind.legend_label()));
            out.push('\n');
        }
        out.push_str("\"Sub-Project\"\n");

        out.push_str("node [style=invis]\n");
        let anchors: Vec<String> = (0..EdgeKind::ALL.len()).map(|i| format!("k{i}")).collect();
        for anchor in &anchors {
            out.push_str(&format!("{anchor} [label=\"\"] "));
        }
        out.push_str(&format!(
            "sub [fillcolor={color} style=filled fontcolor={color}]\n",
            color = escape_id(SUBPROJECT_COLOR)
        ));
        // Stack the rows vertically
        for pair in anchors.windows(2) {
            out.push_str(&format!("{} -> {} [style=invis]\n", pair[0], pair[1]));
        }
        if let Some(last) = anchors.last() {
            out.push_str(&format!("{last} -> sub [style=invis]\n"));
        }

        for (anchor, kind) in anchors.iter().zip(EdgeKind::ALL) {
            let style = if kind == EdgeKind::Dependency { " style=bold" } else { "" };
            out.push_str(&format!(
                "{{rank=same {anchor} -> {} [color={}{style} minlen=2]}}\n",
                escape_id(kind.legend_label()),
                kind.color()
            ));
        }
        out.push_str("{rank=same sub -> \"Sub-Project\" [ style=invis]}\n");
        out
    }
}

impl GraphRenderer for LegendDotStringGenerator {
    fn generate(&self) -> Result<String, GraphError> {
        let mut out = String::from("digraph {\n");
        out.push_str("node [shape=box, style=rounded];\n");
        out.push_str(&cluster("Legend", &Self::legend(), &[]));
        out.push_str("}\n");
        Ok(out)
    }
}
