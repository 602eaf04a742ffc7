// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Legend command - describe the edge colors used in graphs

use super::graph::finish;
use super::write_output;
use crate::config::Config;
use crate::render::{self, OutputFormat};
use anyhow::Result;
use std::path::PathBuf;
use tracing::info;

/// Render the legend in `format`
pub fn render_body(config: &Config, format: OutputFormat) -> Result<Vec<u8>> {
    let text = render::render_legend(format)?;
    finish(config, text, format)
}

/// Run the legend command
pub fn run(config: &Config, format: &str, output: Option<PathBuf>) -> Result<()> {
    let format = OutputFormat::from_extension(format)?;
    info!("Rendering legend as {}", format);
    let body = render_body(config, format)?;
    write_output(&body, output.as_deref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GraphError;

    #[test]
    fn test_legend_gv() {
        let body = render_body(&Config::default(), OutputFormat::Gv).unwrap();
        let text = String::from_utf8(body).unwrap();
        assert!(text.starts_with("digraph {"));
        assert!(text.contains("Sub-Project"));
    }

    #[test]
    fn test_legend_json_unsupported() {
        let err = render_body(&Config::default(), OutputFormat::Json).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<GraphError>(),
            Some(GraphError::UnsupportedFormat(_))
        ));
    }
}
