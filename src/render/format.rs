// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Output formats selected by request extension

use crate::error::GraphError;
use std::fmt;
use std::str::FromStr;

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    /// Raster image rendered by the layout tool
    Png,
    /// Vector image rendered by the layout tool
    Svg,
    /// Client-side image map rendered by the layout tool
    Map,
    /// Layout JSON, no tool involved
    Json,
    /// Raw DOT text, no tool involved
    Gv,
}

impl OutputFormat {
    /// All formats
    pub const ALL: [OutputFormat; 5] = [Self::Png, Self::Svg, Self::Map, Self::Json, Self::Gv];

    /// Parse a file extension, case-insensitive, with or without the dot
    pub fn from_extension(ext: &str) -> Result<Self, GraphError> {
        let ext = ext.trim().trim_start_matches('.');
        Self::ALL
            .into_iter()
            .find(|f| f.extension().eq_ignore_ascii_case(ext))
            .ok_or_else(|| GraphError::UnsupportedFormat(ext.to_string()))
    }

    /// Request extension
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Svg => "svg",
            Self::Map => "map",
            Self::Json => "json",
            Self::Gv => "gv",
        }
    }

    /// Content type of the response body
    #[must_use]
    pub fn content_type(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Svg => "image/svg",
            Self::Map => "image/cmapx",
            Self::Json | Self::Gv => "text/plain",
        }
    }

    /// Value for the layout tool's `-T` flag
    #[must_use]
    pub fn dot_type(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Svg => "svg",
            Self::Map => "cmapx",
            Self::Json => "json",
            Self::Gv => "gv",
        }
    }

    /// Whether the body comes from running the layout tool
    #[must_use]
    pub fn requires_processing(self) -> bool {
        matches!(self, Self::Png | Self::Svg | Self::Map)
    }

    /// Whether the JSON renderer produces the body
    #[must_use]
    pub fn is_json(self) -> bool {
        self == Self::Json
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for OutputFormat {
    type Err = GraphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_extension(s)
    }
}
