// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Request paths understood by the graph view

use crate::error::GraphError;
use crate::render::OutputFormat;
use percent_encoding::{percent_decode_str, utf8_percent_encode, NON_ALPHANUMERIC};
use std::fmt;
use std::str::FromStr;

/// Request method
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// Read
    Get,
    /// Add a trigger
    Put,
    /// Remove a trigger
    Delete,
}

impl FromStr for Method {
    type Err = GraphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(Self::Get),
            "PUT" => Ok(Self::Put),
            "DELETE" => Ok(Self::Delete),
            other => Err(GraphError::NotImplemented(format!("method {other}"))),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Get => "GET",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        })
    }
}

/// A parsed request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// `GET /graph.<ext>`
    Graph(OutputFormat),
    /// `GET /legend.<ext>`
    Legend(OutputFormat),
    /// `PUT /edge/<source>/<target>`
    PutEdge {
        /// Upstream job full name
        source: String,
        /// Downstream job full name
        target: String,
    },
    /// `DELETE /edge/<source>/<target>`
    DeleteEdge {
        /// Upstream job full name
        source: String,
        /// Downstream job full name
        target: String,
    },
}

impl Route {
    /// Match a method and path.
    ///
    /// Job names in edge paths are percent-encoded, so folder separators
    /// appear as `%2F`. A query string is ignored.
    pub fn parse(method: Method, path: &str) -> Result<Self, GraphError> {
        let path = path.split_once('?').map_or(path, |(p, _)| p);
        let trimmed = path.trim_start_matches('/');
        let not_implemented = || GraphError::NotImplemented(format!("{method} {path}"));

        match method {
            Method::Get => {
                if let Some(ext) = trimmed.strip_prefix("graph.") {
                    Ok(Self::Graph(OutputFormat::from_extension(ext)?))
                } else if let Some(ext) = trimmed.strip_prefix("legend.") {
                    Ok(Self::Legend(OutputFormat::from_extension(ext)?))
                } else {
                    Err(not_implemented())
                }
            }
            Method::Put | Method::Delete => {
                let segments: Vec<&str> = trimmed.trim_end_matches('/').split('/').collect();
                let [prefix, source, target] = segments.as_slice() else {
                    return Err(not_implemented());
                };
                if *prefix != "edge" || source.is_empty() || target.is_empty() {
                    return Err(not_implemented());
                }
                let source = decode(source)?;
                let target = decode(target)?;
                Ok(if method == Method::Put {
                    Self::PutEdge { source, target }
                } else {
                    Self::DeleteEdge { source, target }
                })
            }
        }
    }

    /// Whether the route changes job configuration
    #[must_use]
    pub fn is_mutation(&self) -> bool {
        matches!(self, Self::PutEdge { .. } | Self::DeleteEdge { .. })
    }

    /// Path form of an edge route for the given jobs
    #[must_use]
    pub fn edge_path(source: &str, target: &str) -> String {
        format!(
            "/edge/{}/{}",
            utf8_percent_encode(source, NON_ALPHANUMERIC),
            utf8_percent_encode(target, NON_ALPHANUMERIC)
        )
    }
}

/// Response status for a failed request
#[must_use]
pub fn status_for(err: &GraphError) -> (u16, &'static str) {
    match err {
        GraphError::NotImplemented(_) | GraphError::UnsupportedFormat(_) => (501, "Not Implemented"),
        GraphError::JobNotFound(_) => (404, "Not Found"),
        GraphError::EditingDisabled => (403, "Forbidden"),
        GraphError::EmptyIdentity => (400, "Bad Request"),
        _ => (500, "Internal Server Error"),
    }
}

fn decode(segment: &str) -> Result<String, GraphError> {
    percent_decode_str(segment)
        .decode_utf8()
        .map(|s| s.trim().to_string())
        .map_err(|e| GraphError::NotImplemented(format!("undecodable path segment {segment}: {e}")))
}
