// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Error types for graph construction, rendering and tool invocation

use thiserror::Error;

/// Errors raised by the jobgraph library
#[derive(Debug, Error)]
pub enum GraphError {
    /// A node was constructed without an identity
    #[error("project node requires a non-empty job name")]
    EmptyIdentity,

    /// The parent relation loops back on itself
    #[error("cyclic relationship detected at job {node}")]
    CyclicRelationship {
        /// Full name of a job on the cycle
        node: String,
    },

    /// The requested output format is not known or not supported here
    #[error("unsupported output format: {0}")]
    UnsupportedFormat(String),

    /// No handler exists for the request
    #[error("not implemented: {0}")]
    NotImplemented(String),

    /// A job name did not resolve in the registry
    #[error("job not found: {0}")]
    JobNotFound(String),

    /// The registry document is inconsistent
    #[error("invalid job registry: {0}")]
    InvalidRegistry(String),

    /// Graph editing is switched off in the configuration
    #[error("graph editing is disabled")]
    EditingDisabled,

    /// The external layout tool exited unsuccessfully
    #[error("{tool} exited with {status}: {stderr}")]
    ToolFailed {
        /// Executable that was run
        tool: String,
        /// Exit status description
        status: String,
        /// Captured standard error
        stderr: String,
    },

    /// The external layout tool did not finish in time
    #[error("{tool} did not finish within {secs}s")]
    ToolTimedOut {
        /// Executable that was run
        tool: String,
        /// Timeout that elapsed
        secs: u64,
    },

    /// I/O failure
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON encoding or decoding failure
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Result alias for library operations
pub type Result<T, E = GraphError> = std::result::Result<T, E>;
