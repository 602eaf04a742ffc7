// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Request command - answer one graph view request by method and path

use super::{edge::persist, graph, legend, load_registry, write_output};
use crate::config::Config;
use crate::error::GraphError;
use crate::operations::EdgeOperation;
use crate::registry::JobRegistry;
use crate::routes::{status_for, Method, Route};
use anyhow::Result;
use std::path::PathBuf;
use tracing::{info, warn};

/// Outcome of a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// Status code
    pub status: u16,
    /// MIME type of `body`
    pub content_type: &'static str,
    /// Response body
    pub body: Vec<u8>,
}

impl Response {
    fn ok(content_type: &'static str, body: Vec<u8>) -> Self {
        Self {
            status: 200,
            content_type,
            body,
        }
    }

    fn text(status: u16, text: impl Into<String>) -> Self {
        Self {
            status,
            content_type: "text/plain",
            body: text.into().into_bytes(),
        }
    }
}

/// Answer `method path`; library errors become error responses
pub fn handle(
    config: &Config,
    registry: &mut JobRegistry,
    method: &str,
    path: &str,
    jobs: &[String],
) -> Result<Response> {
    match dispatch(config, registry, method, path, jobs) {
        Ok(response) => Ok(response),
        Err(e) => match e.downcast_ref::<GraphError>() {
            Some(graph_err) => {
                let (status, reason) = status_for(graph_err);
                warn!("{} {} -> {} {}", method, path, status, reason);
                Ok(Response::text(status, format!("{reason}: {graph_err}\n")))
            }
            None => Err(e),
        },
    }
}

fn dispatch(
    config: &Config,
    registry: &mut JobRegistry,
    method: &str,
    path: &str,
    jobs: &[String],
) -> Result<Response> {
    let method: Method = method.parse()?;
    let route = Route::parse(method, path)?;
    if route.is_mutation() && !config.edit_enabled {
        return Err(GraphError::EditingDisabled.into());
    }

    match route {
        Route::Graph(format) => {
            let body = graph::render_body(config, registry, jobs, format)?;
            Ok(Response::ok(format.content_type(), body))
        }
        Route::Legend(format) => {
            let body = legend::render_body(config, format)?;
            Ok(Response::ok(format.content_type(), body))
        }
        Route::PutEdge { source, target } => {
            let change = EdgeOperation::new(&source, &target).put(registry)?;
            persist(config, registry, change)?;
            info!("PUT {} -> {}: {:?}", source, target, change);
            Ok(Response::text(200, format!("{change:?}\n")))
        }
        Route::DeleteEdge { source, target } => {
            let change = EdgeOperation::new(&source, &target).delete(registry)?;
            persist(config, registry, change)?;
            info!("DELETE {} -> {}: {:?}", source, target, change);
            Ok(Response::text(200, format!("{change:?}\n")))
        }
    }
}

/// Run the request command
pub fn run(
    config: &Config,
    method: &str,
    path: &str,
    jobs: &[String],
    output: Option<PathBuf>,
) -> Result<()> {
    let mut registry = load_registry(config)?;
    let response = handle(config, &mut registry, method, path, jobs)?;
    info!("{} {} ({})", response.status, path, response.content_type);

    if response.status != 200 {
        anyhow::bail!(
            "{} {}",
            response.status,
            String::from_utf8_lossy(&response.body).trim_end()
        );
    }
    write_output(&response.body, output.as_deref())
}
