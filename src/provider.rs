// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Pluggable sources of edges, sub-projects and read permission

use crate::types::{Direction, Edge, ProjectNode};

/// A source of edges between jobs.
///
/// Providers need not be symmetric: the calculator asks for both directions
/// explicitly and merges whatever comes back.
pub trait EdgeProvider {
    /// Edges incident with `node` on the given side
    fn edges_incident_with(&self, node: &ProjectNode, direction: Direction) -> Vec<Edge>;
}

/// A source of display-only sub-nodes
pub trait SubProjectProvider {
    /// Jobs shown nested inside `node`, in display order
    fn sub_projects_of(&self, node: &ProjectNode) -> Vec<ProjectNode>;
}

/// Permission predicate consulted once per expanded node
pub trait AccessControl {
    /// Whether the caller may read the job behind `node`
    fn can_read(&self, node: &ProjectNode) -> bool;
}

/// Access control that grants everything
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAll;

impl AccessControl for AllowAll {
    fn can_read(&self, _node: &ProjectNode) -> bool {
        true
    }
}

impl<F> AccessControl for F
where
    F: Fn(&ProjectNode) -> bool,
{
    fn can_read(&self, node: &ProjectNode) -> bool {
        self(node)
    }
}

impl<F> EdgeProvider for F
where
    F: Fn(&ProjectNode, Direction) -> Vec<Edge>,
{
    fn edges_incident_with(&self, node: &ProjectNode, direction: Direction) -> Vec<Edge> {
        self(node, direction)
    }
}

impl<F> SubProjectProvider for F
where
    F: Fn(&ProjectNode) -> Vec<ProjectNode>,
{
    fn sub_projects_of(&self, node: &ProjectNode) -> Vec<ProjectNode> {
        self(node)
    }
}
