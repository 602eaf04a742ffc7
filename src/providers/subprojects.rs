// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Sub-projects: the jobs a job calls from blocking build steps

use crate::provider::SubProjectProvider;
use crate::registry::JobRegistry;
use crate::types::ProjectNode;

/// Reports the targets of a job's blocking build-step triggers as its sub-projects
#[derive(Debug, Clone, Copy)]
pub struct TriggerBuilderSubProjects<'r> {
    registry: &'r JobRegistry,
}

impl<'r> TriggerBuilderSubProjects<'r> {
    /// Provider over `registry`
    #[must_use]
    pub fn new(registry: &'r JobRegistry) -> Self {
        Self { registry }
    }
}

impl SubProjectProvider for TriggerBuilderSubProjects<'_> {
    fn sub_projects_of(&self, node: &ProjectNode) -> Vec<ProjectNode> {
        let Some(job) = self.registry.job(node.full_name()) else {
            return vec![];
        };
        job.trigger_builders
            .iter()
            .flat_map(|config| self.registry.resolve_list(job, &config.projects))
            .filter_map(|sub| self.registry.node(&sub.full_name))
            .collect()
    }
}
