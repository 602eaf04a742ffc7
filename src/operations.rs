// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Adding and removing build-trigger edges between jobs

use crate::error::GraphError;
use crate::registry::{BuildTrigger, Job, JobRegistry, Threshold};
use tracing::info;

/// Remove empty entries and stray commas from a job name list
#[must_use]
pub fn normalize_child_projects(value: &str) -> String {
    value
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Outcome of an edge operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeChange {
    /// The trigger was added
    Added,
    /// The trigger already existed
    AlreadyPresent,
    /// This many matching entries were removed
    Removed(usize),
    /// There was nothing to remove
    NotPresent,
}

impl EdgeChange {
    /// Whether the registry was modified
    #[must_use]
    pub fn is_modified(self) -> bool {
        matches!(self, Self::Added | Self::Removed(_))
    }
}

/// A post-build trigger from one job to another
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeOperation {
    source: String,
    target: String,
}

impl EdgeOperation {
    /// Operation on the trigger `source -> target`
    pub fn new(source: impl AsRef<str>, target: impl AsRef<str>) -> Self {
        Self {
            source: source.as_ref().trim().to_string(),
            target: target.as_ref().trim().to_string(),
        }
    }

    fn jobs<'r>(&self, registry: &'r JobRegistry) -> Result<(&'r Job, &'r Job), GraphError> {
        let source = registry
            .job(&self.source)
            .ok_or_else(|| GraphError::JobNotFound(self.source.clone()))?;
        let target = registry
            .job(&self.target)
            .ok_or_else(|| GraphError::JobNotFound(self.target.clone()))?;
        Ok((source, target))
    }

    /// Make `source` trigger `target` after it builds
    pub fn put(&self, registry: &mut JobRegistry) -> Result<EdgeChange, GraphError> {
        let (source, target) = self.jobs(registry)?;
        let name = JobRegistry::relative_name(source, target);

        let updated = match &source.build_trigger {
            Some(trigger) => {
                let present = registry
                    .resolve_list(source, &trigger.child_projects)
                    .iter()
                    .any(|j| j.full_name == target.full_name);
                if present {
                    return Ok(EdgeChange::AlreadyPresent);
                }
                BuildTrigger {
                    child_projects: normalize_child_projects(&format!(
                        "{}, {}",
                        trigger.child_projects, name
                    )),
                    threshold: trigger.threshold,
                }
            }
            None => BuildTrigger {
                child_projects: name,
                threshold: Threshold::Unstable,
            },
        };

        self.store(registry, Some(updated))?;
        info!("Added trigger {} -> {}", self.source, self.target);
        Ok(EdgeChange::Added)
    }

    /// Stop `source` from triggering `target`.
    ///
    /// Only entries resolving to the target are removed; a trigger left
    /// without children is dropped.
    pub fn delete(&self, registry: &mut JobRegistry) -> Result<EdgeChange, GraphError> {
        let (source, target) = self.jobs(registry)?;
        let Some(trigger) = &source.build_trigger else {
            return Ok(EdgeChange::NotPresent);
        };

        let mut removed = 0;
        let kept: Vec<&str> = trigger
            .child_projects
            .split(',')
            .filter(|entry| {
                let hit = registry
                    .resolve(source.folder(), entry)
                    .is_some_and(|j| j.full_name == target.full_name);
                if hit {
                    removed += 1;
                }
                !hit
            })
            .collect();
        if removed == 0 {
            return Ok(EdgeChange::NotPresent);
        }

        let child_projects = normalize_child_projects(&kept.join(","));
        let updated = (!child_projects.is_empty()).then(|| BuildTrigger {
            child_projects,
            threshold: trigger.threshold,
        });

        self.store(registry, updated)?;
        info!("Removed trigger {} -> {}", self.source, self.target);
        Ok(EdgeChange::Removed(removed))
    }

    fn store(&self, registry: &mut JobRegistry, trigger: Option<BuildTrigger>) -> Result<(), GraphError> {
        let job = registry
            .job_mut(&self.source)
            .ok_or_else(|| GraphError::JobNotFound(self.source.clone()))?;
        job.build_trigger = trigger;
        Ok(())
    }
}
