// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Job registry - the jobs and trigger configuration the graph is built from

use crate::error::GraphError;
use crate::provider::AccessControl;
use crate::types::ProjectNode;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// File name of the registry inside the data directory
pub const REGISTRY_FILE: &str = "jobs.json";

/// Build result a post-build trigger fires on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Threshold {
    /// Only on success
    Success,
    /// On success or unstable
    #[default]
    Unstable,
    /// Always
    Failure,
}

/// Post-build trigger listing downstream jobs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildTrigger {
    /// Comma separated job names
    pub child_projects: String,
    /// Result threshold
    #[serde(default)]
    pub threshold: Threshold,
}

/// One configured parameterized trigger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerConfig {
    /// Comma separated job names
    pub projects: String,
}

fn default_readable() -> bool {
    true
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn is_true(b: &bool) -> bool {
    *b
}

/// A job and its relationship configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    /// Slash separated path, unique in the registry
    pub full_name: String,
    /// Optional human label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Whether the current caller may read the job
    #[serde(default = "default_readable", skip_serializing_if = "is_true")]
    pub readable: bool,
    /// Post-build trigger
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_trigger: Option<BuildTrigger>,
    /// Post-build parameterized triggers
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameterized_triggers: Vec<TriggerConfig>,
    /// Blocking build-step triggers
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub trigger_builders: Vec<TriggerConfig>,
    /// Jobs artifacts are copied from
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub copy_artifacts: Vec<String>,
    /// Comma separated upstream jobs whose completion triggers this one
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub reverse_triggers: String,
    /// Upstream Maven modules
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub maven_upstreams: Vec<String>,
    /// Plain declared dependencies
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<String>,
}

impl Job {
    /// Create a readable job without relationships
    pub fn new(full_name: impl Into<String>) -> Self {
        Self {
            full_name: full_name.into(),
            display_name: None,
            readable: true,
            build_trigger: None,
            parameterized_triggers: Vec::new(),
            trigger_builders: Vec::new(),
            copy_artifacts: Vec::new(),
            reverse_triggers: String::new(),
            maven_upstreams: Vec::new(),
            depends_on: Vec::new(),
        }
    }

    /// Label shown in rendered graphs; a display name is qualified by its
    /// folders (`a » b » Build`)
    #[must_use]
    pub fn label(&self) -> String {
        match self.display_name.as_deref() {
            None => self.full_name.clone(),
            Some(display) => {
                let folder = self.folder();
                if folder.is_empty() {
                    display.to_string()
                } else {
                    format!("{} » {}", folder.replace('/', " » "), display)
                }
            }
        }
    }

    /// Last path segment
    #[must_use]
    pub fn short_name(&self) -> &str {
        self.full_name.rsplit('/').next().unwrap_or(&self.full_name)
    }

    /// Folder containing the job, empty at the top level
    #[must_use]
    pub fn folder(&self) -> &str {
        folder_of(&self.full_name)
    }
}

fn folder_of(full_name: &str) -> &str {
    full_name.rfind('/').map_or("", |i| &full_name[..i])
}

/// Serialized form of the registry
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegistryStore {
    /// Base URL job URLs are built on
    #[serde(default)]
    pub root_url: String,
    /// All jobs
    #[serde(default)]
    pub jobs: Vec<Job>,
}

/// All known jobs, indexed by full name
#[derive(Debug, Clone, Default)]
pub struct JobRegistry {
    store: RegistryStore,
    nodes: Vec<ProjectNode>,
    index: HashMap<String, usize>,
}

impl JobRegistry {
    /// Build a registry, validating names
    pub fn from_store(store: RegistryStore) -> Result<Self, GraphError> {
        let mut registry = Self {
            store: RegistryStore {
                root_url: normalize_root_url(&store.root_url),
                jobs: Vec::with_capacity(store.jobs.len()),
            },
            nodes: Vec::new(),
            index: HashMap::new(),
        };
        for job in store.jobs {
            registry.add_job(job)?;
        }
        Ok(registry)
    }

    /// Parse a registry document
    pub fn from_json(json: &str) -> Result<Self, GraphError> {
        let store: RegistryStore = serde_json::from_str(json)?;
        Self::from_store(store)
    }

    /// Load `jobs.json` from a data directory; a missing file is an empty registry
    pub fn load(dir: &Path) -> Result<Self> {
        let path = dir.join(REGISTRY_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_json(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    /// Write `jobs.json` into a data directory
    pub fn save(&self, dir: &Path) -> Result<()> {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory {}", dir.display()))?;
        let path = dir.join(REGISTRY_FILE);
        let json = serde_json::to_string_pretty(&self.store).context("Failed to serialize registry")?;
        fs::write(&path, json).with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }

    /// Register a job
    pub fn add_job(&mut self, job: Job) -> Result<(), GraphError> {
        if self.index.contains_key(&job.full_name) {
            return Err(GraphError::InvalidRegistry(format!(
                "duplicate job {}",
                job.full_name
            )));
        }
        let node = ProjectNode::new(&job.full_name, job.label(), self.job_url(&job.full_name))?;
        self.index.insert(job.full_name.clone(), self.store.jobs.len());
        self.store.jobs.push(job);
        self.nodes.push(node);
        Ok(())
    }

    /// Base URL, always ending in `/`
    #[must_use]
    pub fn root_url(&self) -> &str {
        &self.store.root_url
    }

    /// All jobs in registration order
    #[must_use]
    pub fn jobs(&self) -> &[Job] {
        &self.store.jobs
    }

    /// Number of jobs
    #[must_use]
    pub fn len(&self) -> usize {
        self.store.jobs.len()
    }

    /// Whether no job is registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.store.jobs.is_empty()
    }

    /// Look up a job by full name
    #[must_use]
    pub fn job(&self, full_name: &str) -> Option<&Job> {
        self.index.get(full_name).map(|&i| &self.store.jobs[i])
    }

    /// Mutable lookup by full name
    pub fn job_mut(&mut self, full_name: &str) -> Option<&mut Job> {
        self.index.get(full_name).map(|&i| &mut self.store.jobs[i])
    }

    /// The graph node standing for a job
    #[must_use]
    pub fn node(&self, full_name: &str) -> Option<ProjectNode> {
        self.index.get(full_name).map(|&i| self.nodes[i].clone())
    }

    /// Graph nodes for all jobs
    #[must_use]
    pub fn nodes(&self) -> &[ProjectNode] {
        &self.nodes
    }

    /// Absolute URL of a job: `root_url + "job/<seg>/job/<seg>/"`
    #[must_use]
    pub fn job_url(&self, full_name: &str) -> String {
        let mut url = self.store.root_url.clone();
        for segment in full_name.split('/').filter(|s| !s.is_empty()) {
            url.push_str("job/");
            url.push_str(segment);
            url.push('/');
        }
        url
    }

    /// Resolve one job name as seen from `folder`.
    ///
    /// A leading `/` makes the name absolute; `..` and `.` segments are
    /// honoured. A relative name that does not resolve inside the folder is
    /// tried as a full name.
    #[must_use]
    pub fn resolve(&self, folder: &str, name: &str) -> Option<&Job> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        if let Some(absolute) = name.strip_prefix('/') {
            return normalize_path("", absolute).and_then(|n| self.job(&n));
        }
        normalize_path(folder, name)
            .and_then(|n| self.job(&n))
            .or_else(|| self.job(name))
    }

    /// Resolve a comma separated name list relative to `context`.
    ///
    /// Names that do not resolve are dropped.
    #[must_use]
    pub fn resolve_list<'a>(&'a self, context: &Job, names: &str) -> Vec<&'a Job> {
        names
            .split(',')
            .filter_map(|name| self.resolve(context.folder(), name))
            .collect()
    }

    /// How `target` is written in a name list owned by `source`
    #[must_use]
    pub fn relative_name(source: &Job, target: &Job) -> String {
        if source.folder() == target.folder() {
            target.short_name().to_string()
        } else {
            format!("/{}", target.full_name)
        }
    }
}

impl AccessControl for JobRegistry {
    fn can_read(&self, node: &ProjectNode) -> bool {
        self.job(node.full_name()).is_some_and(|job| job.readable)
    }
}

fn normalize_root_url(url: &str) -> String {
    let trimmed = url.trim();
    if trimmed.is_empty() || trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{trimmed}/")
    }
}

/// Join `name` onto `folder`, collapsing `.` and `..`; `None` if it climbs above the root
fn normalize_path(folder: &str, name: &str) -> Option<String> {
    let mut segments: Vec<&str> = folder.split('/').filter(|s| !s.is_empty()).collect();
    for segment in name.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop()?;
            }
            other => segments.push(other),
        }
    }
    if segments.is_empty() {
        None
    } else {
        Some(segments.join("/"))
    }
}
