// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Edge and sub-project providers backed by the job registry

mod subprojects;

pub use subprojects::TriggerBuilderSubProjects;

use crate::provider::{EdgeProvider, SubProjectProvider};
use crate::registry::{Job, JobRegistry};
use crate::types::{Direction, Edge, EdgeKind, ProjectNode};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

/// Which end of a relationship carries its configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclaredOn {
    /// The upstream job lists its downstream jobs
    Upstream,
    /// The downstream job lists its upstream jobs
    Downstream,
}

/// A kind of relationship configuration found on jobs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EdgeSource {
    /// Post-build trigger
    BuildTrigger,
    /// Post-build parameterized trigger
    ParameterizedTrigger,
    /// Blocking build-step trigger
    TriggerBuilder,
    /// Copied artifacts
    CopyArtifact,
    /// Fan-in reverse trigger
    ReverseTrigger,
    /// Maven module dependency
    Maven,
    /// Plain declared dependency
    Dependency,
}

impl EdgeSource {
    /// All sources, in the order providers are assembled
    pub const ALL: [EdgeSource; 7] = [
        Self::Dependency,
        Self::BuildTrigger,
        Self::ParameterizedTrigger,
        Self::TriggerBuilder,
        Self::CopyArtifact,
        Self::ReverseTrigger,
        Self::Maven,
    ];

    /// Configuration name
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::BuildTrigger => "build-trigger",
            Self::ParameterizedTrigger => "parameterized-trigger",
            Self::TriggerBuilder => "trigger-builder",
            Self::CopyArtifact => "copy-artifact",
            Self::ReverseTrigger => "reverse-trigger",
            Self::Maven => "maven",
            Self::Dependency => "dependency",
        }
    }

    /// Kind of the edges this source produces
    #[must_use]
    pub fn kind(self) -> EdgeKind {
        match self {
            Self::BuildTrigger => EdgeKind::BuildTrigger,
            Self::ParameterizedTrigger | Self::TriggerBuilder => EdgeKind::ParameterizedTrigger,
            Self::CopyArtifact => EdgeKind::CopyArtifact,
            Self::ReverseTrigger => EdgeKind::ReverseTrigger,
            Self::Maven => EdgeKind::Maven,
            Self::Dependency => EdgeKind::Dependency,
        }
    }

    /// Which job carries the configuration
    #[must_use]
    pub fn declared_on(self) -> DeclaredOn {
        match self {
            Self::BuildTrigger | Self::ParameterizedTrigger | Self::TriggerBuilder => {
                DeclaredOn::Upstream
            }
            Self::CopyArtifact | Self::ReverseTrigger | Self::Maven | Self::Dependency => {
                DeclaredOn::Downstream
            }
        }
    }

    /// Name lists configured on `job` for this source
    #[must_use]
    pub fn name_lists(self, job: &Job) -> Vec<&str> {
        match self {
            Self::BuildTrigger => job
                .build_trigger
                .iter()
                .map(|t| t.child_projects.as_str())
                .collect(),
            Self::ParameterizedTrigger => job
                .parameterized_triggers
                .iter()
                .map(|t| t.projects.as_str())
                .collect(),
            Self::TriggerBuilder => job.trigger_builders.iter().map(|t| t.projects.as_str()).collect(),
            Self::CopyArtifact => job.copy_artifacts.iter().map(String::as_str).collect(),
            Self::ReverseTrigger => vec![job.reverse_triggers.as_str()],
            Self::Maven => job.maven_upstreams.iter().map(String::as_str).collect(),
            Self::Dependency => job.depends_on.iter().map(String::as_str).collect(),
        }
    }
}

impl fmt::Display for EdgeSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EdgeSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|src| src.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                let valid: Vec<_> = Self::ALL.iter().map(|s| s.as_str()).collect();
                format!("unknown edge source: {s}. Valid: {}", valid.join(", "))
            })
    }
}

/// Edge provider answering for one relationship source
#[derive(Debug, Clone, Copy)]
pub struct RegistryEdgeProvider<'r> {
    registry: &'r JobRegistry,
    source: EdgeSource,
}

impl<'r> RegistryEdgeProvider<'r> {
    /// Provider for `source` over `registry`
    #[must_use]
    pub fn new(registry: &'r JobRegistry, source: EdgeSource) -> Self {
        Self { registry, source }
    }

    /// The relationship source answered for
    #[must_use]
    pub fn source(&self) -> EdgeSource {
        self.source
    }

    /// Jobs named by `job`'s own configuration
    fn declared_by(&self, job: &Job) -> Vec<&'r Job> {
        self.source
            .name_lists(job)
            .into_iter()
            .flat_map(|names| self.registry.resolve_list(job, names))
            .collect()
    }

    /// Jobs whose configuration names `job`
    fn declaring(&self, job: &Job) -> Vec<&'r Job> {
        self.registry
            .jobs()
            .iter()
            .filter(|other| self.declared_by(other).iter().any(|j| j.full_name == job.full_name))
            .collect()
    }

    fn edge(&self, source: &Job, target: &Job) -> Option<Edge> {
        let from = self.registry.node(&source.full_name)?;
        let to = self.registry.node(&target.full_name)?;
        Some(Edge::new(from, to, self.source.kind()))
    }
}

impl EdgeProvider for RegistryEdgeProvider<'_> {
    fn edges_incident_with(&self, node: &ProjectNode, direction: Direction) -> Vec<Edge> {
        let Some(job) = self.registry.job(node.full_name()) else {
            return vec![];
        };
        // Own configuration answers one side; the other needs a registry scan.
        match (self.source.declared_on(), direction) {
            (DeclaredOn::Upstream, Direction::Downstream) => self
                .declared_by(job)
                .into_iter()
                .filter_map(|down| self.edge(job, down))
                .collect(),
            (DeclaredOn::Upstream, Direction::Upstream) => self
                .declaring(job)
                .into_iter()
                .filter_map(|up| self.edge(up, job))
                .collect(),
            (DeclaredOn::Downstream, Direction::Upstream) => self
                .declared_by(job)
                .into_iter()
                .filter_map(|up| self.edge(up, job))
                .collect(),
            (DeclaredOn::Downstream, Direction::Downstream) => self
                .declaring(job)
                .into_iter()
                .filter_map(|down| self.edge(job, down))
                .collect(),
        }
    }
}

/// The statically assembled set of providers used for one graph build
pub struct ProviderSet<'r> {
    edge_providers: Vec<RegistryEdgeProvider<'r>>,
    sub_project_providers: Vec<TriggerBuilderSubProjects<'r>>,
}

impl<'r> ProviderSet<'r> {
    /// Providers for the given sources, de-duplicated in order
    #[must_use]
    pub fn new(registry: &'r JobRegistry, sources: &[EdgeSource]) -> Self {
        let mut edge_providers: Vec<RegistryEdgeProvider<'r>> = Vec::new();
        for &source in sources {
            if !edge_providers.iter().any(|p| p.source() == source) {
                edge_providers.push(RegistryEdgeProvider::new(registry, source));
            }
        }
        Self {
            edge_providers,
            sub_project_providers: vec![TriggerBuilderSubProjects::new(registry)],
        }
    }

    /// Providers for the configured source names; unknown names are skipped with a warning
    #[must_use]
    pub fn from_config(registry: &'r JobRegistry, names: &[String]) -> Self {
        let sources: Vec<EdgeSource> = names
            .iter()
            .filter_map(|name| match name.parse() {
                Ok(source) => Some(source),
                Err(e) => {
                    warn!("{}", e);
                    None
                }
            })
            .collect();
        Self::new(registry, &sources)
    }

    /// Every source enabled
    #[must_use]
    pub fn all(registry: &'r JobRegistry) -> Self {
        Self::new(registry, &EdgeSource::ALL)
    }

    /// Edge providers as trait objects
    #[must_use]
    pub fn edge_providers(&self) -> Vec<&dyn EdgeProvider> {
        self.edge_providers.iter().map(|p| p as &dyn EdgeProvider).collect()
    }

    /// Sub-project providers as trait objects
    #[must_use]
    pub fn sub_project_providers(&self) -> Vec<&dyn SubProjectProvider> {
        self.sub_project_providers
            .iter()
            .map(|p| p as &dyn SubProjectProvider)
            .collect()
    }

    /// Enabled sources
    #[must_use]
    pub fn sources(&self) -> Vec<EdgeSource> {
        self.edge_providers.iter().map(RegistryEdgeProvider::source).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{BuildTrigger, RegistryStore, Threshold, TriggerConfig};

    fn registry() -> JobRegistry {
        let mut a = Job::new("f/a");
        a.build_trigger = Some(BuildTrigger {
            child_projects: "b, missing".into(),
            threshold: Threshold::Success,
        });
        a.trigger_builders = vec![TriggerConfig { projects: "/c".into() }];
        let mut b = Job::new("f/b");
        b.copy_artifacts = vec!["a".into()];
        let mut c = Job::new("c");
        c.reverse_triggers = "f/b".into();

        JobRegistry::from_store(RegistryStore {
            root_url: "http://ci/".into(),
            jobs: vec![a, b, c],
        })
        .unwrap()
    }

    fn pairs(edges: &[Edge]) -> Vec<(String, String)> {
        let mut pairs: Vec<_> = edges
            .iter()
            .map(|e| (e.source.full_name().to_string(), e.target.full_name().to_string()))
            .collect();
        pairs.sort();
        pairs
    }

    #[test]
    fn test_upstream_declared_answers_both_directions() {
        let reg = registry();
        let provider = RegistryEdgeProvider::new(&reg, EdgeSource::BuildTrigger);

        let down = provider.edges_incident_with(&reg.node("f/a").unwrap(), Direction::Downstream);
        assert_eq!(pairs(&down), vec![("f/a".into(), "f/b".into())]);
        assert_eq!(down[0].kind, EdgeKind::BuildTrigger);

        let up = provider.edges_incident_with(&reg.node("f/b").unwrap(), Direction::Upstream);
        assert_eq!(pairs(&up), vec![("f/a".into(), "f/b".into())]);

        assert!(provider
            .edges_incident_with(&reg.node("f/a").unwrap(), Direction::Upstream)
            .is_empty());
    }

    #[test]
    fn test_downstream_declared_answers_both_directions() {
        let reg = registry();
        let provider = RegistryEdgeProvider::new(&reg, EdgeSource::CopyArtifact);

        let up = provider.edges_incident_with(&reg.node("f/b").unwrap(), Direction::Upstream);
        assert_eq!(pairs(&up), vec![("f/a".into(), "f/b".into())]);
        assert_eq!(up[0].color(), "lightblue");

        let down = provider.edges_incident_with(&reg.node("f/a").unwrap(), Direction::Downstream);
        assert_eq!(pairs(&down), vec![("f/a".into(), "f/b".into())]);
    }

    #[test]
    fn test_reverse_trigger() {
        let reg = registry();
        let provider = RegistryEdgeProvider::new(&reg, EdgeSource::ReverseTrigger);

        let down = provider.edges_incident_with(&reg.node("f/b").unwrap(), Direction::Downstream);
        assert_eq!(pairs(&down), vec![("f/b".into(), "c".into())]);
        assert_eq!(down[0].kind, EdgeKind::ReverseTrigger);
    }

    #[test]
    fn test_unknown_node_has_no_edges() {
        let reg = registry();
        let provider = RegistryEdgeProvider::new(&reg, EdgeSource::BuildTrigger);
        let stranger = ProjectNode::new("zzz", "zzz", "u").unwrap();

        assert!(provider.edges_incident_with(&stranger, Direction::Downstream).is_empty());
    }

    #[test]
    fn test_edge_source_parse() {
        assert_eq!("copy-artifact".parse::<EdgeSource>(), Ok(EdgeSource::CopyArtifact));
        assert_eq!(" Maven ".parse::<EdgeSource>(), Ok(EdgeSource::Maven));
        assert!("nope".parse::<EdgeSource>().is_err());
    }

    #[test]
    fn test_provider_set_from_config() {
        let reg = registry();
        let names = vec!["maven".to_string(), "bogus".to_string(), "maven".to_string()];
        let set = ProviderSet::from_config(&reg, &names);

        assert_eq!(set.sources(), vec![EdgeSource::Maven]);
        assert_eq!(ProviderSet::all(&reg).edge_providers().len(), EdgeSource::ALL.len());
        assert_eq!(set.sub_project_providers().len(), 1);
    }
}
