// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Benchmarks for graph expansion, levels and rendering

#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use jobgraph::calculator::{GraphCalculator, SubprojectMap};
use jobgraph::graph::DependencyGraph;
use jobgraph::level::{levels, CyclePolicy};
use jobgraph::provider::EdgeProvider;
use jobgraph::render::{DotOptions, DotStringGenerator, GraphRenderer, JsonStringGenerator};
use jobgraph::types::{Direction, Edge, EdgeKind, ProjectNode};
use std::collections::HashMap;

fn node(i: usize) -> ProjectNode {
    let name = format!("job-{i}");
    let url = format!("http://ci/job/{name}/");
    ProjectNode::new(name.clone(), name, url).unwrap()
}

/// Layered graph: every job triggers the next `fanout` jobs
fn edges(size: usize, fanout: usize) -> Vec<Edge> {
    (0..size)
        .flat_map(|i| (1..=fanout).map(move |k| (i, i + k)))
        .filter(|&(_, j)| j < size)
        .map(|(i, j)| Edge::new(node(i), node(j), EdgeKind::BuildTrigger))
        .collect()
}

struct Indexed {
    upstream: HashMap<ProjectNode, Vec<Edge>>,
    downstream: HashMap<ProjectNode, Vec<Edge>>,
}

impl Indexed {
    fn new(edges: Vec<Edge>) -> Self {
        let mut upstream: HashMap<ProjectNode, Vec<Edge>> = HashMap::new();
        let mut downstream: HashMap<ProjectNode, Vec<Edge>> = HashMap::new();
        for e in edges {
            upstream.entry(e.target.clone()).or_default().push(e.clone());
            downstream.entry(e.source.clone()).or_default().push(e);
        }
        Self { upstream, downstream }
    }
}

impl EdgeProvider for Indexed {
    fn edges_incident_with(&self, node: &ProjectNode, direction: Direction) -> Vec<Edge> {
        let map = match direction {
            Direction::Upstream => &self.upstream,
            Direction::Downstream => &self.downstream,
        };
        map.get(node).cloned().unwrap_or_default()
    }
}

fn expand(provider: &Indexed) -> DependencyGraph {
    GraphCalculator::new(vec![provider as &dyn EdgeProvider]).generate_graph(vec![node(0)])
}

fn bench_expansion(c: &mut Criterion) {
    let mut group = c.benchmark_group("expansion");
    for size in [100, 1_000, 5_000] {
        let provider = Indexed::new(edges(size, 3));
        group.bench_with_input(BenchmarkId::from_parameter(size), &provider, |b, p| {
            b.iter(|| black_box(expand(p)));
        });
    }
    group.finish();
}

fn bench_levels(c: &mut Criterion) {
    let graph = expand(&Indexed::new(edges(5_000, 3)));
    c.bench_function("levels_5000", |b| {
        b.iter(|| black_box(levels(&graph, CyclePolicy::Fail).unwrap()));
    });
}

fn bench_render(c: &mut Criterion) {
    let graph = expand(&Indexed::new(edges(500, 2)));
    let subs = SubprojectMap::new();

    c.bench_function("dot_500", |b| {
        b.iter(|| {
            black_box(
                DotStringGenerator::new(&graph, &subs, DotOptions::default())
                    .generate()
                    .unwrap(),
            )
        });
    });
    c.bench_function("json_500", |b| {
        b.iter(|| black_box(JsonStringGenerator::new(&graph, &subs).generate().unwrap()));
    });
}

criterion_group!(benches, bench_expansion, bench_levels, bench_render);
criterion_main!(benches);
