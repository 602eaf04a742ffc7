// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
#![no_main]

use jobgraph::providers::ProviderSet;
use jobgraph::calculator::{GraphCalculator, SubprojectCalculator};
use jobgraph::registry::JobRegistry;
use jobgraph::render::{DotOptions, DotStringGenerator, GraphRenderer, JsonStringGenerator};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(registry) = JobRegistry::from_json(text) else {
        return;
    };

    let providers = ProviderSet::all(&registry);
    let graph = GraphCalculator::new(providers.edge_providers())
        .with_access_control(&registry)
        .generate_graph(registry.nodes().to_vec());
    let subs = SubprojectCalculator::new(providers.sub_project_providers()).generate(&graph);

    let dot = DotStringGenerator::new(&graph, &subs, DotOptions::default())
        .generate()
        .unwrap();
    assert!(dot.ends_with("}\n"));

    let json = JsonStringGenerator::new(&graph, &subs).generate().unwrap();
    let _: serde_json::Value = serde_json::from_str(&json).unwrap();
});
