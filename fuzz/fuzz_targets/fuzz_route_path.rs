// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
#![no_main]

use arbitrary::Arbitrary;
use jobgraph::routes::{Method, Route};
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct Input {
    method: u8,
    path: String,
    source: String,
    target: String,
}

fuzz_target!(|input: Input| {
    let method = match input.method % 3 {
        0 => Method::Get,
        1 => Method::Put,
        _ => Method::Delete,
    };
    let _ = Route::parse(method, &input.path);

    let source = input.source.trim();
    let target = input.target.trim();
    if source.is_empty() || target.is_empty() {
        return;
    }
    let path = Route::edge_path(source, target);
    assert_eq!(
        Route::parse(Method::Put, &path).unwrap(),
        Route::PutEdge {
            source: source.to_string(),
            target: target.to_string(),
        }
    );
});
