// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
#![no_main]

use jobgraph::operations::normalize_child_projects;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|value: &str| {
    let once = normalize_child_projects(value);
    assert_eq!(normalize_child_projects(&once), once);
    assert!(!once.starts_with(','));
    assert!(!once.ends_with(','));
});
