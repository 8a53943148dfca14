// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Fuzz target for normalization and fold splitting

#![no_main]

use libfuzzer_sys::fuzz_target;

use buildlog_analyzer::{normalize, split};

fuzz_target!(|data: &[u8]| {
    let text = normalize(data);
    let folds = split(&text);
    assert!(folds.len() >= 1);
    assert_eq!(normalize(text.as_bytes()), text);
});
