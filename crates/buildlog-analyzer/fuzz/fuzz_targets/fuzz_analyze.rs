// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Fuzz target for whole-log analysis
//!
//! Raw bytes go straight into `analyze`, including invalid UTF-8.

#![no_main]

use libfuzzer_sys::fuzz_target;

use buildlog_analyzer::analyze;

fuzz_target!(|data: &[u8]| {
    if let Ok(result) = analyze(data, "1_2_abc_3.log") {
        if let (Some(run), Some(ok), Some(failed)) =
            (result.num_tests_run, result.num_tests_ok, result.num_tests_failed)
        {
            assert_eq!(ok + failed, run);
        }
        let _ = result.to_record();
    }
});
