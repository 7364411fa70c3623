// Copyright (c) The e2e-reporter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Rendering of run summaries, for the console and for the log file.

use super::{
    RunSession, SuiteRecord, TestRecord,
    duration::DisplayMinSec,
    helpers::{RULE, Styles},
};
use crate::events::TestState;
use owo_colors::OwoColorize;
use std::time::Duration;
use swrite::{SWrite, swrite, swriteln};

/// Aggregate counts for a run.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct RunSummary {
    /// The number of suite-start events seen.
    pub num_suites: usize,

    /// The number of recorded suites in which no test failed.
    pub num_suites_ok: usize,

    /// The number of recorded suites with at least one failed test.
    pub num_suites_failed: usize,

    /// The number of test-pass events seen.
    pub num_tests_ok: usize,

    /// The number of test-fail events seen.
    pub num_tests_failed: usize,

    /// The number of test-skip events seen.
    pub num_tests_skipped: usize,
}

impl RunSummary {
    /// Computes the summary for a session.
    ///
    /// Suite counts use the same classification as the per-suite lines of the console summary.
    pub fn new(session: &RunSession) -> Self {
        let num_suites_ok = session.suites().iter().filter(|s| s.is_ok()).count();
        Self {
            num_suites: session.num_suites(),
            num_suites_ok,
            num_suites_failed: session.suites().len() - num_suites_ok,
            num_tests_ok: session.num_tests_ok(),
            num_tests_failed: session.num_tests_failed(),
            num_tests_skipped: session.num_tests_skipped(),
        }
    }

    /// Returns true if at least one test failed.
    pub fn has_failures(&self) -> bool {
        self.num_tests_failed > 0 || self.num_suites_failed > 0
    }
}

/// Returns the worst state among `tests`, or `None` if there are no tests.
///
/// `failed` beats everything, `skipped` and `pending` beat `passed`. Between `skipped` and
/// `pending`, whichever comes first wins.
pub fn worst_state<'a>(tests: impl IntoIterator<Item = &'a TestRecord>) -> Option<TestState> {
    fn severity(state: TestState) -> u8 {
        match state {
            TestState::Passed => 0,
            TestState::Pending | TestState::Skipped => 1,
            TestState::Failed => 2,
        }
    }

    let mut worst: Option<TestState> = None;
    for test in tests {
        // Strictly greater: among equally severe states the first one seen is kept.
        if worst.is_none_or(|worst| severity(test.state) > severity(worst)) {
            worst = Some(test.state);
        }
    }
    worst
}

/// Writes the end-of-run summary shown on the console.
pub(super) fn write_console_summary(
    session: &RunSession,
    elapsed: Duration,
    styles: &Styles,
    out: &mut String,
) {
    let summary = RunSummary::new(session);

    let header = format!("Done running {} specs, results:", summary.num_suites);
    out.push('\n');
    for line in [RULE, header.as_str(), RULE] {
        swriteln!(out, "{}", line.style(styles.banner));
    }

    for suite in session.suites() {
        write_console_suite(suite, out);
    }

    for line in [
        RULE.to_owned(),
        format!(
            "These {} specs took {}",
            summary.num_suites,
            DisplayMinSec(elapsed)
        ),
        format!("      Num suites ok: {}", summary.num_suites_ok),
        format!("  Num suites failed: {}", summary.num_suites_failed),
        format!("       Num tests ok: {}", summary.num_tests_ok),
        format!("   Num tests failed: {}", summary.num_tests_failed),
        format!("  Num tests skipped: {}", summary.num_tests_skipped),
        RULE.to_owned(),
    ] {
        swriteln!(out, "{}", line.style(styles.banner));
    }
}

fn write_console_suite(suite: &SuiteRecord, out: &mut String) {
    let mut ok = true;
    for test in suite.failed_tests() {
        ok = false;
        swriteln!(out, "----- Failed:  {}:  {}", suite.title, test.title);
        for error in &test.errors {
            swriteln!(out, "  Stack trace: {}", error.stack);
        }
    }
    if ok {
        swriteln!(out, "----- Ok:  {}", suite.title);
    }
}

/// Renders the per-suite log written to the log file.
pub(super) fn render_log(session: &RunSession) -> String {
    let mut text = String::new();
    for suite in session.suites() {
        swriteln!(text, "SUITE: {}", suite.title);
        let mut ok = true;
        for test in suite.failed_tests() {
            ok = false;
            swriteln!(text, "----- FAILED: {}: {}", suite.title, test.title);
            for error in &test.errors {
                swriteln!(text, "{}", error.stack);
            }
        }
        if ok {
            match worst_state(&suite.tests) {
                Some(state) => swrite!(text, "----- {state}:  "),
                None => swrite!(text, "----- no tests:  "),
            }
            swriteln!(text, "{}", suite.title);
        }
    }
    text
}

/// Renders the record written to the log file when a test fails.
pub(super) fn render_failure_record(test: &TestRecord) -> String {
    let mut text = String::new();
    swriteln!(text, "----- FAILED: {}", test.full_title);
    for error in &test.errors {
        swriteln!(text, "{}", error.stack);
    }
    text.push('\n');
    text
}
