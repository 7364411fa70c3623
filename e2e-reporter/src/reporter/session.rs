// Copyright (c) The e2e-reporter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Counters and records accumulated over a run.

use crate::{
    events::{SuiteDescriptor, TestDescriptor, TestError, TestState},
    stopwatch::{StopwatchStart, stopwatch},
};
use std::time::Duration;

/// A test, as recorded by the reporter.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TestRecord {
    /// The test title.
    pub title: String,

    /// The suite-qualified title.
    pub full_title: String,

    /// The state of the test when it was recorded.
    pub state: TestState,

    /// Errors reported for this test, in order.
    pub errors: Vec<TestError>,
}

impl From<&TestDescriptor> for TestRecord {
    fn from(test: &TestDescriptor) -> Self {
        Self {
            title: test.title.clone(),
            full_title: test.qualified_title().to_owned(),
            state: test.state,
            errors: test.errors.clone(),
        }
    }
}

/// A suite, as recorded by the reporter when the host signals that it ended.
///
/// Some hosts deliver a stale or duplicated suite snapshot on suite end, so several records may
/// share a title or carry the tests of another suite. Records are told apart by [`index`], which is
/// assigned by the reporter and never derived from the host's suite identity.
///
/// [`index`]: Self::index
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SuiteRecord {
    /// The 0-based position of this record among all suite-end events of the run.
    pub index: usize,

    /// The suite title.
    pub title: String,

    /// The grouping identifier of the parent.
    pub parent: String,

    /// The tests observed for this suite, in order.
    pub tests: Vec<TestRecord>,
}

impl SuiteRecord {
    /// Returns the tests in this suite that failed, in order.
    pub fn failed_tests(&self) -> impl Iterator<Item = &TestRecord> {
        self.tests.iter().filter(|test| test.state.is_failed())
    }

    /// Returns true if no test in this suite failed.
    pub fn is_ok(&self) -> bool {
        self.failed_tests().next().is_none()
    }
}

/// State for a single run, from runner start until the process exits.
#[derive(Clone, Debug)]
pub struct RunSession {
    run_start: StopwatchStart,
    suite_start: StopwatchStart,
    num_suites: usize,
    num_tests_ok: usize,
    num_tests_failed: usize,
    num_tests_skipped: usize,
    suites: Vec<SuiteRecord>,
    failed_tests: Vec<TestRecord>,
}

impl Default for RunSession {
    fn default() -> Self {
        Self::new()
    }
}

impl RunSession {
    /// Creates a new, empty session. The run and suite timers start now.
    pub fn new() -> Self {
        Self {
            run_start: stopwatch(),
            suite_start: stopwatch(),
            num_suites: 0,
            num_tests_ok: 0,
            num_tests_failed: 0,
            num_tests_skipped: 0,
            suites: Vec::new(),
            failed_tests: Vec::new(),
        }
    }

    /// The number of suite-start events seen.
    pub fn num_suites(&self) -> usize {
        self.num_suites
    }

    /// The number of test-pass events seen.
    pub fn num_tests_ok(&self) -> usize {
        self.num_tests_ok
    }

    /// The number of test-fail events seen.
    pub fn num_tests_failed(&self) -> usize {
        self.num_tests_failed
    }

    /// The number of test-skip events seen. Pending tests are reported as skips by the host.
    pub fn num_tests_skipped(&self) -> usize {
        self.num_tests_skipped
    }

    /// The suites recorded on suite end, in order. May contain duplicates.
    pub fn suites(&self) -> &[SuiteRecord] {
        &self.suites
    }

    /// The tests recorded on test failure, in order.
    pub fn failed_tests(&self) -> &[TestRecord] {
        &self.failed_tests
    }

    /// The time elapsed since the run started.
    pub fn run_elapsed(&self) -> Duration {
        self.run_start.elapsed()
    }

    /// The time elapsed since the most recent suite started.
    pub fn suite_elapsed(&self) -> Duration {
        self.suite_start.elapsed()
    }

    pub(crate) fn run_start(&self) -> &StopwatchStart {
        &self.run_start
    }

    pub(crate) fn restart_run(&mut self) {
        self.run_start = stopwatch();
    }

    pub(crate) fn suite_started(&mut self) {
        self.num_suites += 1;
        self.suite_start = stopwatch();
    }

    pub(crate) fn suite_ended(&mut self, suite: &SuiteDescriptor) -> &SuiteRecord {
        let index = self.suites.len();
        let record = SuiteRecord {
            index,
            title: suite.title.clone(),
            parent: suite.parent.clone(),
            tests: suite.tests.iter().map(TestRecord::from).collect(),
        };
        self.suites.push(record);
        &self.suites[index]
    }

    pub(crate) fn test_passed(&mut self) {
        self.num_tests_ok += 1;
    }

    pub(crate) fn test_failed(&mut self, test: &TestDescriptor) {
        self.num_tests_failed += 1;
        self.failed_tests.push(TestRecord::from(test));
    }

    pub(crate) fn test_skipped(&mut self) {
        self.num_tests_skipped += 1;
    }
}
