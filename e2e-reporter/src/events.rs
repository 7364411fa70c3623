// Copyright (c) The e2e-reporter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Descriptors delivered by the host test runner.
//!
//! These types are consumed, not owned: the host decides what a suite or test looks like, and the
//! reporter copies out whatever it needs. In particular, the suite passed to
//! [`HostReporter::on_suite_end`](crate::reporter::HostReporter::on_suite_end) is known to be a
//! stale or duplicated snapshot on some hosts, so nothing here carries an identity that the
//! reporter relies on.

use crate::errors::EventParseError;
use serde::{Deserialize, Serialize};
use std::{fmt, io::BufRead};

/// The terminal state of a test, as reported by the host.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
#[serde(rename_all = "lowercase")]
pub enum TestState {
    /// The test passed.
    Passed,

    /// The test is pending: declared but not run.
    Pending,

    /// The test failed.
    Failed,

    /// The test was skipped.
    Skipped,
}

impl TestState {
    /// Returns the lowercase name of this state, as used in log files.
    pub fn to_static_str(self) -> &'static str {
        match self {
            TestState::Passed => "passed",
            TestState::Pending => "pending",
            TestState::Failed => "failed",
            TestState::Skipped => "skipped",
        }
    }

    /// Returns true if this state is [`Failed`](Self::Failed).
    pub fn is_failed(self) -> bool {
        matches!(self, TestState::Failed)
    }
}

impl fmt::Display for TestState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_static_str())
    }
}

/// A single error entry attached to a failed test.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct TestError {
    /// The stack trace text.
    pub stack: String,
}

/// A test, as delivered by the host.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TestDescriptor {
    /// The test title.
    pub title: String,

    /// The suite-qualified title.
    #[serde(default)]
    pub full_title: String,

    /// The state of the test at the time of the event.
    pub state: TestState,

    /// Errors reported for this test, in order. Empty unless the test failed.
    #[serde(default)]
    pub errors: Vec<TestError>,
}

impl TestDescriptor {
    /// Returns the suite-qualified title, falling back to the plain title if the host didn't
    /// provide one.
    pub fn qualified_title(&self) -> &str {
        if self.full_title.is_empty() {
            &self.title
        } else {
            &self.full_title
        }
    }
}

/// A suite, as delivered by the host.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SuiteDescriptor {
    /// The suite title.
    pub title: String,

    /// The full title, including any parent suites.
    #[serde(default)]
    pub full_title: String,

    /// The grouping identifier of the parent (for example, the spec file).
    #[serde(default)]
    pub parent: String,

    /// The tests observed for this suite, in order.
    #[serde(default)]
    pub tests: Vec<TestDescriptor>,
}

impl SuiteDescriptor {
    /// Returns the full title, falling back to the plain title if the host didn't provide one.
    pub fn qualified_title(&self) -> &str {
        if self.full_title.is_empty() {
            &self.title
        } else {
            &self.full_title
        }
    }
}

/// A setup or teardown hook, as delivered by the host.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct HookDescriptor {
    /// The hook title, for example `"before each" hook`.
    pub title: String,

    /// The suite the hook belongs to.
    #[serde(default)]
    pub parent: String,
}

/// Metadata about the worker that's starting a run.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct RunnerStart {
    /// The worker or channel ID assigned by the host, for example `[0-4]`.
    pub cid: String,
}

/// A lifecycle event, in the form a host writes it to an event stream.
///
/// Each variant maps onto one [`HostReporter`](crate::reporter::HostReporter) callback.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub enum HostEvent {
    /// The runner started.
    RunnerStart(RunnerStart),

    /// The runner ended.
    RunnerEnd,

    /// A suite started.
    SuiteStart(SuiteDescriptor),

    /// A suite ended.
    SuiteEnd(SuiteDescriptor),

    /// A test started.
    TestStart(TestDescriptor),

    /// A test ended, regardless of outcome.
    TestEnd(TestDescriptor),

    /// A test passed.
    TestPass(TestDescriptor),

    /// A test failed.
    TestFail(TestDescriptor),

    /// A test was skipped.
    TestSkip(TestDescriptor),

    /// A hook started.
    HookStart(HookDescriptor),

    /// A hook ended.
    HookEnd(HookDescriptor),
}

impl HostEvent {
    /// Parses a single JSON-encoded event.
    ///
    /// `line_number` is 1-based and only used for error reporting.
    pub fn from_json_line(line: &str, line_number: usize) -> Result<Self, EventParseError> {
        serde_json::from_str(line).map_err(|error| EventParseError::new(line_number, error))
    }
}

/// Reads newline-delimited JSON host events, skipping blank lines.
///
/// Read errors are returned as-is; parse errors carry the line number they occurred on.
pub fn read_events<R: BufRead>(
    reader: R,
) -> impl Iterator<Item = Result<HostEvent, ReadEventError>> {
    reader
        .lines()
        .enumerate()
        .filter_map(|(index, line)| match line {
            Ok(line) if line.trim().is_empty() => None,
            Ok(line) => Some(
                HostEvent::from_json_line(&line, index + 1).map_err(ReadEventError::Parse),
            ),
            Err(error) => Some(Err(ReadEventError::Io(error))),
        })
}

/// An error returned by [`read_events`].
#[derive(Debug, thiserror::Error)]
pub enum ReadEventError {
    /// The underlying reader failed.
    #[error("error reading host events")]
    Io(#[source] std::io::Error),

    /// A line couldn't be parsed.
    #[error(transparent)]
    Parse(EventParseError),
}
