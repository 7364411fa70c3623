// Copyright (c) The e2e-reporter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Exit codes for the `e2e-reporter` binary.

/// Documented exit codes for `e2e-reporter` runs.
///
/// Unknown/unexpected failures will always result in exit code 1.
pub enum ReporterExitCode {}

impl ReporterExitCode {
    /// The replayed run finished and no test failed.
    pub const OK: i32 = 0;

    /// The replayed run finished and one or more tests failed.
    pub const TEST_RUN_FAILED: i32 = 100;

    /// A line of the host event stream couldn't be parsed.
    pub const INVALID_EVENT_STREAM: i32 = 97;

    /// An error was encountered while setting up the reporter: reading config, creating the log
    /// directory, or opening the event stream.
    pub const SETUP_ERROR: i32 = 96;
}
