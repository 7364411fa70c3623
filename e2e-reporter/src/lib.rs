// Copyright (c) The e2e-reporter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

#![warn(missing_docs)]

//! Progress reporting for end-to-end test sessions.
//!
//! A host test runner calls into a [`RunAggregator`](reporter::RunAggregator) through the
//! [`HostReporter`](reporter::HostReporter) trait whenever a run, suite, test or hook changes
//! state. The aggregator prints a progress line for each step (so that a hung test is visible as
//! the last line printed), keeps a unique per-run log file, and renders a pass/fail summary for the
//! whole run.

pub mod config;
pub mod errors;
pub mod events;
pub mod exit_codes;
pub mod log_file;
pub mod reporter;
pub mod run_context;
mod stopwatch;
