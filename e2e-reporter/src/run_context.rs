// Copyright (c) The e2e-reporter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-run values published to other parts of the test setup.
//!
//! When a worker starts a run, the reporter derives a short label from the host-assigned worker ID.
//! Other collaborators in the same process use the label and the ID to namespace per-worker
//! resources (for example, a hostname per spec). Rather than stashing these in global state, they
//! live in a [`RunContext`] that's handed out by reference.

use chrono::{DateTime, TimeZone};
use std::fmt;

/// The run label and worker ID for the current run.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RunContext {
    cid: String,
    label: String,
}

impl RunContext {
    /// Creates a new `RunContext` from the host-assigned worker ID.
    ///
    /// Square brackets are stripped from the ID, so `[0-4]` becomes `0-4`. The label is
    /// `<label_prefix>-cid-<id>-now-<digits>`, where the digits are characters 5 through 8 of the
    /// epoch-milliseconds timestamp of `now`: they change every 10 seconds and wrap about every 28
    /// hours, which is enough to tell apart reruns of the same worker.
    pub fn new<Tz: TimeZone>(label_prefix: &str, cid: &str, now: &DateTime<Tz>) -> Self {
        let cid: String = cid.chars().filter(|c| !matches!(c, '[' | ']')).collect();
        let now_digits = time_digits(now.timestamp_millis());
        let label = format!("{label_prefix}-cid-{cid}-now-{now_digits}");
        Self { cid, label }
    }

    /// Returns the worker ID, without brackets.
    pub fn cid(&self) -> &str {
        &self.cid
    }

    /// Returns the run label.
    pub fn label(&self) -> &str {
        &self.label
    }
}

impl fmt::Display for RunContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

fn time_digits(epoch_ms: i64) -> String {
    let digits = epoch_ms.unsigned_abs().to_string();
    match digits.get(5..9) {
        Some(slice) => slice.to_owned(),
        // Timestamps this short only happen with clocks set near the epoch.
        None => format!("{:04}", epoch_ms.unsigned_abs() % 10_000),
    }
}
