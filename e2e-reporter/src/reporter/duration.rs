// Copyright (c) The e2e-reporter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Display helpers for durations.

use std::{fmt, time::Duration};

/// Rounds a duration to the nearest second.
pub(super) fn rounded_secs(duration: Duration) -> u64 {
    duration.as_secs_f64().round() as u64
}

/// Displays a duration as `<m> min <s> sec`, rounded to the nearest second.
pub(super) struct DisplayMinSec(pub(super) Duration);

impl fmt::Display for DisplayMinSec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Round the total first, so that 59.6 seconds shows up as "1 min 0 sec" rather than
        // "0 min 60 sec".
        let total_secs = rounded_secs(self.0);
        write!(f, "{} min {} sec", total_secs / 60, total_secs % 60)
    }
}
