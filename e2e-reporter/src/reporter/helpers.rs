// Copyright (c) The e2e-reporter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use chrono::{SecondsFormat, Utc};
use owo_colors::Style;

/// The horizontal rule used in summary banners.
pub(super) const RULE: &str =
    "---------------------------------------------------------------------";

#[derive(Debug, Default, Clone)]
pub(super) struct Styles {
    /// Banners: suite start/end, failures and the summary header and footer.
    pub(super) banner: Style,
    /// Plain progress lines: test titles, skips and stack traces.
    pub(super) progress: Style,
}

impl Styles {
    pub(super) fn colorize(&mut self) {
        self.banner = Style::new().bright_white().bold();
        self.progress = Style::new().bright_white();
    }
}

/// Returns the current time in RFC 3339 format, with millisecond precision and a `Z` suffix.
pub(super) fn now_string() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
