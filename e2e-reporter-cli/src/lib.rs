// Copyright (c) The e2e-reporter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Command-line host for the e2e progress reporter.
//!
//! The `e2e-reporter` binary stands in for a host test runner: it reads newline-delimited JSON
//! host events and feeds them to a [`RunAggregator`](e2e_reporter::reporter::RunAggregator).

#![warn(missing_docs)]

mod dispatch;
mod errors;
mod output;

#[doc(hidden)]
pub use dispatch::*;
#[doc(hidden)]
pub use errors::*;
#[doc(hidden)]
pub use output::OutputWriter;
