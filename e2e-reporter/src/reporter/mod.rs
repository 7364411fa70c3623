// Copyright (c) The e2e-reporter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Report the progress and results of an end-to-end test run.
//!
//! The main type here is [`RunAggregator`], which is constructed via a [`RunAggregatorBuilder`]
//! and driven by the host through the [`HostReporter`] trait.

mod duration;
mod helpers;
mod host;
mod imp;
mod session;
mod summary;

pub use host::*;
pub use imp::*;
pub use session::*;
pub use summary::{RunSummary, worst_state};
