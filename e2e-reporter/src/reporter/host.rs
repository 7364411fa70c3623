// Copyright (c) The e2e-reporter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::{
    errors::WriteEventError,
    events::{HookDescriptor, HostEvent, RunnerStart, SuiteDescriptor, TestDescriptor},
};

/// The callbacks a host test runner invokes as a run progresses.
///
/// The host calls these one at a time, on its own thread, in whatever order it delivers events.
/// Implementations must not panic. Errors are returned to the host, which decides whether to keep
/// going.
pub trait HostReporter {
    /// A worker started a run.
    fn on_runner_start(&mut self, runner: &RunnerStart) -> Result<(), WriteEventError>;

    /// The worker finished its run.
    fn on_runner_end(&mut self) -> Result<(), WriteEventError> {
        Ok(())
    }

    /// A suite started.
    fn on_suite_start(&mut self, suite: &SuiteDescriptor) -> Result<(), WriteEventError>;

    /// A suite ended. The descriptor may be a stale or duplicated snapshot.
    fn on_suite_end(&mut self, suite: &SuiteDescriptor) -> Result<(), WriteEventError>;

    /// A test started.
    fn on_test_start(&mut self, test: &TestDescriptor) -> Result<(), WriteEventError>;

    /// A test ended. Called in addition to the pass, fail or skip callback.
    fn on_test_end(&mut self, _test: &TestDescriptor) -> Result<(), WriteEventError> {
        Ok(())
    }

    /// A test passed.
    fn on_test_pass(&mut self, test: &TestDescriptor) -> Result<(), WriteEventError>;

    /// A test failed.
    fn on_test_fail(&mut self, test: &TestDescriptor) -> Result<(), WriteEventError>;

    /// A test was skipped, or is pending.
    fn on_test_skip(&mut self, test: &TestDescriptor) -> Result<(), WriteEventError>;

    /// A hook started.
    fn on_hook_start(&mut self, _hook: &HookDescriptor) -> Result<(), WriteEventError> {
        Ok(())
    }

    /// A hook ended.
    fn on_hook_end(&mut self, _hook: &HookDescriptor) -> Result<(), WriteEventError> {
        Ok(())
    }

    /// Routes a [`HostEvent`] to the matching callback.
    fn report_event(&mut self, event: &HostEvent) -> Result<(), WriteEventError> {
        match event {
            HostEvent::RunnerStart(runner) => self.on_runner_start(runner),
            HostEvent::RunnerEnd => self.on_runner_end(),
            HostEvent::SuiteStart(suite) => self.on_suite_start(suite),
            HostEvent::SuiteEnd(suite) => self.on_suite_end(suite),
            HostEvent::TestStart(test) => self.on_test_start(test),
            HostEvent::TestEnd(test) => self.on_test_end(test),
            HostEvent::TestPass(test) => self.on_test_pass(test),
            HostEvent::TestFail(test) => self.on_test_fail(test),
            HostEvent::TestSkip(test) => self.on_test_skip(test),
            HostEvent::HookStart(hook) => self.on_hook_start(hook),
            HostEvent::HookEnd(hook) => self.on_hook_end(hook),
        }
    }
}
