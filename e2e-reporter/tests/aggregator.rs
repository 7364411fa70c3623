// Copyright (c) The e2e-reporter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests for the run aggregator, driven through host events.

use camino_tempfile::Utf8TempDir;
use color_eyre::eyre::Result;
use e2e_reporter::{
    config::ReporterConfig,
    errors::WriteEventError,
    events::{HostEvent, RunnerStart, SuiteDescriptor, TestDescriptor, TestError, TestState},
    log_file::LogMode,
    reporter::{HostReporter, RunAggregatorBuilder, ReporterStdout, RunSummary},
};
use pretty_assertions::assert_eq;

fn test(title: &str, state: TestState, stacks: &[&str]) -> TestDescriptor {
    TestDescriptor {
        title: title.to_owned(),
        full_title: String::new(),
        state,
        errors: stacks
            .iter()
            .map(|stack| TestError {
                stack: (*stack).to_owned(),
            })
            .collect(),
    }
}

fn suite(title: &str, tests: Vec<TestDescriptor>) -> SuiteDescriptor {
    SuiteDescriptor {
        title: title.to_owned(),
        full_title: String::new(),
        parent: format!("{title}.e2e.ts"),
        tests,
    }
}

/// Returns the events a host sends for a suite, including pass/fail/skip for each test.
fn suite_events(suite: &SuiteDescriptor) -> Vec<HostEvent> {
    let mut events = vec![HostEvent::SuiteStart(suite.clone())];
    for test in &suite.tests {
        events.push(HostEvent::TestStart(test.clone()));
        events.push(match test.state {
            TestState::Passed => HostEvent::TestPass(test.clone()),
            TestState::Failed => HostEvent::TestFail(test.clone()),
            TestState::Pending | TestState::Skipped => HostEvent::TestSkip(test.clone()),
        });
        events.push(HostEvent::TestEnd(test.clone()));
    }
    events.push(HostEvent::SuiteEnd(suite.clone()));
    events
}

struct RunOutput {
    stdout: String,
    log: String,
    summary: RunSummary,
}

fn run(log_mode: LogMode, suites: &[SuiteDescriptor]) -> Result<RunOutput> {
    let temp = Utf8TempDir::new()?;
    let mut builder = RunAggregatorBuilder::new(&ReporterConfig::default_config());
    builder.set_log_dir(temp.path().join("logs")).set_log_mode(log_mode);

    let mut buf = Vec::new();
    let mut aggregator = builder.build(ReporterStdout::Buffer(&mut buf))?;

    aggregator.report_event(&HostEvent::RunnerStart(RunnerStart {
        cid: "[0-0]".to_owned(),
    }))?;
    for suite in suites {
        for event in suite_events(suite) {
            aggregator.report_event(&event)?;
        }
    }
    aggregator.report_event(&HostEvent::RunnerEnd)?;

    let summary = aggregator.summary();
    let log = std::fs::read_to_string(aggregator.log_file_path())?;
    drop(aggregator);

    Ok(RunOutput {
        stdout: String::from_utf8(buf)?,
        log,
        summary,
    })
}

#[test]
fn failing_suite_is_reported() -> Result<()> {
    let output = run(
        LogMode::Overwrite,
        &[suite(
            "Login tests",
            vec![test("logs in", TestState::Failed, &["Error: timeout"])],
        )],
    )?;

    assert!(
        output
            .stdout
            .contains("----- Failed:  Login tests:  logs in\n"),
        "stdout: {}",
        output.stdout
    );
    assert!(
        output.stdout.contains("  Stack trace: Error: timeout\n"),
        "stdout: {}",
        output.stdout
    );

    // In overwrite mode only the end-of-run suite log survives.
    assert_eq!(
        output.log,
        "SUITE: Login tests\n----- FAILED: Login tests: logs in\nError: timeout\n"
    );

    assert_eq!(
        output.summary,
        RunSummary {
            num_suites: 1,
            num_suites_ok: 0,
            num_suites_failed: 1,
            num_tests_ok: 0,
            num_tests_failed: 1,
            num_tests_skipped: 0,
        }
    );
    assert!(output.summary.has_failures());
    Ok(())
}

#[test]
fn passing_run_summary() -> Result<()> {
    let suites = [
        suite(
            "Login tests",
            vec![
                test("logs in", TestState::Passed, &[]),
                test("logs out", TestState::Passed, &[]),
            ],
        ),
        suite(
            "Search",
            vec![
                test("finds pages", TestState::Passed, &[]),
                test("finds users", TestState::Passed, &[]),
                test("paginates", TestState::Passed, &[]),
            ],
        ),
        suite(
            "Settings",
            vec![
                test("changes email", TestState::Passed, &[]),
                test("changes password", TestState::Passed, &[]),
            ],
        ),
    ];
    let output = run(LogMode::Append, &suites)?;

    for expected in [
        "Done running 3 specs, results:\n",
        "----- Ok:  Login tests\n",
        "----- Ok:  Search\n",
        "----- Ok:  Settings\n",
        "      Num suites ok: 3\n",
        "  Num suites failed: 0\n",
        "       Num tests ok: 7\n",
        "   Num tests failed: 0\n",
        "  Num tests skipped: 0\n",
        "These 3 specs took 0 min 0 sec\n",
    ] {
        assert!(
            output.stdout.contains(expected),
            "expected {expected:?} in stdout: {}",
            output.stdout
        );
    }
    assert!(!output.stdout.contains("Failed:"), "stdout: {}", output.stdout);

    // Progress lines for every suite and test.
    assert!(output.stdout.contains("Suite start: \"Search\", "));
    assert!(output.stdout.contains("Suite ended after 0 seconds: \"Search\", "));
    assert!(output.stdout.contains("\npaginates\n"));

    assert_eq!(
        output.log,
        "SUITE: Login tests\n----- passed:  Login tests\n\
         SUITE: Search\n----- passed:  Search\n\
         SUITE: Settings\n----- passed:  Settings\n"
    );
    assert!(!output.summary.has_failures());
    Ok(())
}

#[test]
fn append_mode_keeps_failure_records() -> Result<()> {
    let output = run(
        LogMode::Append,
        &[
            suite(
                "Login tests",
                vec![
                    test("logs in", TestState::Failed, &["Error: timeout"]),
                    test("logs out", TestState::Skipped, &[]),
                ],
            ),
            suite(
                "Search",
                vec![
                    test("finds pages", TestState::Passed, &[]),
                    test("finds users", TestState::Pending, &[]),
                ],
            ),
        ],
    )?;

    assert_eq!(
        output.log,
        "----- FAILED: logs in\nError: timeout\n\n\
         SUITE: Login tests\n\
         ----- FAILED: Login tests: logs in\nError: timeout\n\
         SUITE: Search\n\
         ----- pending:  Search\n"
    );

    assert!(output.stdout.contains("SKIPPING: logs out\n"));
    assert!(output.stdout.contains("SKIPPING: finds users\n"));
    assert_eq!(output.summary.num_tests_ok, 1);
    assert_eq!(output.summary.num_tests_failed, 1);
    assert_eq!(output.summary.num_tests_skipped, 2);
    assert_eq!(output.summary.num_suites_ok, 1);
    assert_eq!(output.summary.num_suites_failed, 1);
    Ok(())
}

#[test]
fn stale_suite_snapshots_are_tolerated() -> Result<()> {
    let temp = Utf8TempDir::new()?;
    let mut builder = RunAggregatorBuilder::new(&ReporterConfig::default_config());
    builder
        .set_log_dir(temp.path())
        .set_summary_on_run_end(false);

    let mut buf = Vec::new();
    let mut aggregator = builder.build(ReporterStdout::Buffer(&mut buf))?;

    // The host redelivers the first suite's (empty, pre-start) snapshot on every suite end.
    let stale = suite("Login tests", Vec::new());
    let second = suite("Search", vec![test("finds pages", TestState::Passed, &[])]);
    aggregator.on_suite_start(&stale)?;
    aggregator.on_suite_end(&stale)?;
    aggregator.on_suite_start(&second)?;
    aggregator.on_test_start(&second.tests[0])?;
    aggregator.on_test_pass(&second.tests[0])?;
    aggregator.on_suite_end(&stale)?;
    aggregator.on_runner_end()?;

    let session = aggregator.session();
    assert_eq!(session.num_suites(), 2);
    let records: Vec<_> = session
        .suites()
        .iter()
        .map(|record| (record.index, record.title.as_str()))
        .collect();
    assert_eq!(records, [(0, "Login tests"), (1, "Login tests")]);
    assert_eq!(session.num_tests_ok(), 1);

    // With summaries disabled, nothing was written to the log.
    assert!(!aggregator.log_file_path().exists());

    aggregator.print_to_file()?;
    let log = std::fs::read_to_string(aggregator.log_file_path())?;
    assert_eq!(
        log,
        "SUITE: Login tests\n----- no tests:  Login tests\n\
         SUITE: Login tests\n----- no tests:  Login tests\n"
    );
    Ok(())
}

#[test]
fn log_dir_failure_is_fatal() -> Result<()> {
    let temp = Utf8TempDir::new()?;
    let blocker = temp.path().join("blocker");
    std::fs::write(&blocker, "")?;

    let mut builder = RunAggregatorBuilder::new(&ReporterConfig::default_config());
    builder.set_log_dir(blocker.join("logs"));
    let mut buf = Vec::new();
    let error = builder
        .build(ReporterStdout::Buffer(&mut buf))
        .expect_err("log dir can't be created under a file");
    assert_eq!(error.dir(), &blocker.join("logs"));
    Ok(())
}

#[test]
fn log_write_errors_surface_and_counting_continues() -> Result<()> {
    let temp = Utf8TempDir::new()?;
    let log_dir = temp.path().join("logs");
    let mut builder = RunAggregatorBuilder::new(&ReporterConfig::default_config());
    builder.set_log_dir(&log_dir);

    let mut buf = Vec::new();
    let mut aggregator = builder.build(ReporterStdout::Buffer(&mut buf))?;
    std::fs::remove_dir_all(&log_dir)?;

    let failing = test("logs in", TestState::Failed, &["Error: timeout"]);
    let error = aggregator
        .on_test_fail(&failing)
        .expect_err("log directory is gone");
    match error {
        WriteEventError::Fs { file, .. } => {
            assert_eq!(file.as_path(), aggregator.log_file_path())
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(aggregator.session().num_tests_failed(), 1);

    aggregator.on_test_pass(&test("logs out", TestState::Passed, &[]))?;
    assert_eq!(aggregator.session().num_tests_ok(), 1);
    assert!(aggregator.summary().has_failures());
    drop(aggregator);

    // The console banner is written even though the log record couldn't be.
    let stdout = String::from_utf8(buf)?;
    assert!(
        stdout.contains("FAILED after 0s: \"logs in\", "),
        "stdout: {stdout}"
    );
    Ok(())
}
