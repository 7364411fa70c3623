// Copyright (c) The e2e-reporter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Prints out and aggregates test progress.
//!
//! The main structure in this module is [`RunAggregator`].

use super::{
    HostReporter, RunSession, RunSummary, TestRecord,
    duration::rounded_secs,
    helpers::{Styles, now_string},
    summary::{render_failure_record, render_log, write_console_summary},
};
use crate::{
    config::ReporterConfig,
    errors::{LogDirCreateError, WriteEventError},
    events::{RunnerStart, SuiteDescriptor, TestDescriptor},
    log_file::{LogFile, LogMode},
    run_context::RunContext,
};
use camino::{Utf8Path, Utf8PathBuf};
use debug_ignore::DebugIgnore;
use owo_colors::{OwoColorize, Style};
use std::io::{self, BufWriter, Stdout, Write};
use tracing::debug;

/// Standard output destination for the reporter.
///
/// This is usually the terminal, but can be an in-memory buffer for tests.
pub enum ReporterStdout<'a> {
    /// Produce output on the (possibly piped) terminal.
    Terminal,

    /// Write output to a buffer.
    Buffer(&'a mut Vec<u8>),
}

/// Run aggregator builder.
#[derive(Clone, Debug)]
pub struct RunAggregatorBuilder {
    log_dir: Utf8PathBuf,
    log_file_prefix: String,
    log_mode: LogMode,
    label_prefix: String,
    summary_on_run_end: bool,
    should_colorize: bool,
}

impl RunAggregatorBuilder {
    /// Creates a new builder from the given configuration.
    pub fn new(config: &ReporterConfig) -> Self {
        Self {
            log_dir: config.log_dir.clone(),
            log_file_prefix: config.log_file_prefix.clone(),
            log_mode: config.log_mode,
            label_prefix: config.label_prefix.clone(),
            summary_on_run_end: config.summary_on_run_end,
            should_colorize: false,
        }
    }

    /// Sets the directory in which the log file is created.
    pub fn set_log_dir(&mut self, log_dir: impl Into<Utf8PathBuf>) -> &mut Self {
        self.log_dir = log_dir.into();
        self
    }

    /// Sets the way records are written to the log file.
    pub fn set_log_mode(&mut self, log_mode: LogMode) -> &mut Self {
        self.log_mode = log_mode;
        self
    }

    /// Sets whether summaries are rendered when the runner ends.
    pub fn set_summary_on_run_end(&mut self, summary_on_run_end: bool) -> &mut Self {
        self.summary_on_run_end = summary_on_run_end;
        self
    }

    /// Set to true if the reporter should colorize output.
    pub fn set_colorize(&mut self, should_colorize: bool) -> &mut Self {
        self.should_colorize = should_colorize;
        self
    }

    /// Creates a new run aggregator.
    ///
    /// This creates the log directory if it doesn't exist. Failing to do so is fatal.
    pub fn build<'a>(
        &self,
        output: ReporterStdout<'a>,
    ) -> Result<RunAggregator<'a>, LogDirCreateError> {
        let log_file = LogFile::create(&self.log_dir, &self.log_file_prefix, self.log_mode)?;

        let mut styles: Box<Styles> = Box::default();
        if self.should_colorize {
            styles.colorize();
        }

        let stdout = match output {
            ReporterStdout::Terminal => ConsoleWriter::Terminal(BufWriter::new(io::stdout())),
            ReporterStdout::Buffer(buf) => ConsoleWriter::Buffer(DebugIgnore(buf)),
        };

        Ok(RunAggregator {
            label_prefix: self.label_prefix.clone(),
            summary_on_run_end: self.summary_on_run_end,
            styles,
            stdout,
            log_file,
            run_context: None,
            session: RunSession::new(),
        })
    }
}

/// Aggregates lifecycle events for one run, printing progress as it goes.
///
/// One aggregator exists per worker process. It prints a line when each suite and test starts, so
/// that the last line on screen shows what was running if a test hangs.
#[derive(Debug)]
pub struct RunAggregator<'a> {
    label_prefix: String,
    summary_on_run_end: bool,
    styles: Box<Styles>,
    stdout: ConsoleWriter<'a>,
    log_file: LogFile,
    run_context: Option<RunContext>,
    session: RunSession,
}

impl RunAggregator<'_> {
    /// Returns the run context published at runner start, or `None` if the runner hasn't started.
    pub fn run_context(&self) -> Option<&RunContext> {
        self.run_context.as_ref()
    }

    /// Returns the counters and records collected so far.
    pub fn session(&self) -> &RunSession {
        &self.session
    }

    /// Returns aggregate counts for the run so far.
    pub fn summary(&self) -> RunSummary {
        RunSummary::new(&self.session)
    }

    /// Returns the path to this run's log file.
    pub fn log_file_path(&self) -> &Utf8Path {
        self.log_file.path()
    }

    /// Prints the results of all recorded suites, and aggregate counts, to the console.
    pub fn print_to_console(&mut self) -> Result<(), WriteEventError> {
        let mut out = String::new();
        write_console_summary(
            &self.session,
            self.session.run_elapsed(),
            &self.styles,
            &mut out,
        );
        self.stdout.write_str(&out)
    }

    /// Writes the results of all recorded suites to the log file.
    pub fn print_to_file(&mut self) -> Result<(), WriteEventError> {
        let text = render_log(&self.session);
        self.log_file.write_record(&text)
    }

    fn write_failure_banner(&mut self, test: &TestDescriptor) -> Result<(), WriteEventError> {
        let banner = format!(
            "FAILED after {}s: \"{}\", {}",
            rounded_secs(self.session.suite_elapsed()),
            test.title,
            now_string()
        );
        let mut stack_traces = String::from("Stack trace:");
        for error in &test.errors {
            stack_traces.push('\n');
            stack_traces.push_str(&error.stack);
        }

        self.write_line(self.styles.banner, "")?;
        self.write_line(self.styles.banner, &banner)?;
        self.write_line(self.styles.progress, &stack_traces)?;
        self.write_line(self.styles.progress, "")
    }

    fn write_line(&mut self, style: Style, line: &str) -> Result<(), WriteEventError> {
        self.stdout.write_str(&format!("{}\n", line.style(style)))
    }
}

impl HostReporter for RunAggregator<'_> {
    fn on_runner_start(&mut self, runner: &RunnerStart) -> Result<(), WriteEventError> {
        self.session.restart_run();
        let context = RunContext::new(
            &self.label_prefix,
            &runner.cid,
            &self.session.run_start().start_time(),
        );
        debug!(cid = context.cid(), "run label: {}", context.label());
        self.run_context = Some(context);
        Ok(())
    }

    fn on_runner_end(&mut self) -> Result<(), WriteEventError> {
        // Console failures must not keep the log from being written and closed.
        let (console_res, file_res) = if self.summary_on_run_end {
            (self.print_to_console(), self.print_to_file())
        } else {
            (Ok(()), Ok(()))
        };
        let close_res = self.log_file.close();
        console_res.and(file_res).and(close_res)
    }

    fn on_suite_start(&mut self, suite: &SuiteDescriptor) -> Result<(), WriteEventError> {
        self.session.suite_started();
        let line = format!(
            "Suite start: \"{}\", {}",
            suite.qualified_title(),
            now_string()
        );
        self.write_line(self.styles.banner, &line)
    }

    fn on_suite_end(&mut self, suite: &SuiteDescriptor) -> Result<(), WriteEventError> {
        let record = self.session.suite_ended(suite);
        debug!(
            index = record.index,
            tests = record.tests.len(),
            "recorded suite {:?}",
            record.title
        );
        let line = format!(
            "Suite ended after {} seconds: \"{}\", {}",
            rounded_secs(self.session.suite_elapsed()),
            suite.title,
            now_string()
        );
        self.write_line(self.styles.banner, &line)
    }

    fn on_test_start(&mut self, test: &TestDescriptor) -> Result<(), WriteEventError> {
        self.write_line(self.styles.progress, &test.title)
    }

    fn on_test_pass(&mut self, _test: &TestDescriptor) -> Result<(), WriteEventError> {
        self.session.test_passed();
        Ok(())
    }

    fn on_test_fail(&mut self, test: &TestDescriptor) -> Result<(), WriteEventError> {
        self.session.test_failed(test);

        let console_res = self.write_failure_banner(test);
        let record = render_failure_record(&TestRecord::from(test));
        let log_res = self.log_file.write_record(&record);
        console_res.and(log_res)
    }

    fn on_test_skip(&mut self, test: &TestDescriptor) -> Result<(), WriteEventError> {
        self.session.test_skipped();
        self.write_line(self.styles.progress, &format!("SKIPPING: {}", test.title))
    }
}

#[derive(Debug)]
enum ConsoleWriter<'a> {
    Terminal(BufWriter<Stdout>),
    Buffer(DebugIgnore<&'a mut Vec<u8>>),
    #[cfg(test)]
    Broken,
}

impl ConsoleWriter<'_> {
    /// Writes `s` and flushes, so progress is visible even if the next test hangs.
    fn write_str(&mut self, s: &str) -> Result<(), WriteEventError> {
        match self {
            Self::Terminal(buf) => buf
                .write_all(s.as_bytes())
                .and_then(|()| buf.flush())
                .map_err(WriteEventError::Io),
            Self::Buffer(buf) => {
                buf.extend_from_slice(s.as_bytes());
                Ok(())
            }
            #[cfg(test)]
            Self::Broken => Err(WriteEventError::Io(io::Error::from(
                io::ErrorKind::StorageFull,
            ))),
        }
    }
}
