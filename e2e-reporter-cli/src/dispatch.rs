// Copyright (c) The e2e-reporter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::{
    ExpectedError,
    errors::Result,
    output::{OutputContext, OutputOpts, OutputWriter, clap_styles},
};
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Args, Parser, Subcommand, ValueEnum};
use e2e_reporter::{
    config::ReporterConfig,
    errors::DisplayErrorChain,
    events::{ReadEventError, read_events},
    exit_codes::ReporterExitCode,
    log_file::LogMode,
    reporter::{HostReporter, RunAggregator, RunAggregatorBuilder},
};
use std::{
    fs::File,
    io::{self, BufRead, BufReader, Write},
};
use tracing::{debug, info, warn};

/// Progress reporting for end-to-end test sessions.
///
/// Replays a stream of host test-runner events, printing progress as each suite and test starts,
/// writing a per-run log file, and summarizing the run at the end.
#[derive(Debug, Parser)]
#[command(version, name = "e2e-reporter", styles = clap_styles::style())]
pub struct E2eReporterApp {
    #[command(flatten)]
    output: OutputOpts,

    #[command(flatten)]
    config_opts: ConfigOpts,

    #[command(subcommand)]
    command: Command,
}

impl E2eReporterApp {
    /// Executes the app, returning the process exit code.
    pub fn exec(self, output_writer: &mut OutputWriter) -> Result<i32> {
        let output = self.output.init();
        let config = self.config_opts.make_config()?;

        match self.command {
            Command::Replay {
                events,
                reporter_opts,
            } => exec_replay(&events, &reporter_opts, &config, output, output_writer),
            Command::ShowConfig => {
                let text = config
                    .to_toml_string()
                    .map_err(|err| ExpectedError::ConfigRenderError { err: Box::new(err) })?;
                let mut writer = output_writer.stdout_writer();
                writer
                    .write_all(text.as_bytes())
                    .and_then(|()| writer.flush())
                    .map_err(|err| ExpectedError::WriteError { err })?;
                Ok(ReporterExitCode::OK)
            }
        }
    }
}

#[derive(Debug, Args)]
struct ConfigOpts {
    /// Config file [default: built-in defaults only]
    #[arg(long, global = true, value_name = "PATH", env = "E2E_REPORTER_CONFIG")]
    config: Option<Utf8PathBuf>,
}

impl ConfigOpts {
    fn make_config(&self) -> Result<ReporterConfig> {
        ReporterConfig::from_sources(self.config.as_deref())
            .map_err(|err| ExpectedError::from(Box::new(err)))
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Replay host events through the reporter
    ///
    /// Each non-empty line of EVENTS is one JSON-encoded host event, for example
    /// `{"event": "test-start", "title": "logs in"}`. The exit code is 100 if any test failed.
    Replay {
        /// Event stream to read, or `-` for standard input
        #[arg(value_name = "EVENTS", default_value = "-")]
        events: Utf8PathBuf,

        #[command(flatten)]
        reporter_opts: ReporterOpts,
    },

    /// Print the resolved configuration as TOML
    ShowConfig,
}

#[derive(Debug, Args)]
#[command(next_help_heading = "Reporter options")]
struct ReporterOpts {
    /// Directory to create the log file in [default: from config]
    #[arg(long, value_name = "DIR")]
    log_dir: Option<Utf8PathBuf>,

    /// How to write records to the log file [default: from config]
    #[arg(long, value_enum, value_name = "MODE")]
    log_mode: Option<LogModeOpt>,

    /// Don't print summaries when the runner ends
    #[arg(long)]
    no_summary: bool,
}

impl ReporterOpts {
    fn to_builder(&self, config: &ReporterConfig) -> RunAggregatorBuilder {
        let mut builder = RunAggregatorBuilder::new(config);
        if let Some(log_dir) = &self.log_dir {
            builder.set_log_dir(log_dir.clone());
        }
        if let Some(log_mode) = self.log_mode {
            builder.set_log_mode(log_mode.into());
        }
        if self.no_summary {
            builder.set_summary_on_run_end(false);
        }
        builder
    }
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum LogModeOpt {
    /// Keep one handle open and append every record
    Append,

    /// Replace the file contents with each record
    Overwrite,
}

impl From<LogModeOpt> for LogMode {
    fn from(opt: LogModeOpt) -> Self {
        match opt {
            LogModeOpt::Append => LogMode::Append,
            LogModeOpt::Overwrite => LogMode::Overwrite,
        }
    }
}

fn exec_replay(
    events: &Utf8Path,
    reporter_opts: &ReporterOpts,
    config: &ReporterConfig,
    output: OutputContext,
    output_writer: &mut OutputWriter,
) -> Result<i32> {
    let reader: Box<dyn BufRead> = if events.as_str() == "-" {
        Box::new(io::stdin().lock())
    } else {
        let file = File::open(events).map_err(|err| ExpectedError::EventFileOpenError {
            path: events.to_owned(),
            err,
        })?;
        Box::new(BufReader::new(file))
    };

    let mut builder = reporter_opts.to_builder(config);
    builder.set_colorize(
        output
            .color
            .should_colorize(supports_color::Stream::Stdout),
    );
    let mut aggregator = builder.build(output_writer.reporter_output())?;
    debug!("writing run log to {}", aggregator.log_file_path());

    let code = replay_events(events, reader, &mut aggregator)?;

    if output.verbose {
        let summary = aggregator.summary();
        info!(
            "replayed {} suites: {} tests passed, {} failed, {} skipped (log: {})",
            summary.num_suites,
            summary.num_tests_ok,
            summary.num_tests_failed,
            summary.num_tests_skipped,
            aggregator.log_file_path(),
        );
    }

    Ok(code)
}

/// Feeds every event in `reader` to the aggregator and returns the exit code for the run.
fn replay_events(
    events: &Utf8Path,
    reader: impl BufRead,
    aggregator: &mut RunAggregator<'_>,
) -> Result<i32> {
    for event in read_events(reader) {
        let event = event.map_err(|error| match error {
            ReadEventError::Io(err) => ExpectedError::EventReadError {
                path: events.to_owned(),
                err,
            },
            ReadEventError::Parse(err) => ExpectedError::EventParseError {
                path: events.to_owned(),
                err,
            },
        })?;

        // A host keeps going when a callback fails, and so do we.
        if let Err(error) = aggregator.report_event(&event) {
            warn!("{}", DisplayErrorChain::new(error));
        }
    }

    Ok(if aggregator.summary().has_failures() {
        ReporterExitCode::TEST_RUN_FAILED
    } else {
        ReporterExitCode::OK
    })
}
