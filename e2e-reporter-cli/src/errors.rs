// Copyright (c) The e2e-reporter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::output::NO_HEADING_TARGET;
use camino::Utf8PathBuf;
use e2e_reporter::{
    errors::{ConfigParseError, EventParseError, LogDirCreateError},
    exit_codes::ReporterExitCode,
};
use std::error::Error;
use thiserror::Error;
use tracing::error;

pub(crate) type Result<T, E = ExpectedError> = std::result::Result<T, E>;

// The #[error()] strings are placeholders: errors are meant to be printed with
// display_to_stderr, which also prints the chain of causes.

/// An expected error, reported to the user with a documented exit code.
#[derive(Debug, Error)]
#[doc(hidden)]
pub enum ExpectedError {
    #[error("config parse error")]
    ConfigParseError {
        #[from]
        err: Box<ConfigParseError>,
    },
    #[error("failed to render config")]
    ConfigRenderError {
        #[source]
        err: Box<toml::ser::Error>,
    },
    #[error("failed to create log directory")]
    LogDirCreateError {
        #[from]
        err: LogDirCreateError,
    },
    #[error("failed to open event file")]
    EventFileOpenError {
        path: Utf8PathBuf,
        #[source]
        err: std::io::Error,
    },
    #[error("failed to read events")]
    EventReadError {
        path: Utf8PathBuf,
        #[source]
        err: std::io::Error,
    },
    #[error("failed to parse event")]
    EventParseError {
        path: Utf8PathBuf,
        #[source]
        err: EventParseError,
    },
    #[error("failed to write output")]
    WriteError {
        #[source]
        err: std::io::Error,
    },
}

impl ExpectedError {
    /// Returns the exit code for the process.
    pub fn process_exit_code(&self) -> i32 {
        match self {
            Self::ConfigParseError { .. }
            | Self::ConfigRenderError { .. }
            | Self::LogDirCreateError { .. }
            | Self::EventFileOpenError { .. }
            | Self::EventReadError { .. } => ReporterExitCode::SETUP_ERROR,
            Self::EventParseError { .. } => ReporterExitCode::INVALID_EVENT_STREAM,
            Self::WriteError { .. } => 1,
        }
    }

    /// Displays this error to stderr, through the installed logger.
    pub fn display_to_stderr(&self) {
        let mut next_error = match self {
            Self::ConfigParseError { err } => {
                // The config error already names the file.
                error!("{err}");
                err.source()
            }
            Self::ConfigRenderError { err } => {
                error!("failed to render config as TOML");
                Some(&**err as &dyn Error)
            }
            Self::LogDirCreateError { err } => {
                error!("{err}");
                err.source()
            }
            Self::EventFileOpenError { path, err } => {
                error!("failed to open event file `{path}`");
                Some(err as &dyn Error)
            }
            Self::EventReadError { path, err } => {
                error!("failed to read events from `{path}`");
                Some(err as &dyn Error)
            }
            Self::EventParseError { path, err } => {
                error!("in `{path}`: {err}");
                err.source()
            }
            Self::WriteError { err } => {
                error!("failed to write to standard output");
                Some(err as &dyn Error)
            }
        };

        while let Some(err) = next_error {
            error!(target: NO_HEADING_TARGET, "\nCaused by:\n  {err}");
            next_error = err.source();
        }
    }
}
