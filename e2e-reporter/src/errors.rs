// Copyright (c) The e2e-reporter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Errors produced by the reporter.

use camino::Utf8PathBuf;
use config::ConfigError;
use std::{error::Error, fmt};
use thiserror::Error;

/// An error that occurred while creating the directory that holds per-run log files.
///
/// This is a setup failure: the reporter can't be constructed without a log directory.
#[derive(Debug, Error)]
#[error("failed to create log directory `{dir}`")]
pub struct LogDirCreateError {
    dir: Utf8PathBuf,
    #[source]
    error: std::io::Error,
}

impl LogDirCreateError {
    pub(crate) fn new(dir: impl Into<Utf8PathBuf>, error: std::io::Error) -> Self {
        Self {
            dir: dir.into(),
            error,
        }
    }

    /// Returns the directory that couldn't be created.
    pub fn dir(&self) -> &Utf8PathBuf {
        &self.dir
    }
}

/// An error that occurs while writing an event.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum WriteEventError {
    /// An error occurred while writing the event to the console.
    #[error("error writing to output")]
    Io(#[source] std::io::Error),

    /// An error occurred while operating on the log file.
    #[error("error operating on path {file}")]
    Fs {
        /// The file being operated on.
        file: Utf8PathBuf,

        /// The underlying IO error.
        #[source]
        error: std::io::Error,
    },
}

/// An error that occurred while parsing the reporter config.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigParseError {
    /// The config sources couldn't be read or merged.
    #[error("failed to read reporter config{}", DisplayConfigFile(.config_file.as_ref()))]
    Build {
        /// The user config file, if any.
        config_file: Option<Utf8PathBuf>,

        /// The underlying error.
        #[source]
        error: ConfigError,
    },

    /// The merged config couldn't be deserialized.
    #[error("failed to parse reporter config{}", DisplayConfigFile(.config_file.as_ref()))]
    Deserialize {
        /// The user config file, if any.
        config_file: Option<Utf8PathBuf>,

        /// The underlying error.
        #[source]
        error: ConfigError,
    },
}

struct DisplayConfigFile<'a>(Option<&'a Utf8PathBuf>);

impl fmt::Display for DisplayConfigFile<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(file) => write!(f, " at `{file}`"),
            None => Ok(()),
        }
    }
}

/// An error that occurred while parsing a line of a host event stream.
#[derive(Debug, Error)]
#[error("failed to parse host event on line {line_number}")]
pub struct EventParseError {
    line_number: usize,
    #[source]
    error: serde_json::Error,
}

impl EventParseError {
    pub(crate) fn new(line_number: usize, error: serde_json::Error) -> Self {
        Self { line_number, error }
    }

    /// The 1-based line number of the event that failed to parse.
    pub fn line_number(&self) -> usize {
        self.line_number
    }
}

/// Displays an error along with its chain of sources, one per line.
pub struct DisplayErrorChain<E> {
    error: E,
}

impl<E: Error> DisplayErrorChain<E> {
    /// Creates a new `DisplayErrorChain`.
    pub fn new(error: E) -> Self {
        Self { error }
    }
}

impl<E: Error> fmt::Display for DisplayErrorChain<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        let mut source = self.error.source();
        while let Some(error) = source {
            write!(f, "\n  caused by: {error}")?;
            source = error.source();
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn error_chain_lists_sources() {
        let error = WriteEventError::Fs {
            file: "target/e2e-test-logs/e2e-log.txt".into(),
            error: io::Error::new(io::ErrorKind::PermissionDenied, "permission denied"),
        };
        assert_eq!(
            DisplayErrorChain::new(&error).to_string(),
            "error operating on path target/e2e-test-logs/e2e-log.txt\n  \
             caused by: permission denied",
        );
    }

    #[test]
    fn config_error_mentions_file() {
        let error = ConfigParseError::Build {
            config_file: Some("reporter.toml".into()),
            error: ConfigError::Message("bad".to_owned()),
        };
        assert_eq!(error.to_string(), "failed to read reporter config at `reporter.toml`");

        let error = ConfigParseError::Deserialize {
            config_file: None,
            error: ConfigError::Message("bad".to_owned()),
        };
        assert_eq!(error.to_string(), "failed to parse reporter config");
    }
}
