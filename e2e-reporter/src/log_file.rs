// Copyright (c) The e2e-reporter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-run log files.
//!
//! Several worker processes may report at the same time, and each one writes its own log file.
//! Rather than coordinating appends across processes, every [`LogFile`] gets a path that's unique
//! to it: the file name combines the creation time in epoch milliseconds with a 15-digit random
//! suffix.

use crate::errors::{LogDirCreateError, WriteEventError};
use camino::{Utf8Path, Utf8PathBuf};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::{
    fs::{self, DirBuilder, File, OpenOptions},
    io::{BufWriter, Write},
};
use tracing::debug;

/// How records are written to a [`LogFile`].
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum LogMode {
    /// Keep one handle open for the lifetime of the run, appending and flushing each record.
    #[default]
    Append,

    /// Replace the contents of the file on every write. Only the last record survives.
    Overwrite,
}

impl LogMode {
    /// Returns the config-file name of this mode.
    pub fn to_static_str(self) -> &'static str {
        match self {
            LogMode::Append => "append",
            LogMode::Overwrite => "overwrite",
        }
    }
}

/// The number of random digits at the end of each log file name.
const RANDOM_DIGITS: usize = 15;
const RANDOM_MODULUS: u64 = 10u64.pow(RANDOM_DIGITS as u32);

/// A log file, unique to one reporter instance.
#[derive(Debug)]
pub struct LogFile {
    path: Utf8PathBuf,
    mode: LogMode,
    // Only used in append mode. Opened on the first write.
    handle: Option<BufWriter<File>>,
}

impl LogFile {
    /// Creates `dir` if necessary and picks a unique file name inside it.
    ///
    /// The file itself isn't created until the first record is written.
    pub fn create(dir: &Utf8Path, prefix: &str, mode: LogMode) -> Result<Self, LogDirCreateError> {
        create_log_dir(dir)?;
        let path = generate_path(dir, prefix);
        debug!("log file for this run ({} mode): {path}", mode.to_static_str());
        Ok(Self {
            path,
            mode,
            handle: None,
        })
    }

    /// Returns the path to the log file.
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Writes a record to the log file, according to the [`LogMode`].
    pub fn write_record(&mut self, text: &str) -> Result<(), WriteEventError> {
        match self.mode {
            LogMode::Overwrite => fs::write(&self.path, text).map_err(|error| self.fs_error(error)),
            LogMode::Append => {
                let handle = match self.handle.take() {
                    Some(handle) => handle,
                    None => {
                        let file = OpenOptions::new()
                            .create(true)
                            .append(true)
                            .open(&self.path)
                            .map_err(|error| self.fs_error(error))?;
                        debug!("opened log file {} for appending", self.path);
                        BufWriter::new(file)
                    }
                };
                let handle = self.handle.insert(handle);
                // Flush every record: if the process is killed because a test hung, whatever was
                // written before must already be on disk.
                let res = handle
                    .write_all(text.as_bytes())
                    .and_then(|()| handle.flush());
                res.map_err(|error| self.fs_error(error))
            }
        }
    }

    /// Flushes and closes the append handle, if one is open.
    ///
    /// A later write reopens the file in append mode.
    pub fn close(&mut self) -> Result<(), WriteEventError> {
        if let Some(mut handle) = self.handle.take() {
            debug!("closing log file {}", self.path);
            handle.flush().map_err(|error| self.fs_error(error))?;
        }
        Ok(())
    }

    fn fs_error(&self, error: std::io::Error) -> WriteEventError {
        WriteEventError::Fs {
            file: self.path.clone(),
            error,
        }
    }
}

/// Returns a path of the form `<dir>/<prefix>-<epoch-ms>-<15 random digits>.txt`.
pub fn generate_path(dir: &Utf8Path, prefix: &str) -> Utf8PathBuf {
    let now_ms = Utc::now().timestamp_millis();
    let random = rand::random::<u64>() % RANDOM_MODULUS;
    dir.join(format!(
        "{prefix}-{now_ms}-{random:0width$}.txt",
        width = RANDOM_DIGITS
    ))
}

fn create_log_dir(dir: &Utf8Path) -> Result<(), LogDirCreateError> {
    let mut builder = DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        // Several users may share a CI machine's log directory.
        builder.mode(0o777);
    }
    builder
        .create(dir)
        .map_err(|error| LogDirCreateError::new(dir, error))
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino_tempfile::Utf8TempDir;
    use std::collections::HashSet;

    #[test]
    fn generated_paths_are_unique() {
        let dir = Utf8Path::new("target/e2e-test-logs");
        let paths: HashSet<_> = (0..10_000).map(|_| generate_path(dir, "e2e-log")).collect();
        assert_eq!(paths.len(), 10_000);
    }

    #[test]
    fn generated_path_shape() {
        let path = generate_path(Utf8Path::new("logs"), "e2e-log");
        assert_eq!(path.parent(), Some(Utf8Path::new("logs")));

        let file_name = path.file_name().expect("path has a file name");
        let stem = file_name
            .strip_prefix("e2e-log-")
            .and_then(|rest| rest.strip_suffix(".txt"))
            .expect("prefix and extension");
        let (millis, random) = stem.split_once('-').expect("two components");
        assert!(millis.parse::<i64>().is_ok(), "millis: {millis}");
        assert_eq!(random.len(), RANDOM_DIGITS, "random: {random}");
        assert!(random.chars().all(|c| c.is_ascii_digit()), "random: {random}");
    }

    #[test]
    fn creates_nested_log_dir() {
        let temp = Utf8TempDir::new().unwrap();
        let dir = temp.path().join("a/b/c");
        let log_file = LogFile::create(&dir, "e2e-log", LogMode::Append).unwrap();
        assert!(dir.is_dir());
        assert_eq!(log_file.path().parent(), Some(dir.as_path()));
        // Nothing is written until the first record.
        assert!(!log_file.path().exists());
    }

    #[test]
    fn log_dir_create_failure() {
        let temp = Utf8TempDir::new().unwrap();
        let blocker = temp.path().join("not-a-dir");
        fs::write(&blocker, "").unwrap();

        let error = LogFile::create(&blocker.join("logs"), "e2e-log", LogMode::Append)
            .expect_err("a file is in the way");
        assert_eq!(error.dir(), &blocker.join("logs"));
    }

    #[test]
    fn append_mode_keeps_every_record() {
        let temp = Utf8TempDir::new().unwrap();
        let mut log_file = LogFile::create(temp.path(), "e2e-log", LogMode::Append).unwrap();
        log_file.write_record("first\n").unwrap();
        log_file.write_record("second\n").unwrap();
        assert_eq!(fs::read_to_string(log_file.path()).unwrap(), "first\nsecond\n");

        log_file.close().unwrap();
        log_file.write_record("third\n").unwrap();
        assert_eq!(
            fs::read_to_string(log_file.path()).unwrap(),
            "first\nsecond\nthird\n"
        );
    }

    #[test]
    fn overwrite_mode_keeps_last_record() {
        let temp = Utf8TempDir::new().unwrap();
        let mut log_file = LogFile::create(temp.path(), "e2e-log", LogMode::Overwrite).unwrap();
        log_file.write_record("first\n").unwrap();
        log_file.write_record("second\n").unwrap();
        assert_eq!(fs::read_to_string(log_file.path()).unwrap(), "second\n");
    }
}
