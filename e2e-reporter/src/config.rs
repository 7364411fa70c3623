// Copyright (c) The e2e-reporter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reporter configuration.
//!
//! Configuration is layered: the embedded `default-config.toml` is read first, then an optional
//! user config file. Command-line overrides are applied by the caller on the resolved
//! [`ReporterConfig`].

use crate::{errors::ConfigParseError, log_file::LogMode};
use camino::{Utf8Path, Utf8PathBuf};
use config::{Config, ConfigBuilder, File, FileFormat, builder::DefaultState};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::warn;

/// Resolved reporter configuration.
#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ReporterConfig {
    /// The directory in which per-run log files are created.
    pub log_dir: Utf8PathBuf,

    /// The prefix for log file names.
    pub log_file_prefix: String,

    /// How records are written to the log file.
    pub log_mode: LogMode,

    /// The prefix for the run label published at runner start.
    pub label_prefix: String,

    /// Whether to render summaries when the runner ends.
    pub summary_on_run_end: bool,
}

#[derive(Debug, Deserialize, Serialize)]
struct DeserializedConfig {
    reporter: ReporterConfig,
}

impl ReporterConfig {
    /// The default configuration, embedded in the binary.
    pub const DEFAULT_CONFIG: &'static str = include_str!("../default-config.toml");

    /// Reads the configuration from the embedded defaults plus an optional user config file.
    ///
    /// Unknown keys in the user config file are logged as warnings.
    pub fn from_sources(config_file: Option<&Utf8Path>) -> Result<Self, ConfigParseError> {
        Self::from_sources_impl(config_file, &mut DefaultConfigWarnings)
    }

    /// Returns the embedded default configuration.
    pub fn default_config() -> Self {
        let config = Self::make_default_config()
            .build()
            .expect("default config is always valid");
        let deserialized: DeserializedConfig = config
            .try_deserialize()
            .expect("default config is always valid");
        deserialized.reporter
    }

    /// Renders this configuration as TOML, in the same shape as the config file.
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(&DeserializedConfig {
            reporter: self.clone(),
        })
    }

    fn from_sources_impl(
        config_file: Option<&Utf8Path>,
        warnings: &mut impl ConfigWarnings,
    ) -> Result<Self, ConfigParseError> {
        let mut builder = Self::make_default_config();
        if let Some(config_file) = config_file {
            builder = builder.add_source(File::new(config_file.as_str(), FileFormat::Toml));
        }

        let config = builder.build().map_err(|error| ConfigParseError::Build {
            config_file: config_file.map(ToOwned::to_owned),
            error,
        })?;

        let mut unknown = BTreeSet::new();
        let deserialized: DeserializedConfig =
            serde_ignored::deserialize(config, |path: serde_ignored::Path| {
                unknown.insert(path.to_string());
            })
            .map_err(|error| ConfigParseError::Deserialize {
                config_file: config_file.map(ToOwned::to_owned),
                error,
            })?;

        if let Some(config_file) = config_file
            && !unknown.is_empty()
        {
            warnings.unknown_config_keys(config_file, &unknown);
        }

        Ok(deserialized.reporter)
    }

    fn make_default_config() -> ConfigBuilder<DefaultState> {
        Config::builder().add_source(File::from_str(Self::DEFAULT_CONFIG, FileFormat::Toml))
    }
}

/// Trait for handling config warnings.
///
/// Warnings are logged by default, and collected in tests.
trait ConfigWarnings {
    fn unknown_config_keys(&mut self, config_file: &Utf8Path, unknown: &BTreeSet<String>);
}

struct DefaultConfigWarnings;

impl ConfigWarnings for DefaultConfigWarnings {
    fn unknown_config_keys(&mut self, config_file: &Utf8Path, unknown: &BTreeSet<String>) {
        let mut unknown_str = String::new();
        if unknown.len() == 1 {
            // Print this on the same line.
            unknown_str.push_str("key: ");
            unknown_str.push_str(unknown.iter().next().expect("one element"));
        } else {
            unknown_str.push_str("keys:\n");
            for ignored_key in unknown {
                unknown_str.push_str("\n  - ");
                unknown_str.push_str(ignored_key);
            }
        }

        warn!("in config file {config_file}, ignoring unknown configuration {unknown_str}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino_tempfile::Utf8TempDir;
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    #[derive(Default)]
    struct TestConfigWarnings {
        unknown: Vec<(Utf8PathBuf, BTreeSet<String>)>,
    }

    impl ConfigWarnings for TestConfigWarnings {
        fn unknown_config_keys(&mut self, config_file: &Utf8Path, unknown: &BTreeSet<String>) {
            self.unknown
                .push((config_file.to_owned(), unknown.clone()));
        }
    }

    #[test]
    fn default_config_values() {
        let config = ReporterConfig::default_config();
        assert_eq!(
            config,
            ReporterConfig {
                log_dir: "target/e2e-test-logs".into(),
                log_file_prefix: "e2e-log".to_owned(),
                log_mode: LogMode::Append,
                label_prefix: "e2e-test".to_owned(),
                summary_on_run_end: true,
            }
        );

        let mut warnings = TestConfigWarnings::default();
        let from_sources = ReporterConfig::from_sources_impl(None, &mut warnings)
            .expect("default config is valid");
        assert_eq!(from_sources, config);
        assert!(warnings.unknown.is_empty());
    }

    #[test]
    fn user_config_overrides_defaults() {
        let dir = Utf8TempDir::new().unwrap();
        let config_file = dir.path().join("reporter.toml");
        std::fs::write(
            &config_file,
            indoc! {r#"
                [reporter]
                log-mode = "overwrite"
                log-file-prefix = "ci-log"
                bogus-key = 1
            "#},
        )
        .unwrap();

        let mut warnings = TestConfigWarnings::default();
        let config = ReporterConfig::from_sources_impl(Some(&config_file), &mut warnings)
            .expect("config is valid");
        assert_eq!(config.log_mode, LogMode::Overwrite);
        assert_eq!(config.log_file_prefix, "ci-log");
        assert_eq!(config.log_dir, "target/e2e-test-logs");

        assert_eq!(warnings.unknown.len(), 1);
        assert_eq!(warnings.unknown[0].0, config_file);
        assert_eq!(
            warnings.unknown[0].1,
            BTreeSet::from(["reporter.bogus-key".to_owned()])
        );
    }

    #[test]
    fn invalid_log_mode_is_an_error() {
        let dir = Utf8TempDir::new().unwrap();
        let config_file = dir.path().join("reporter.toml");
        std::fs::write(&config_file, "[reporter]\nlog-mode = \"truncate\"\n").unwrap();

        let error = ReporterConfig::from_sources(Some(&config_file))
            .expect_err("unknown log mode is rejected");
        assert!(
            matches!(error, ConfigParseError::Deserialize { .. }),
            "unexpected error: {error:?}"
        );
    }

    #[test]
    fn missing_config_file_is_an_error() {
        let dir = Utf8TempDir::new().unwrap();
        let config_file = dir.path().join("does-not-exist.toml");

        let error = ReporterConfig::from_sources(Some(&config_file))
            .expect_err("missing file is rejected");
        assert!(
            matches!(error, ConfigParseError::Build { .. }),
            "unexpected error: {error:?}"
        );
    }

    #[test]
    fn renders_as_toml() {
        let rendered = ReporterConfig::default_config()
            .to_toml_string()
            .expect("config serializes");
        assert!(rendered.starts_with("[reporter]\n"), "rendered: {rendered}");
        assert!(rendered.contains("log-mode = \"append\""), "rendered: {rendered}");
    }
}
