//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

#![allow(clippy::derivable_impls)]

use std::time::Duration;

use serde::Deserialize;
use yangkit_netconf::ProviderConfig;

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub logging: Logging,
    pub session: Session,
    pub trace_options: TraceOptions,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Logging {
    pub file: LoggingFile,
    pub stdout: LoggingStdout,
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingFile {
    pub enabled: bool,
    pub dir: String,
    pub name: String,
    pub rotation: LoggingFileRotation,
    #[serde(flatten)]
    pub fmt: LoggingFmt,
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingStdout {
    pub enabled: bool,
    #[serde(flatten)]
    pub fmt: LoggingFmt,
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingFmt {
    pub style: LoggingFmtStyle,
    pub colors: bool,
    pub show_thread_id: bool,
    pub show_source: bool,
}

#[derive(Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LoggingFileRotation {
    #[default]
    Never,
    Hourly,
    Daily,
}

#[derive(Debug, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LoggingFmtStyle {
    Compact,
    Full,
    Json,
    Pretty,
}

// Session timeouts, in seconds.
#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Session {
    pub connect_timeout: u64,
    pub execute_timeout: u64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TraceOptions {
    pub session: bool,
    pub messages: bool,
    pub requests: bool,
}

#[derive(Debug)]
pub enum ConfigError {
    Read(String, std::io::Error),
    Parse(String, toml::de::Error),
}

// ===== impl Config =====

impl Config {
    // Loads the configuration file, or the built-in defaults when no file
    // is given.
    pub(crate) fn load(
        config_file: Option<&str>,
    ) -> Result<Config, ConfigError> {
        let Some(config_file) = config_file else {
            return Ok(Config::default());
        };

        let config_str = std::fs::read_to_string(config_file)
            .map_err(|error| ConfigError::Read(config_file.to_owned(), error))?;
        toml::from_str(&config_str)
            .map_err(|error| ConfigError::Parse(config_file.to_owned(), error))
    }

    // Session parameters, with every trace option enabled in verbose mode.
    pub(crate) fn provider_config(&self, verbose: bool) -> ProviderConfig {
        ProviderConfig {
            connect_timeout: Duration::from_secs(self.session.connect_timeout),
            execute_timeout: Duration::from_secs(self.session.execute_timeout),
            trace_opts: yangkit_netconf::TraceOptions {
                session: verbose || self.trace_options.session,
                messages: verbose || self.trace_options.messages,
            },
        }
    }

    pub(crate) fn crud_trace_opts(
        &self,
        verbose: bool,
    ) -> yangkit_crud::TraceOptions {
        yangkit_crud::TraceOptions {
            requests: verbose || self.trace_options.requests,
        }
    }
}

// ===== impl LoggingFile =====

impl Default for LoggingFile {
    fn default() -> LoggingFile {
        LoggingFile {
            enabled: false,
            dir: "/var/log".to_owned(),
            name: "bgp-delete.log".to_owned(),
            rotation: Default::default(),
            fmt: Default::default(),
        }
    }
}

// ===== impl LoggingStdout =====

impl Default for LoggingStdout {
    fn default() -> LoggingStdout {
        LoggingStdout {
            enabled: true,
            fmt: Default::default(),
        }
    }
}

// ===== impl LoggingFmt =====

impl Default for LoggingFmt {
    fn default() -> LoggingFmt {
        LoggingFmt {
            style: LoggingFmtStyle::Full,
            colors: false,
            show_thread_id: false,
            show_source: false,
        }
    }
}

// ===== impl Session =====

impl Default for Session {
    fn default() -> Session {
        Session {
            connect_timeout: 30,
            execute_timeout: 60,
        }
    }
}

// ===== impl ConfigError =====

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Read(path, error) => write!(
                f,
                "failed to load configuration file {}: {}",
                path, error
            ),
            ConfigError::Parse(path, error) => write!(
                f,
                "failed to parse configuration file {}: {}",
                path, error
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Read(_, error) => Some(error),
            ConfigError::Parse(_, error) => Some(error),
        }
    }
}

// ===== unit tests =====
