//! # Profiler Configuration
//!
//! Loads the settings a [`Registry`](crate::core::registry::Registry) is built from:
//! whether each measurement is echoed to the log, and where log lines go.
//! Values come from an optional TOML file, then the `PERFMETER_VERBOSE`
//! environment variable is applied on top.

use crate::{
    VerboseFlag,
    constants::{DEFAULT_LOG_TARGET, VERBOSE_ENV_VAR},
};
use serde::Deserialize;
use std::{
    fs,
    path::Path,
    str::FromStr,
    sync::{Arc, atomic::AtomicBool},
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not read config file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config file: {0}")]
    TomlParse(#[from] toml::de::Error),
    #[error("Environment variable {var} has invalid value '{value}' (expected 1/0, true/false, yes/no, on/off)")]
    InvalidEnvValue { var: String, value: String },
    #[error("Unknown log level '{0}' (expected error, warn, info, debug or trace)")]
    UnknownLogLevel(String),
}

/// Level the log-crate sink writes at.
///
/// Parsed the same way from TOML and from plain strings: case-insensitive,
/// surrounding whitespace ignored, `warning` accepted as `warn`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    #[default]
    Debug,
    Trace,
}

impl FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "error" => Ok(Self::Error),
            "warn" | "warning" => Ok(Self::Warn),
            "info" => Ok(Self::Info),
            "debug" => Ok(Self::Debug),
            "trace" => Ok(Self::Trace),
            _ => Err(ConfigError::UnknownLogLevel(s.to_string())),
        }
    }
}

impl From<LogLevel> for log::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => Self::Error,
            LogLevel::Warn => Self::Warn,
            LogLevel::Info => Self::Info,
            LogLevel::Debug => Self::Debug,
            LogLevel::Trace => Self::Trace,
        }
    }
}

/// Settings for building a registry. Every key is optional in the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfilerConfig {
    /// Echo every recorded sample as a `"<name> took <n>ms"` line.
    pub verbose: bool,
    /// `log` target used for every emitted line.
    pub log_target: String,
    /// Level used for every emitted line.
    pub log_level: LogLevel,
}

impl Default for ProfilerConfig {
    fn default() -> Self {
        Self {
            verbose: false,
            log_target: DEFAULT_LOG_TARGET.to_string(),
            log_level: LogLevel::default(),
        }
    }
}

/// The file as written. `log_level` stays textual so it goes through
/// `LogLevel::from_str` and reports `UnknownLogLevel` on its own.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct TomlProfilerConfig {
    verbose: Option<bool>,
    log_target: Option<String>,
    log_level: Option<String>,
}

impl TomlProfilerConfig {
    fn into_config(self) -> Result<ProfilerConfig, ConfigError> {
        let defaults = ProfilerConfig::default();
        Ok(ProfilerConfig {
            verbose: self.verbose.unwrap_or(defaults.verbose),
            log_target: self.log_target.unwrap_or(defaults.log_target),
            log_level: match self.log_level {
                Some(level) => level.parse()?,
                None => defaults.log_level,
            },
        })
    }
}

impl ProfilerConfig {
    /// Parses a configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let raw: TomlProfilerConfig = toml::from_str(content)?;
        raw.into_config()
    }

    /// Reads and parses a configuration file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        log::debug!("Loading profiler config from '{}'", path.display());
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_toml_str(&content)
    }

    /// Defaults with the environment override applied.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.apply_env()?;
        Ok(config)
    }

    /// Overrides `verbose` from `PERFMETER_VERBOSE` when it is set.
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        if let Ok(value) = std::env::var(VERBOSE_ENV_VAR) {
            self.apply_verbose_override(&value)?;
        }
        Ok(())
    }

    /// Overrides `verbose` from a textual boolean.
    pub fn apply_verbose_override(&mut self, value: &str) -> Result<(), ConfigError> {
        self.verbose = parse_bool(value).ok_or_else(|| ConfigError::InvalidEnvValue {
            var: VERBOSE_ENV_VAR.to_string(),
            value: value.to_string(),
        })?;
        Ok(())
    }

    /// A fresh shared flag initialised from `verbose`.
    pub fn verbose_flag(&self) -> VerboseFlag {
        Arc::new(AtomicBool::new(self.verbose))
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::atomic::Ordering;
    use tempfile::NamedTempFile;

    #[test]
    fn test_empty_file_yields_defaults() {
        let config = ProfilerConfig::from_toml_str("").unwrap();
        assert_eq!(config, ProfilerConfig::default());
        assert!(!config.verbose);
        assert_eq!(config.log_target, "perfmeter");
        assert_eq!(config.log_level, LogLevel::Debug);
    }

    #[test]
    fn test_full_file_is_parsed() {
        let config = ProfilerConfig::from_toml_str(
            r#"
            verbose = true
            log_target = "game::perf"
            log_level = "info"
            "#,
        )
        .unwrap();

        assert!(config.verbose);
        assert_eq!(config.log_target, "game::perf");
        assert_eq!(config.log_level, LogLevel::Info);
        assert!(config.verbose_flag().load(Ordering::Relaxed));
    }

    #[test]
    fn test_unknown_keys_and_levels_are_rejected() {
        assert!(matches!(
            ProfilerConfig::from_toml_str("verbos = true"),
            Err(ConfigError::TomlParse(_))
        ));
        assert!(matches!(
            ProfilerConfig::from_toml_str("log_level = \"loud\""),
            Err(ConfigError::UnknownLogLevel(level)) if level == "loud"
        ));
    }

    #[test]
    fn test_log_level_in_file_accepts_the_same_spellings_as_from_str() {
        for (raw, expected) in [
            ("WARNING", LogLevel::Warn),
            ("warning", LogLevel::Warn),
            ("DEBUG", LogLevel::Debug),
            (" Info ", LogLevel::Info),
        ] {
            let config =
                ProfilerConfig::from_toml_str(&format!("log_level = \"{}\"", raw)).unwrap();
            assert_eq!(config.log_level, expected, "for {raw:?}");
        }
    }

    #[test]
    fn test_unknown_log_level_in_file_names_the_level() {
        let err = ProfilerConfig::from_toml_str("log_level = \"chatty\"").unwrap_err();
        assert!(matches!(err, ConfigError::UnknownLogLevel(_)));
        assert!(err.to_string().contains("Unknown log level 'chatty'"), "got: {err}");
    }

    #[test]
    fn test_load_from_file() {
        // --- Setup ---
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"verbose = true\n").unwrap();
        file.flush().unwrap();

        // --- Execute ---
        let config = ProfilerConfig::load(file.path()).unwrap();

        // --- Assert ---
        assert!(config.verbose);
    }

    #[test]
    fn test_load_missing_file_reports_path() {
        let err = ProfilerConfig::load(Path::new("definitely_missing_perfmeter.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("definitely_missing_perfmeter.toml"));
    }

    #[test]
    fn test_verbose_override_values() {
        let mut config = ProfilerConfig::default();

        config.apply_verbose_override("YES").unwrap();
        assert!(config.verbose);
        config.apply_verbose_override(" off ").unwrap();
        assert!(!config.verbose);
        config.apply_verbose_override("1").unwrap();
        assert!(config.verbose);

        let err = config.apply_verbose_override("maybe").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvValue { .. }));
        // A rejected value leaves the previous setting in place.
        assert!(config.verbose);
    }

    #[test]
    fn test_log_level_from_str() {
        assert_eq!("WARNING".parse::<LogLevel>().unwrap(), LogLevel::Warn);
        assert_eq!("trace".parse::<LogLevel>().unwrap(), LogLevel::Trace);
        assert!(matches!(
            "chatty".parse::<LogLevel>(),
            Err(ConfigError::UnknownLogLevel(_))
        ));
        assert_eq!(log::Level::from(LogLevel::Error), log::Level::Error);
    }
}
