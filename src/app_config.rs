use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::language_utils::validate_language_code;
use crate::logging::{level_for_count, LogSettings, DEFAULT_LOGFILE};

/// Application configuration module
/// This module gathers the run settings taken from the command line and the
/// environment, validates them and derives the logging setup.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Console verbosity (`-v` count)
    #[serde(default)]
    pub verbose: u8,

    /// Log file verbosity (`-d` count)
    #[serde(default)]
    pub debug: u8,

    /// Log file path; `None` disables file logging
    #[serde(default = "default_logfile")]
    pub logfile: Option<PathBuf>,

    /// Display language code (ISO 639-1); `None` exports source names
    #[serde(default)]
    pub language: Option<String>,

    /// Directory holding the `<code>.json` language resources
    #[serde(default = "default_lang_dir")]
    pub lang_dir: PathBuf,
}

fn default_logfile() -> Option<PathBuf> {
    Some(PathBuf::from(DEFAULT_LOGFILE))
}

/// Language resources shipped with the crate
pub fn default_lang_dir() -> PathBuf {
    PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/languages"))
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if let Some(code) = &self.language {
            validate_language_code(code)?;

            if !self.lang_dir.is_dir() {
                return Err(anyhow!(
                    "Language directory '{}' does not exist",
                    self.lang_dir.display()
                ));
            }
        }

        if let Some(logfile) = &self.logfile {
            if logfile.as_os_str().is_empty() {
                return Err(anyhow!("Log file name must not be empty"));
            }
        }

        Ok(())
    }

    /// Logging setup derived from the verbosity counts
    pub fn log_settings(&self) -> LogSettings {
        LogSettings {
            console: level_for_count(self.verbose),
            file: level_for_count(self.debug),
            logfile: self.logfile.clone(),
        }
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            verbose: 0,
            debug: 0,
            logfile: default_logfile(),
            language: None,
            lang_dir: default_lang_dir(),
        }
    }
}
