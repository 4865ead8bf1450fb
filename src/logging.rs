/*!
 * Console and log-file logging.
 *
 * A single `log::Log` implementation writes coloured lines to stderr and
 * plain lines to an append-mode log file. Each target has its own level,
 * picked from a repeat count on the command line.
 */

use chrono::Local;
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use parking_lot::Mutex;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Default log file name, relative to the working directory
pub const DEFAULT_LOGFILE: &str = "glucolog.log";

/// Map a `-v`/`-d` repeat count to a level: 0 warn, 1 info, 2+ debug
pub fn level_for_count(count: u8) -> LevelFilter {
    match count {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    }
}

/// Levels and destination for the two log targets
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    /// Level written to stderr
    pub console: LevelFilter,
    /// Level written to the log file
    pub file: LevelFilter,
    /// Log file; `None` disables file logging
    pub logfile: Option<PathBuf>,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            console: LevelFilter::Warn,
            file: LevelFilter::Warn,
            logfile: Some(PathBuf::from(DEFAULT_LOGFILE)),
        }
    }
}

impl LogSettings {
    /// The most verbose of the two levels, used as the global maximum
    pub fn max_level(&self) -> LevelFilter {
        if self.logfile.is_some() {
            self.console.max(self.file)
        } else {
            self.console
        }
    }
}

/// Logger writing to stderr and, optionally, a log file
pub struct DualLogger {
    console: LevelFilter,
    file_level: LevelFilter,
    file: Option<Mutex<File>>,
}

impl DualLogger {
    /// Build the logger, opening the log file in append mode
    pub fn new(settings: &LogSettings) -> io::Result<Self> {
        let file = match &settings.logfile {
            Some(path) => Some(Mutex::new(open_logfile(path)?)),
            None => None,
        };
        Ok(Self {
            console: settings.console,
            file_level: settings.file,
            file,
        })
    }

    /// Install as the global logger. Only the first call in a process succeeds.
    pub fn init(settings: &LogSettings) -> Result<(), InitError> {
        let logger = Self::new(settings).map_err(InitError::Logfile)?;
        log::set_boxed_logger(Box::new(logger)).map_err(InitError::AlreadySet)?;
        log::set_max_level(settings.max_level());
        Ok(())
    }

    fn colour_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

fn open_logfile(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

/// Why the global logger could not be installed
#[derive(Debug, thiserror::Error)]
pub enum InitError {
    /// The log file could not be opened
    #[error("Cannot open log file: {0}")]
    Logfile(#[source] io::Error),
    /// Another logger is already installed
    #[error("Logger already initialised: {0}")]
    AlreadySet(#[source] SetLoggerError),
}

impl Log for DualLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.console || (self.file.is_some() && metadata.level() <= self.file_level)
    }

    fn log(&self, record: &Record) {
        let level = record.level();

        if level <= self.console {
            let now = Local::now().format("%H:%M:%S%.3f");
            let _ = writeln!(
                io::stderr(),
                "{}{} {:<5} {}\x1B[0m",
                Self::colour_for_level(level),
                now,
                level,
                record.args()
            );
        }

        if let Some(file) = &self.file {
            if level <= self.file_level {
                let now = Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
                let mut file = file.lock();
                let _ = writeln!(file, "{} {:<5} {} {}", now, level, record.target(), record.args());
            }
        }
    }

    fn flush(&self) {
        let _ = io::stderr().flush();
        if let Some(file) = &self.file {
            let _ = file.lock().flush();
        }
    }
}
