/*!
 * Export sinks and the export orchestrator.
 *
 * A sink receives named sections (one per table), each with a header row
 * and data rows. The format is chosen once, when the sink is opened, and the
 * orchestrator only talks to the `ExportSink` trait.
 */

pub mod orchestrator;
pub mod spreadsheet;
pub mod text;

use clap::ValueEnum;
use std::fmt;
use std::path::Path;

use crate::database::Value;
use crate::errors::ExportError;
use crate::reformat::Presentation;

pub use orchestrator::{ExportSummary, Exporter};
pub use spreadsheet::ExcelSink;
pub use text::{CsvSink, SECTION_MARKER, SECTION_MARKER_COUNT};

/// Destination format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Comma separated text, sections one after another
    #[value(alias = "text")]
    Csv,
    /// Excel workbook, one sheet per section
    #[value(alias = "spreadsheet")]
    Excel,
}

impl OutputFormat {
    /// Canonical filename suffix
    pub fn suffix(self) -> &'static str {
        match self {
            Self::Csv => ".csv",
            Self::Excel => ".xlsx",
        }
    }

    /// Whether cells should be kept as native spreadsheet values
    pub fn is_spreadsheet(self) -> bool {
        matches!(self, Self::Excel)
    }

    /// Refuse an output path whose suffix does not match the format
    pub fn check_path(self, path: &Path) -> Result<(), ExportError> {
        let suffix = self.suffix();
        let matches = path
            .file_name()
            .map(|name| name.to_string_lossy().to_lowercase())
            .is_some_and(|name| name.len() > suffix.len() && name.ends_with(suffix));

        if matches {
            Ok(())
        } else {
            Err(ExportError::FormatMismatch {
                path: path.to_path_buf(),
                suffix,
            })
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Csv => f.write_str("csv"),
            Self::Excel => f.write_str("excel"),
        }
    }
}

/// Destination of an export run
///
/// Calls must follow `open_section`, `write_header`, `write_row`*,
/// `apply_column_styling`, repeated per table, then a single `close`.
pub trait ExportSink {
    /// Whether the sink wants native date/time values
    fn is_spreadsheet(&self) -> bool;

    /// Start a new section titled `title`
    fn open_section(&mut self, title: &str) -> Result<(), ExportError>;

    /// Write the header row of the current section
    fn write_header(&mut self, columns: &[String]) -> Result<(), ExportError>;

    /// Write one data row of the current section
    fn write_row(&mut self, row: &[Value]) -> Result<(), ExportError>;

    /// Apply per-column presentation hints to the current section
    fn apply_column_styling(&mut self, hints: &[Option<Presentation>]) -> Result<(), ExportError>;

    /// Flush and release the destination; calling it again is a no-op
    fn close(&mut self) -> Result<(), ExportError>;
}

/// Open the sink for a format, after checking the output suffix
pub fn open_sink(format: OutputFormat, path: &Path) -> Result<Box<dyn ExportSink>, ExportError> {
    format.check_path(path)?;

    let sink: Box<dyn ExportSink> = match format {
        OutputFormat::Csv => Box::new(CsvSink::create(path)?),
        OutputFormat::Excel => Box::new(ExcelSink::create(path)),
    };
    Ok(sink)
}
