/*!
 * Delimited text sink.
 *
 * Sections are written one after another into a single CSV stream. Every
 * section after the first is preceded by a separator row, then a one-cell
 * title row, then the header and data rows. Presentation hints are ignored.
 */

use log::debug;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use super::ExportSink;
use crate::database::Value;
use crate::errors::ExportError;
use crate::reformat::Presentation;

/// Marker repeated to build the separator row between sections
pub const SECTION_MARKER: &str = "=====";

/// Number of marker fields in the separator row
pub const SECTION_MARKER_COUNT: usize = 5;

/// CSV destination
pub struct CsvSink<W: Write> {
    writer: Option<csv::Writer<W>>,
    first_section_written: bool,
    section_open: bool,
    header_written: bool,
}

impl CsvSink<File> {
    /// Create (or truncate) the output file
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self, ExportError> {
        debug!("Creating CSV output {:?}", path.as_ref());
        let file = File::create(path)?;
        Ok(Self::from_writer(file))
    }
}

impl<W: Write> CsvSink<W> {
    /// Wrap any writer
    pub fn from_writer(inner: W) -> Self {
        let writer = csv::WriterBuilder::new()
            .flexible(true)
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(inner);

        Self {
            writer: Some(writer),
            first_section_written: false,
            section_open: false,
            header_written: false,
        }
    }

    fn writer(&mut self) -> Result<&mut csv::Writer<W>, ExportError> {
        self.writer.as_mut().ok_or(ExportError::SinkState("sink already closed"))
    }
}

impl<W: Write> ExportSink for CsvSink<W> {
    fn is_spreadsheet(&self) -> bool {
        false
    }

    fn open_section(&mut self, title: &str) -> Result<(), ExportError> {
        let separator = self.first_section_written;
        let writer = self.writer()?;

        if separator {
            writer.write_record([SECTION_MARKER; SECTION_MARKER_COUNT])?;
        }
        writer.write_record([title])?;

        self.first_section_written = true;
        self.section_open = true;
        self.header_written = false;
        Ok(())
    }

    fn write_header(&mut self, columns: &[String]) -> Result<(), ExportError> {
        if !self.section_open {
            return Err(ExportError::SinkState("header written outside a section"));
        }
        self.writer()?.write_record(columns)?;
        self.header_written = true;
        Ok(())
    }

    fn write_row(&mut self, row: &[Value]) -> Result<(), ExportError> {
        if !self.header_written {
            return Err(ExportError::SinkState("row written before the header"));
        }
        self.writer()?.write_record(row.iter().map(Value::to_string))?;
        Ok(())
    }

    fn apply_column_styling(&mut self, _hints: &[Option<Presentation>]) -> Result<(), ExportError> {
        Ok(())
    }

    fn close(&mut self) -> Result<(), ExportError> {
        self.section_open = false;
        self.header_written = false;

        if let Some(mut writer) = self.writer.take() {
            writer.flush()?;
            debug!("CSV output closed");
        }
        Ok(())
    }
}
