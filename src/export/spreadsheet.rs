/*!
 * Spreadsheet sink.
 *
 * Each section becomes a worksheet. Dates, times and durations are written
 * as Excel serial numbers with a number format, so they stay native values
 * in the workbook. The workbook is only persisted on `close`, and only
 * when at least one section was written.
 */

use chrono::{NaiveDate, NaiveTime, Timelike};
use log::debug;
use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};
use std::path::{Path, PathBuf};

use super::ExportSink;
use crate::database::Value;
use crate::errors::ExportError;
use crate::reformat::{CellStyle, Presentation};

/// Longest sheet name Excel accepts
const MAX_SHEET_NAME: usize = 31;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Number formats shared by every sheet
struct Formats {
    header: Format,
    date: Format,
    time: Format,
    duration: Format,
}

impl Formats {
    fn new() -> Self {
        Self {
            header: Format::new().set_bold(),
            date: Format::new().set_num_format("yyyy-mm-dd"),
            time: Format::new().set_num_format("hh:mm"),
            duration: Format::new().set_num_format("[h]:mm"),
        }
    }

    fn for_style(&self, style: CellStyle) -> &Format {
        match style {
            CellStyle::Date => &self.date,
            CellStyle::Time => &self.time,
            CellStyle::Duration => &self.duration,
        }
    }
}

/// Excel workbook destination
pub struct ExcelSink {
    path: PathBuf,
    workbook: Workbook,
    formats: Formats,
    sheet_names: Vec<String>,
    current: Option<usize>,
    header_written: bool,
    rows: Vec<Vec<Value>>,
    closed: bool,
}

impl ExcelSink {
    /// Prepare a workbook to be saved at `path` on close
    pub fn create<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            workbook: Workbook::new(),
            formats: Formats::new(),
            sheet_names: Vec::new(),
            current: None,
            header_written: false,
            rows: Vec::new(),
            closed: false,
        }
    }

    /// Names of the sheets created so far
    pub fn sheet_names(&self) -> &[String] {
        &self.sheet_names
    }

    /// Excel-safe, unique sheet name for a section title
    fn sheet_name(&self, title: &str) -> String {
        let cleaned: String = title
            .chars()
            .map(|c| if "[]:*?/\\".contains(c) { '_' } else { c })
            .take(MAX_SHEET_NAME)
            .collect();
        let base = if cleaned.trim().is_empty() { "Sheet".to_string() } else { cleaned };

        let taken = |name: &str| self.sheet_names.iter().any(|n| n.eq_ignore_ascii_case(name));
        if !taken(&base) {
            return base;
        }
        let mut n = 2;
        loop {
            let suffix = format!("~{}", n);
            let stem: String = base.chars().take(MAX_SHEET_NAME - suffix.len()).collect();
            let candidate = format!("{}{}", stem, suffix);
            if !taken(&candidate) {
                return candidate;
            }
            n += 1;
        }
    }
}

impl ExportSink for ExcelSink {
    fn is_spreadsheet(&self) -> bool {
        true
    }

    fn open_section(&mut self, title: &str) -> Result<(), ExportError> {
        if self.closed {
            return Err(ExportError::SinkState("sink already closed"));
        }

        let name = self.sheet_name(title);
        self.workbook.add_worksheet().set_name(&name)?;
        debug!("Added worksheet '{}'", name);

        self.current = Some(self.sheet_names.len());
        self.sheet_names.push(name);
        self.header_written = false;
        self.rows.clear();
        Ok(())
    }

    fn write_header(&mut self, columns: &[String]) -> Result<(), ExportError> {
        let index = self.current.ok_or(ExportError::SinkState("header written outside a section"))?;
        let sheet = self.workbook.worksheet_from_index(index)?;

        for (col, name) in columns.iter().enumerate() {
            sheet.write_string_with_format(0, column_index(col)?, name, &self.formats.header)?;
        }
        self.header_written = true;
        Ok(())
    }

    fn write_row(&mut self, row: &[Value]) -> Result<(), ExportError> {
        if !self.header_written {
            return Err(ExportError::SinkState("row written before the header"));
        }
        let row_index = u32::try_from(self.rows.len() + 1)
            .map_err(|_| ExportError::SinkState("too many rows for one sheet"))?;

        let index = self.current.ok_or(ExportError::SinkState("no section is open"))?;
        let sheet = self.workbook.worksheet_from_index(index)?;
        for (col, value) in row.iter().enumerate() {
            write_cell(sheet, &self.formats, row_index, column_index(col)?, value, None)?;
        }

        self.rows.push(row.to_vec());
        Ok(())
    }

    fn apply_column_styling(&mut self, hints: &[Option<Presentation>]) -> Result<(), ExportError> {
        let index = self.current.ok_or(ExportError::SinkState("no section is open"))?;
        let sheet = self.workbook.worksheet_from_index(index)?;

        for (col, hint) in hints.iter().enumerate() {
            let Some(hint) = hint else { continue };
            let col = column_index(col)?;

            if let Some(width) = hint.width {
                sheet.set_column_width(col, width)?;
            }
            if let Some(style) = hint.style {
                let format = self.formats.for_style(style);
                for (offset, row) in self.rows.iter().enumerate() {
                    if let Some(value) = row.get(usize::from(col)) {
                        write_cell(sheet, &self.formats, offset as u32 + 1, col, value, Some(format))?;
                    }
                }
            }
        }
        Ok(())
    }

    fn close(&mut self) -> Result<(), ExportError> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        self.current = None;
        self.rows.clear();

        // Saving a workbook without sheets would add a blank default one
        if self.sheet_names.is_empty() {
            debug!("No sections written, workbook {:?} not saved", self.path);
            return Ok(());
        }

        self.workbook.save(&self.path)?;
        debug!("Saved workbook {:?} with {} sheets", self.path, self.sheet_names.len());
        Ok(())
    }
}

fn column_index(col: usize) -> Result<u16, ExportError> {
    u16::try_from(col).map_err(|_| ExportError::SinkState("too many columns for one sheet"))
}

/// Days since the Excel epoch (1899-12-30)
fn excel_serial(date: NaiveDate) -> f64 {
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30).unwrap_or_default();
    date.signed_duration_since(epoch).num_days() as f64
}

fn day_fraction(time: NaiveTime) -> f64 {
    f64::from(time.num_seconds_from_midnight()) / SECONDS_PER_DAY
}

fn write_cell(
    sheet: &mut Worksheet,
    formats: &Formats,
    row: u32,
    col: u16,
    value: &Value,
    format: Option<&Format>,
) -> Result<(), XlsxError> {
    match value {
        Value::Null => {
            if let Some(format) = format {
                sheet.write_blank(row, col, format)?;
            }
        }
        Value::Integer(i) => {
            let number = *i as f64;
            match format {
                Some(format) => sheet.write_number_with_format(row, col, number, format)?,
                None => sheet.write_number(row, col, number)?,
            };
        }
        Value::Real(r) => {
            match format {
                Some(format) => sheet.write_number_with_format(row, col, *r, format)?,
                None => sheet.write_number(row, col, *r)?,
            };
        }
        Value::Text(s) => {
            match format {
                Some(format) => sheet.write_string_with_format(row, col, s, format)?,
                None => sheet.write_string(row, col, s)?,
            };
        }
        Value::Date(d) => {
            sheet.write_number_with_format(row, col, excel_serial(*d), format.unwrap_or(&formats.date))?;
        }
        Value::Time(t) => {
            sheet.write_number_with_format(row, col, day_fraction(*t), format.unwrap_or(&formats.time))?;
        }
        Value::Duration(secs) => {
            let days = *secs as f64 / SECONDS_PER_DAY;
            sheet.write_number_with_format(row, col, days, format.unwrap_or(&formats.duration))?;
        }
    }
    Ok(())
}
