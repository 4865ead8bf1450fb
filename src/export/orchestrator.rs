/*!
 * Export orchestrator.
 *
 * Drives one export run: resolves the requested names, reads the rows,
 * reformats and translates each cell, and streams the result into a sink.
 * The sink is owned by the run and closed exactly once on every path, so a
 * fatal error leaves the partial output written so far on disk.
 */

use log::{debug, info, warn};
use std::path::Path;

use super::{open_sink, ExportSink, OutputFormat};
use crate::database::{DataSource, Row, TableDescriptor};
use crate::errors::ExportError;
use crate::reformat::ReformatRegistry;
use crate::translation::Translator;

/// What one export run produced
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportSummary {
    /// Sections (tables) written
    pub sections: usize,
    /// Data rows written
    pub rows: usize,
    /// Translation gaps hit during the run
    pub gaps: usize,
}

/// Coordinates data source, reformatter, translator and sink
pub struct Exporter<'a, S: DataSource + ?Sized> {
    source: &'a S,
    registry: &'a ReformatRegistry,
    translator: &'a Translator,
}

impl<'a, S: DataSource + ?Sized> Exporter<'a, S> {
    /// Create an exporter over borrowed collaborators
    pub fn new(source: &'a S, registry: &'a ReformatRegistry, translator: &'a Translator) -> Self {
        Self {
            source,
            registry,
            translator,
        }
    }

    /// Display names of every table
    pub fn list_tables(&self) -> Result<Vec<String>, ExportError> {
        Ok(self
            .source
            .list_tables()?
            .iter()
            .map(|table| self.translator.translate_table_name(table))
            .collect())
    }

    /// Display names of the columns of a display-named table
    pub fn list_columns(&self, display_table: &str) -> Result<Vec<String>, ExportError> {
        let table = self.translator.resolve_table_name(display_table)?;
        Ok(self.display_columns(&table, &self.source.list_columns(&table)?))
    }

    /// Export one table, optionally restricted to display-named columns
    pub fn export_table(
        &self,
        mut sink: Box<dyn ExportSink>,
        display_table: &str,
        columns: Option<&[String]>,
    ) -> Result<ExportSummary, ExportError> {
        let gaps_before = self.translator.gap_count();
        let mut summary = ExportSummary::default();

        let outcome = self.write_table(sink.as_mut(), display_table, columns, &mut summary);
        self.finish(sink.as_mut(), outcome, summary, gaps_before)
    }

    /// Export every table of the database, one section each
    pub fn dump_database(&self, mut sink: Box<dyn ExportSink>) -> Result<ExportSummary, ExportError> {
        let gaps_before = self.translator.gap_count();
        let mut summary = ExportSummary::default();

        let outcome = self.write_database(sink.as_mut(), &mut summary);
        self.finish(sink.as_mut(), outcome, summary, gaps_before)
    }

    /// Open a sink for `format` at `path` and export one table into it
    pub fn export_table_to(
        &self,
        format: OutputFormat,
        path: &Path,
        display_table: &str,
        columns: Option<&[String]>,
    ) -> Result<ExportSummary, ExportError> {
        let sink = open_sink(format, path)?;
        self.export_table(sink, display_table, columns)
    }

    /// Open a sink for `format` at `path` and dump the database into it
    pub fn dump_database_to(&self, format: OutputFormat, path: &Path) -> Result<ExportSummary, ExportError> {
        let sink = open_sink(format, path)?;
        self.dump_database(sink)
    }

    fn write_table(
        &self,
        sink: &mut dyn ExportSink,
        display_table: &str,
        columns: Option<&[String]>,
        summary: &mut ExportSummary,
    ) -> Result<(), ExportError> {
        let table = self.translator.resolve_table_name(display_table)?;

        let (source_columns, header) = match columns {
            Some(display) => (self.translator.resolve_column_names(display)?, display.to_vec()),
            None => {
                let source_columns = self.source.list_columns(&table)?;
                let header = self.display_columns(&table, &source_columns);
                (source_columns, header)
            }
        };

        let descriptor = self.source.load_table(&table, Some(&source_columns))?;
        self.write_section(sink, display_table, &header, descriptor, summary)
    }

    fn write_database(&self, sink: &mut dyn ExportSink, summary: &mut ExportSummary) -> Result<(), ExportError> {
        let tables = self.source.list_tables()?;
        info!("Dumping {} tables", tables.len());

        for table in tables {
            let title = self.translator.translate_table_name(&table);
            let descriptor = self.source.load_table(&table, None)?;
            let header = self.display_columns(&table, &descriptor.columns);
            self.write_section(sink, &title, &header, descriptor, summary)?;
        }
        Ok(())
    }

    fn write_section(
        &self,
        sink: &mut dyn ExportSink,
        title: &str,
        header: &[String],
        table: TableDescriptor,
        summary: &mut ExportSummary,
    ) -> Result<(), ExportError> {
        info!("Exporting '{}' as '{}' ({} rows)", table.name, title, table.rows.len());

        sink.open_section(title)?;
        sink.write_header(header)?;

        let excel = sink.is_spreadsheet();
        for row in table.rows {
            let row = self.prepare_row(&table.name, &table.columns, row, excel);
            sink.write_row(&row)?;
            summary.rows += 1;
        }

        let hints: Vec<_> = table
            .columns
            .iter()
            .map(|column| self.registry.presentation(&table.name, column))
            .collect();
        sink.apply_column_styling(&hints)?;

        summary.sections += 1;
        Ok(())
    }

    /// Reformat, then translate categorical values, cell by cell
    pub fn prepare_row(&self, table: &str, columns: &[String], row: Row, excel: bool) -> Row {
        row.into_iter()
            .zip(columns)
            .map(|(value, column)| {
                let value = self.registry.reformat(table, column, value, excel);
                if self.registry.is_categorical(table, column) {
                    self.translator.translate_value(table, column, value)
                } else {
                    value
                }
            })
            .collect()
    }

    fn display_columns(&self, table: &str, columns: &[String]) -> Vec<String> {
        debug!("Translating {} column names of '{}'", columns.len(), table);
        columns
            .iter()
            .map(|column| self.translator.translate_column_name(column))
            .collect()
    }

    /// Close the sink whatever happened, keeping the first error
    fn finish(
        &self,
        sink: &mut dyn ExportSink,
        outcome: Result<(), ExportError>,
        mut summary: ExportSummary,
        gaps_before: usize,
    ) -> Result<ExportSummary, ExportError> {
        let closed = sink.close();

        if let Err(e) = outcome {
            if let Err(close_error) = closed {
                warn!("Failed to close output after an error: {}", close_error);
            }
            return Err(e);
        }
        closed?;

        summary.gaps = self.translator.gap_count() - gaps_before;
        info!(
            "Exported {} sections, {} rows ({} translation gaps)",
            summary.sections, summary.rows, summary.gaps
        );
        Ok(summary)
    }
}
