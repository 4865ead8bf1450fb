/*!
 * # glucolog - GlucoLog backup export
 *
 * A Rust library for exporting the tables of a GlucoLog SQLite backup to
 * delimited text or an Excel workbook, optionally translating table names,
 * column names and categorical values into another language.
 *
 * ## Features
 *
 * - Export one table (optionally a subset of its columns) or the whole database
 * - CSV output with separated sections, or one worksheet per table
 * - Date and time columns reformatted to ISO text or native spreadsheet values
 * - Translation through per-language JSON resources, in both directions
 * - ISO 639-1 language code support
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `database`: read-only access to the backup and the identifier guard
 * - `reformat`: per-column value reformatting and presentation hints
 * - `translation`: language resources and the translation directory
 * - `export`: export sinks and the orchestrator driving them
 * - `app_config`: Configuration management
 * - `logging`: console and log file output
 * - `language_utils`: ISO language code utilities
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod database;
pub mod errors;
pub mod export;
pub mod language_utils;
pub mod logging;
pub mod reformat;
pub mod translation;

// Re-export main types for easier usage
pub use app_config::Config;
pub use database::{DataSource, SqliteSource, Value};
pub use errors::{AppError, ExportError, SourceError, TranslationError};
pub use export::{open_sink, ExportSink, ExportSummary, Exporter, OutputFormat};
pub use reformat::ReformatRegistry;
pub use translation::{LanguageCatalog, Translator};
