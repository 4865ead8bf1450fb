/*!
 * Error types for the glucolog application.
 *
 * Each layer owns a thiserror enum: the data source boundary
 * (`SourceError`), the translation directory (`TranslationError`) and the
 * export engine (`ExportError`). `AppError` wraps them for the binary and
 * decides the process exit status.
 */

use std::path::PathBuf;
use thiserror::Error;

/// Exit status for usage, resolution, validation and data source failures
pub const EXIT_USAGE: u8 = 2;

/// Exit status for anything unexpected (I/O, corrupt files)
pub const EXIT_FAILURE: u8 = 1;

/// Errors surfacing from the relational data source
#[derive(Error, Debug)]
pub enum SourceError {
    /// A table or column name failed the identifier safety check
    #[error("Identifier '{0}' is not a safe SQL identifier; refusing to build a query with it.")]
    UnsafeIdentifier(String),

    /// The table does not exist in the database
    #[error("Table '{0}' is not recognised in the database.")]
    TableNotFound(String),

    /// One or more requested columns do not exist in the table
    #[error("The requested columns are not recognised. Unknown column(s) in '{table}': {}", .columns.join(", "))]
    ColumnsNotFound {
        /// Source table name
        table: String,
        /// Requested columns missing from the table
        columns: Vec<String>,
    },

    /// The database could not be opened
    #[error("Cannot open database '{}': {reason}", .path.display())]
    Open {
        /// Path of the database file
        path: PathBuf,
        /// Underlying reason
        reason: String,
    },

    /// Any other storage failure
    #[error("Database error: {0}")]
    Storage(String),
}

impl From<rusqlite::Error> for SourceError {
    fn from(error: rusqlite::Error) -> Self {
        Self::Storage(error.to_string())
    }
}

/// Errors raised by the translation directory and language resources
#[derive(Error, Debug)]
pub enum TranslationError {
    /// The display-vocabulary table name has no source counterpart
    #[error("Table '{0}' is not recognised.")]
    TableNotRecognised(String),

    /// The display-vocabulary column name has no source counterpart
    #[error("Column '{0}' is not recognised.")]
    ColumnNotRecognised(String),

    /// No resource exists for the requested language code
    #[error("Language '{code}' is not available (available: {})", .available.join(", "))]
    LanguageNotAvailable {
        /// Requested code
        code: String,
        /// Codes discovered in the language directory
        available: Vec<String>,
    },

    /// The language code is not an ISO 639-1 code
    #[error("Invalid language code: '{0}'")]
    InvalidLanguageCode(String),

    /// A language resource could not be read or parsed
    #[error("Cannot read language file '{}': {reason}", .path.display())]
    LanguageFile {
        /// Path of the resource
        path: PathBuf,
        /// Underlying reason
        reason: String,
    },

    /// Two source keys share the same display value, so the reverse lookup is ambiguous
    #[error("Language '{language}' maps both '{first}' and '{second}' to {section} '{value}'")]
    AmbiguousTranslation {
        /// Language code
        language: String,
        /// Dictionary section (tables, columns, data)
        section: String,
        /// The shared display value
        value: String,
        /// First source key
        first: String,
        /// Second source key
        second: String,
    },
}

/// Errors raised while exporting
#[derive(Error, Debug)]
pub enum ExportError {
    /// Error from the data source
    #[error(transparent)]
    Source(#[from] SourceError),

    /// Error from the translation directory
    #[error(transparent)]
    Translation(#[from] TranslationError),

    /// Output filename does not carry the suffix of the selected format
    #[error("Output file '{}' does not end in '{suffix}'", .path.display())]
    FormatMismatch {
        /// Output path
        path: PathBuf,
        /// Expected suffix
        suffix: &'static str,
    },

    /// A sink was driven out of order
    #[error("Export sink misuse: {0}")]
    SinkState(&'static str),

    /// Error writing delimited text
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Error writing the spreadsheet
    #[error("Spreadsheet error: {0}")]
    Spreadsheet(#[from] rust_xlsxwriter::XlsxError),

    /// Error from a file operation
    #[error("File error: {0}")]
    Io(#[from] std::io::Error),
}

impl ExportError {
    /// Whether the error belongs to the usage/resolution/validation family
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::Source(
                SourceError::UnsafeIdentifier(_)
                    | SourceError::TableNotFound(_)
                    | SourceError::ColumnsNotFound { .. }
                    | SourceError::Open { .. }
            ) | Self::Translation(_)
                | Self::FormatMismatch { .. }
        )
    }
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Malformed or incomplete command line
    #[error("{0}")]
    Usage(String),

    /// Error from the export engine
    #[error(transparent)]
    Export(#[from] ExportError),

    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl AppError {
    /// Process exit status for this error
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Usage(_) => EXIT_USAGE,
            Self::Export(e) if e.is_user_error() => EXIT_USAGE,
            _ => EXIT_FAILURE,
        }
    }
}

impl From<SourceError> for AppError {
    fn from(error: SourceError) -> Self {
        Self::Export(error.into())
    }
}

impl From<TranslationError> for AppError {
    fn from(error: TranslationError) -> Self {
        Self::Export(error.into())
    }
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(format!("{:#}", error))
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
