/*!
 * Relational data source boundary.
 *
 * The export engine only sees the `DataSource` trait. `SqliteSource` is the
 * implementation over a GlucoLog backup file; it validates every identifier
 * before building a statement and turns SQLite failures into the
 * `SourceError` taxonomy so no raw storage error leaks upwards.
 */

use log::{debug, info};
use rusqlite::{Connection, OpenFlags};
use std::path::{Path, PathBuf};

use super::identifier::{ensure_all_safe, ensure_safe};
use super::models::{Row, TableDescriptor, Value};
use crate::errors::SourceError;

/// Read-only relational query capability
pub trait DataSource {
    /// Names of the user tables, in catalog order
    fn list_tables(&self) -> Result<Vec<String>, SourceError>;

    /// Column names of a table, in declaration order
    fn list_columns(&self, table: &str) -> Result<Vec<String>, SourceError>;

    /// All rows of `table`, restricted to `columns`
    fn query_rows(&self, table: &str, columns: &[String]) -> Result<Vec<Row>, SourceError>;

    /// Read a table with either the given columns or all of them
    fn load_table(&self, table: &str, columns: Option<&[String]>) -> Result<TableDescriptor, SourceError> {
        let columns = match columns {
            Some(columns) => columns.to_vec(),
            None => self.list_columns(table)?,
        };
        let rows = self.query_rows(table, &columns)?;

        Ok(TableDescriptor {
            name: table.to_string(),
            columns,
            rows,
        })
    }
}

/// SQLite implementation of `DataSource`
pub struct SqliteSource {
    /// Path to the database file
    db_path: PathBuf,
    /// Open connection, owned by the one export run
    connection: Connection,
}

impl SqliteSource {
    /// Open an existing backup database read-only
    pub fn open<P: AsRef<Path>>(db_path: P) -> Result<Self, SourceError> {
        let db_path = db_path.as_ref().to_path_buf();

        if !db_path.is_file() {
            return Err(SourceError::Open {
                path: db_path,
                reason: "file does not exist".to_string(),
            });
        }

        info!("Opening database at: {:?}", db_path);

        let connection = Connection::open_with_flags(
            &db_path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|e| SourceError::Open {
            path: db_path.clone(),
            reason: e.to_string(),
        })?;

        Ok(Self { db_path, connection })
    }

    /// Wrap an already open connection (used for in-memory databases)
    pub fn from_connection(connection: Connection) -> Self {
        Self {
            db_path: PathBuf::from(":memory:"),
            connection,
        }
    }

    /// Get the database file path
    pub fn path(&self) -> &Path {
        &self.db_path
    }

    /// Map a failed statement onto the source error taxonomy
    fn classify(&self, error: rusqlite::Error, table: &str, columns: &[String]) -> SourceError {
        match sqlite_message(&error) {
            Some(msg) if msg.starts_with("no such table") => SourceError::TableNotFound(table.to_string()),
            Some(msg) if msg.starts_with("no such column") => {
                let known = self.list_columns(table).unwrap_or_default();
                let unknown = columns
                    .iter()
                    .filter(|c| !known.iter().any(|k| k.eq_ignore_ascii_case(c)))
                    .cloned()
                    .collect();
                SourceError::ColumnsNotFound {
                    table: table.to_string(),
                    columns: unknown,
                }
            }
            _ => SourceError::from(error),
        }
    }
}

impl DataSource for SqliteSource {
    fn list_tables(&self) -> Result<Vec<String>, SourceError> {
        let mut stmt = self.connection.prepare(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%'",
        )?;
        let names = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;

        debug!("Found {} tables", names.len());
        Ok(names)
    }

    fn list_columns(&self, table: &str) -> Result<Vec<String>, SourceError> {
        let table = ensure_safe(table)?;
        let sql = format!("SELECT * FROM {} LIMIT 0", table);

        let stmt = self
            .connection
            .prepare(&sql)
            .map_err(|e| match sqlite_message(&e) {
                Some(msg) if msg.starts_with("no such table") => SourceError::TableNotFound(table.to_string()),
                _ => SourceError::from(e),
            })?;

        Ok(stmt.column_names().into_iter().map(str::to_string).collect())
    }

    fn query_rows(&self, table: &str, columns: &[String]) -> Result<Vec<Row>, SourceError> {
        let table = ensure_safe(table)?;
        ensure_all_safe(columns)?;

        if columns.is_empty() {
            return Err(SourceError::ColumnsNotFound {
                table: table.to_string(),
                columns: Vec::new(),
            });
        }

        let sql = format!("SELECT {} FROM {}", columns.join(", "), table);
        debug!("Executing: {}", sql);

        let mut stmt = self
            .connection
            .prepare(&sql)
            .map_err(|e| self.classify(e, table, columns))?;
        let width = stmt.column_count();

        let rows = stmt
            .query_map([], |row| {
                (0..width)
                    .map(|i| row.get_ref(i).map(Value::from))
                    .collect::<Result<Row, _>>()
            })?
            .collect::<Result<Vec<_>, _>>()?;

        debug!("Read {} rows from '{}'", rows.len(), table);
        Ok(rows)
    }
}

/// Extended message of a SQLite failure, if any
///
/// Statements that fail to compile report through `SqlInputError`, runtime
/// failures through `SqliteFailure`.
fn sqlite_message(error: &rusqlite::Error) -> Option<&str> {
    match error {
        rusqlite::Error::SqliteFailure(_, Some(msg)) => Some(msg.as_str()),
        rusqlite::Error::SqlInputError { msg, .. } => Some(msg.as_str()),
        _ => None,
    }
}
