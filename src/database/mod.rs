/*!
 * Database module for reading GlucoLog backup files.
 *
 * This module provides:
 * - The identifier guard used before any name is interpolated into SQL
 * - The cell/row/table models
 * - The `DataSource` boundary and its SQLite implementation
 */

pub mod identifier;
pub mod models;
pub mod source;

// Re-export main types
pub use identifier::{ensure_safe, is_safe_identifier};
pub use models::{Row, TableDescriptor, Value};
pub use source::{DataSource, SqliteSource};
