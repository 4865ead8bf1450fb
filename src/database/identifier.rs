/*!
 * Identifier safety check for dynamically built queries.
 *
 * SQLite cannot bind table or column names as parameters, so every name
 * that is interpolated into a statement goes through `ensure_safe` first.
 */

use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::SourceError;

/// A letter or underscore, then letters, digits, `_`, `@` or `$`
static SAFE_IDENTIFIER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_@$]*$").expect("Invalid identifier regex")
});

/// Check whether a table or column name can be interpolated into SQL
pub fn is_safe_identifier(identifier: &str) -> bool {
    SAFE_IDENTIFIER.is_match(identifier)
}

/// Return the identifier unchanged, or refuse it
pub fn ensure_safe(identifier: &str) -> Result<&str, SourceError> {
    if is_safe_identifier(identifier) {
        Ok(identifier)
    } else {
        Err(SourceError::UnsafeIdentifier(identifier.to_string()))
    }
}

/// Check a whole column list, reporting the first offender
pub fn ensure_all_safe<S: AsRef<str>>(identifiers: &[S]) -> Result<(), SourceError> {
    for identifier in identifiers {
        ensure_safe(identifier.as_ref())?;
    }
    Ok(())
}
