/*!
 * Translation directory for schema and categorical identifiers.
 *
 * Forward lookups (source → display) never fail: a miss is a translation
 * gap, logged and recorded, and the original passes through. Reverse
 * lookups (display → source) resolve user input back to names that can be
 * queried, and a miss there is fatal. Without an active language both
 * directions are the identity.
 */

use log::{debug, error, warn};
use std::cell::RefCell;

use super::dictionary::Dictionary;
use super::language::{LanguageCatalog, LanguageResource};
use crate::database::Value;
use crate::errors::TranslationError;
use crate::language_utils::validate_language_code;

/// What kind of identifier had no translation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GapKind {
    /// Table name
    Table,
    /// Column name
    Column,
    /// Categorical data value
    Value,
}

/// A forward lookup miss
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationGap {
    /// Kind of identifier
    pub kind: GapKind,
    /// The untranslated source name or value
    pub name: String,
}

/// Dictionaries of the active language
#[derive(Debug)]
struct ActiveLanguage {
    code: String,
    tables: Dictionary,
    columns: Dictionary,
    data: Dictionary,
}

/// Forward and reverse translation of tables, columns and values
#[derive(Debug, Default)]
pub struct Translator {
    language: Option<ActiveLanguage>,
    gaps: RefCell<Vec<TranslationGap>>,
}

impl Translator {
    /// Identity translator
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Translator for a parsed language resource
    pub fn new(code: &str, resource: &LanguageResource) -> Result<Self, TranslationError> {
        let code = validate_language_code(code)?;
        let language = ActiveLanguage {
            tables: Dictionary::build(&code, "tables", &resource.tables)?,
            columns: Dictionary::build(&code, "columns", &resource.columns)?,
            data: Dictionary::build(&code, "data", &resource.data)?,
            code,
        };

        for (section, dictionary) in [
            ("tables", &language.tables),
            ("columns", &language.columns),
            ("data", &language.data),
        ] {
            if dictionary.is_empty() {
                warn!("Language '{}' has no {} translations", language.code, section);
            }
        }

        debug!(
            "Loaded '{}' translations: {} tables, {} columns, {} values",
            language.code,
            language.tables.len(),
            language.columns.len(),
            language.data.len()
        );

        Ok(Self {
            language: Some(language),
            gaps: RefCell::new(Vec::new()),
        })
    }

    /// Translator for an optional language code from a catalog
    pub fn from_catalog(catalog: &LanguageCatalog, code: Option<&str>) -> Result<Self, TranslationError> {
        match code {
            Some(code) => {
                let resource = catalog.load(code)?;
                Self::new(code, &resource)
            }
            None => Ok(Self::disabled()),
        }
    }

    /// Active language code
    pub fn language(&self) -> Option<&str> {
        self.language.as_ref().map(|l| l.code.as_str())
    }

    /// Whether a language is active
    pub fn is_active(&self) -> bool {
        self.language.is_some()
    }

    /// Display name of a source table
    pub fn translate_table_name(&self, name: &str) -> String {
        self.forward(GapKind::Table, name, |l| &l.tables)
    }

    /// Display name of a source column
    pub fn translate_column_name(&self, name: &str) -> String {
        self.forward(GapKind::Column, name, |l| &l.columns)
    }

    /// Display value of a categorical cell
    ///
    /// Only text is looked up; empty and non-text values are returned as is.
    pub fn translate_value(&self, table: &str, column: &str, value: Value) -> Value {
        let Some(language) = &self.language else {
            return value;
        };
        let Value::Text(raw) = &value else {
            return value;
        };
        if value.is_empty() {
            return value;
        }

        match language.data.forward(raw) {
            Some(display) => Value::Text(display.to_string()),
            None => {
                error!(
                    "Missing '{}' translation for value '{}' in column '{}.{}'",
                    language.code, raw, table, column
                );
                self.record(GapKind::Value, raw);
                value
            }
        }
    }

    /// Source name of a display table name
    pub fn resolve_table_name(&self, display: &str) -> Result<String, TranslationError> {
        match &self.language {
            None => Ok(display.to_string()),
            Some(language) => language
                .tables
                .reverse(display)
                .map(str::to_string)
                .ok_or_else(|| TranslationError::TableNotRecognised(display.to_string())),
        }
    }

    /// Source name of a display column name
    pub fn resolve_column_name(&self, display: &str) -> Result<String, TranslationError> {
        match &self.language {
            None => Ok(display.to_string()),
            Some(language) => language
                .columns
                .reverse(display)
                .map(str::to_string)
                .ok_or_else(|| TranslationError::ColumnNotRecognised(display.to_string())),
        }
    }

    /// Resolve a whole column list, failing on the first unknown name
    pub fn resolve_column_names(&self, display: &[String]) -> Result<Vec<String>, TranslationError> {
        display.iter().map(|c| self.resolve_column_name(c)).collect()
    }

    /// Gaps recorded so far
    pub fn gaps(&self) -> Vec<TranslationGap> {
        self.gaps.borrow().clone()
    }

    /// Number of gaps recorded so far
    pub fn gap_count(&self) -> usize {
        self.gaps.borrow().len()
    }

    fn forward(&self, kind: GapKind, name: &str, section: impl Fn(&ActiveLanguage) -> &Dictionary) -> String {
        let Some(language) = &self.language else {
            return name.to_string();
        };

        match section(language).forward(name) {
            Some(display) => display.to_string(),
            None => {
                let what = match kind {
                    GapKind::Table => "table",
                    GapKind::Column => "column",
                    GapKind::Value => "value",
                };
                error!("Missing '{}' translation for {} '{}'", language.code, what, name);
                self.record(kind, name);
                name.to_string()
            }
        }
    }

    fn record(&self, kind: GapKind, name: &str) {
        self.gaps.borrow_mut().push(TranslationGap {
            kind,
            name: name.to_string(),
        });
    }
}
