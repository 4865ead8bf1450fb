/*!
 * Per-language translation resources.
 *
 * A resource is a JSON file named after a two-letter language code
 * (`en.json`, `it.json`, ...) holding three flat dictionaries from the
 * backup's source vocabulary to the display vocabulary: `tables`,
 * `columns` and `data` (categorical values).
 */

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::TranslationError;
use crate::language_utils::validate_language_code;

/// Resource file naming convention
static LANGUAGE_FILE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([a-z]{2})\.json$").expect("Invalid language file regex")
});

/// The three dictionaries of one language
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageResource {
    /// Table names
    #[serde(default)]
    pub tables: BTreeMap<String, String>,

    /// Column names
    #[serde(default)]
    pub columns: BTreeMap<String, String>,

    /// Categorical data values
    #[serde(default)]
    pub data: BTreeMap<String, String>,
}

impl LanguageResource {
    /// Parse a resource from JSON text
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    /// Named sections, in a fixed order
    pub fn sections(&self) -> [(&'static str, &BTreeMap<String, String>); 3] {
        [("tables", &self.tables), ("columns", &self.columns), ("data", &self.data)]
    }
}

/// Directory of language resources
#[derive(Debug, Clone)]
pub struct LanguageCatalog {
    dir: PathBuf,
}

impl LanguageCatalog {
    /// Catalog over the given directory
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// Directory holding the resources
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the resource for a code
    pub fn path_for(&self, code: &str) -> PathBuf {
        self.dir.join(format!("{}.json", code))
    }

    /// Language codes with a resource file, sorted
    pub fn available(&self) -> Result<Vec<String>, TranslationError> {
        let entries = fs::read_dir(&self.dir).map_err(|e| TranslationError::LanguageFile {
            path: self.dir.clone(),
            reason: e.to_string(),
        })?;

        let mut codes: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().is_file())
            .filter_map(|entry| {
                let name = entry.file_name();
                LANGUAGE_FILE
                    .captures(&name.to_string_lossy())
                    .map(|caps| caps[1].to_string())
            })
            .collect();
        codes.sort();

        debug!("Found languages {:?} in {:?}", codes, self.dir);
        Ok(codes)
    }

    /// Read and parse the resource for a code
    pub fn load(&self, code: &str) -> Result<LanguageResource, TranslationError> {
        let code = validate_language_code(code)?;
        let available = self.available()?;

        if !available.contains(&code) {
            return Err(TranslationError::LanguageNotAvailable { code, available });
        }

        let path = self.path_for(&code);
        let text = fs::read_to_string(&path).map_err(|e| TranslationError::LanguageFile {
            path: path.clone(),
            reason: e.to_string(),
        })?;

        LanguageResource::from_json(&text).map_err(|e| TranslationError::LanguageFile {
            path,
            reason: e.to_string(),
        })
    }
}
