/*!
 * Bidirectional dictionary built from a forward mapping.
 */

use std::collections::{BTreeMap, HashMap};

use crate::errors::TranslationError;

/// Forward (source → display) map with its derived reverse map
///
/// The forward map must be injective: two source keys sharing one display
/// value would make the reverse lookup ambiguous, so building fails instead.
#[derive(Debug, Clone, Default)]
pub struct Dictionary {
    forward: HashMap<String, String>,
    reverse: HashMap<String, String>,
}

impl Dictionary {
    /// Build the dictionary for one section of a language resource
    pub fn build(
        language: &str,
        section: &str,
        entries: &BTreeMap<String, String>,
    ) -> Result<Self, TranslationError> {
        let mut forward = HashMap::with_capacity(entries.len());
        let mut reverse = HashMap::with_capacity(entries.len());

        for (source, display) in entries {
            if let Some(previous) = reverse.insert(display.clone(), source.clone()) {
                return Err(TranslationError::AmbiguousTranslation {
                    language: language.to_string(),
                    section: section.to_string(),
                    value: display.clone(),
                    first: previous,
                    second: source.clone(),
                });
            }
            forward.insert(source.clone(), display.clone());
        }

        Ok(Self { forward, reverse })
    }

    /// Display value for a source key
    pub fn forward(&self, source: &str) -> Option<&str> {
        self.forward.get(source).map(String::as_str)
    }

    /// Source key for a display value
    pub fn reverse(&self, display: &str) -> Option<&str> {
        self.reverse.get(display).map(String::as_str)
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.forward.len()
    }

    /// Whether the dictionary is empty
    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }
}
