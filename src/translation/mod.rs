/*!
 * Translation of table names, column names and categorical values.
 *
 * - `language`: discovery and parsing of per-language resources
 * - `dictionary`: forward/reverse dictionaries
 * - `directory`: the `Translator` used by the export engine
 */

pub mod dictionary;
pub mod directory;
pub mod language;

// Re-export main types
pub use dictionary::Dictionary;
pub use directory::{GapKind, TranslationGap, Translator};
pub use language::{LanguageCatalog, LanguageResource};
