use isolang::Language;

use crate::errors::TranslationError;

/// Language utilities for ISO language code handling
///
/// Language resources are named after ISO 639-1 (2-letter) codes, so only
/// that form is accepted here.
/// Validate and normalize an ISO 639-1 language code
pub fn validate_language_code(code: &str) -> Result<String, TranslationError> {
    let normalized_code = code.trim().to_lowercase();

    if normalized_code.len() == 2 && Language::from_639_1(&normalized_code).is_some() {
        return Ok(normalized_code);
    }

    Err(TranslationError::InvalidLanguageCode(code.to_string()))
}

/// Get the English language name from a code
pub fn get_language_name(code: &str) -> Result<String, TranslationError> {
    let normalized = validate_language_code(code)?;
    let lang = Language::from_639_1(&normalized)
        .ok_or_else(|| TranslationError::InvalidLanguageCode(code.to_string()))?;

    Ok(lang.to_name().to_string())
}

/// Get the language's own name for itself, when known
pub fn get_local_name(code: &str) -> Option<String> {
    let normalized = validate_language_code(code).ok()?;
    Language::from_639_1(&normalized)
        .and_then(|lang| lang.to_autonym())
        .map(str::to_string)
}
