/*!
 * Tests for the language resources shipped in languages/
 */

use std::collections::BTreeSet;

use glucolog::translation::{LanguageCatalog, LanguageResource, Translator};

use crate::common::{languages_dir, MOCK_TABLES};

fn catalog() -> LanguageCatalog {
    LanguageCatalog::new(languages_dir())
}

/// Italian is the source vocabulary of the backup
fn reference() -> LanguageResource {
    catalog().load("it").unwrap()
}

#[test]
fn test_catalog_shouldShipItalianAndEnglish() {
    let available = catalog().available().unwrap();
    assert!(available.contains(&"it".to_string()));
    assert!(available.contains(&"en".to_string()));
}

#[test]
fn test_languageFiles_shouldShareTheSameKeys() {
    let reference = reference();

    for code in catalog().available().unwrap() {
        let resource = catalog().load(&code).unwrap();
        for ((section, expected), (_, actual)) in reference.sections().iter().zip(resource.sections().iter()) {
            let expected: BTreeSet<_> = expected.keys().collect();
            let actual: BTreeSet<_> = actual.keys().collect();

            let missing: Vec<_> = expected.difference(&actual).collect();
            let extra: Vec<_> = actual.difference(&expected).collect();
            assert!(missing.is_empty(), "'{}' {} is missing {:?}", code, section, missing);
            assert!(extra.is_empty(), "'{}' {} has unexpected {:?}", code, section, extra);
        }
    }
}

#[test]
fn test_languageFiles_shouldTranslateInjectively() {
    for code in catalog().available().unwrap() {
        let resource = catalog().load(&code).unwrap();
        for (section, map) in resource.sections() {
            let values: BTreeSet<_> = map.values().collect();
            assert_eq!(values.len(), map.len(), "'{}' {} maps two keys to one value", code, section);
        }
        assert!(Translator::new(&code, &resource).is_ok());
    }
}

#[test]
fn test_italian_shouldBeTheIdentity() {
    for (section, map) in reference().sections() {
        for (key, value) in map {
            assert_eq!(key, value, "it {} entry '{}'", section, key);
        }
    }
}

#[test]
fn test_english_shouldCoverEveryKnownTable() {
    let translator = Translator::from_catalog(&catalog(), Some("en")).unwrap();

    for table in MOCK_TABLES.iter().filter(|t| t.name != "t_nascosto") {
        assert_eq!(translator.translate_table_name(table.name), table.en_name);
        assert_eq!(translator.resolve_table_name(table.en_name).unwrap(), table.name);
    }
    assert_eq!(translator.gap_count(), 0);
}

#[test]
fn test_fromCatalog_withUnknownLanguage_shouldListAvailable() {
    let err = Translator::from_catalog(&catalog(), Some("fr")).unwrap_err();
    let message = err.to_string();
    assert!(message.contains("'fr' is not available"));
    assert!(message.contains("en"));
}
