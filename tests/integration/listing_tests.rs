/*!
 * Tests for table and column listings
 */

use crate::common::{mock_table, Fixture, MOCK_TABLES};

#[test]
fn test_listTables_shouldSkipNothingButInternalTables() {
    let fixture = Fixture::new(None);
    let tables = fixture.exporter().list_tables().unwrap();

    let expected: Vec<&str> = MOCK_TABLES.iter().map(|t| t.name).collect();
    assert_eq!(tables, expected);
}

#[test]
fn test_listTables_withTranslation_shouldKeepUntranslatedNames() {
    let fixture = Fixture::new(Some("en"));
    let tables = fixture.exporter().list_tables().unwrap();

    assert!(tables.contains(&"t_results".to_string()));
    assert!(tables.contains(&"t_nascosto".to_string()));
    assert!(!tables.contains(&"t_risultati".to_string()));
}

#[test]
fn test_listColumns_shouldFollowTableOrder() {
    let fixture = Fixture::new(None);
    let columns = fixture.exporter().list_columns("t_parametri").unwrap();
    assert_eq!(columns, mock_table("t_parametri").columns);
}

#[test]
fn test_listColumns_withTranslation_shouldRequireDisplayName() {
    let fixture = Fixture::new(Some("en"));
    let columns = fixture.exporter().list_columns("t_parameters").unwrap();

    assert_eq!(columns.len(), mock_table("t_parametri").columns.len());
    assert_eq!(&columns[..4], ["_id", "surname", "first_name", "date_of_birth"]);

    let err = fixture.exporter().list_columns("t_missing").unwrap_err();
    assert_eq!(err.to_string(), "Table 't_missing' is not recognised.");
}

#[test]
fn test_listColumns_withUnknownTable_shouldReportDatabaseError() {
    let fixture = Fixture::new(None);
    let err = fixture.exporter().list_columns("t_mancante").unwrap_err();
    assert_eq!(err.to_string(), "Table 't_mancante' is not recognised in the database.");
}
