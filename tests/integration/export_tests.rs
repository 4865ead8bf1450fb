/*!
 * End-to-end tests of single table exports over a mock backup
 */

use std::fs;

use glucolog::errors::{AppError, ExportError, SourceError, TranslationError};
use glucolog::translation::GapKind;
use glucolog::OutputFormat;

use crate::common::{mock_table, separator_count, Fixture};

/// Title line, header line, then one line per row and no separators
fn assert_single_section(output: &str, title: &str, rows: usize) {
    assert_eq!(output.matches('\n').count(), 2 + rows);
    assert_eq!(output.lines().next(), Some(title));
    assert_eq!(separator_count(output), 0);
}

#[test]
fn test_exportTable_withoutTranslation_shouldWriteTitleHeaderAndRows() {
    let fixture = Fixture::new(None);
    let output = fixture.output("parametri.csv");

    let summary = fixture
        .exporter()
        .export_table_to(OutputFormat::Csv, &output, "t_parametri", None)
        .unwrap();

    assert_eq!(summary.sections, 1);
    assert_eq!(summary.rows, 1);
    assert_eq!(summary.gaps, 0);

    let text = fs::read_to_string(&output).unwrap();
    assert_single_section(&text, "t_parametri", mock_table("t_parametri").rows.len());
    assert!(text.lines().nth(1).unwrap().starts_with("_id,cognome,nome,data_nascita,"));
    // Day-month-year dates and hour:minute times are rewritten to ISO text
    assert!(text.contains(",2007-07-04,"));
    assert!(text.contains(",00:00:00,06:00:00,12:00:00,16:00:00,19:00:00,21:00:00,"));
    assert!(!text.contains("24:00"));
}

#[test]
fn test_exportTable_withThreeColumns_shouldWriteOneLinePerRow() {
    let fixture = Fixture::new(None);
    let output = fixture.output("risultati.csv");
    let columns = vec!["_id".to_string(), "risultato".to_string(), "origine".to_string()];

    fixture
        .exporter()
        .export_table_to(OutputFormat::Csv, &output, "t_risultati", Some(&columns))
        .unwrap();

    let text = fs::read_to_string(&output).unwrap();
    assert_single_section(&text, "t_risultati", 6);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[1], "_id,risultato,origine");
    assert_eq!(lines[2], "17,8.5,S");
}

#[test]
fn test_exportTable_withTranslation_shouldTranslateNamesAndCategories() {
    let fixture = Fixture::new(Some("en"));
    let output = fixture.output("results.csv");

    let summary = fixture
        .exporter()
        .export_table_to(OutputFormat::Csv, &output, "t_results", None)
        .unwrap();

    let text = fs::read_to_string(&output).unwrap();
    assert_single_section(&text, "t_results", 6);
    assert!(text.lines().nth(1).unwrap().starts_with("_id,date,time,period,activity,"));
    assert!(text.contains(",2021-04-28,"));
    assert!(text.contains(",early_afternoon,"));
    assert!(!text.contains("primo_pomeriggio"));

    // The one value without a translation is kept and reported once
    assert!(text.contains(",mezzanotte,"));
    let value_gaps: Vec<_> = fixture
        .translator
        .gaps()
        .into_iter()
        .filter(|gap| gap.kind == GapKind::Value)
        .collect();
    assert_eq!(value_gaps.len(), 1);
    assert_eq!(value_gaps[0].name, "mezzanotte");
    assert_eq!(summary.gaps, 1);
}

#[test]
fn test_exportTable_withTranslatedColumnSubset_shouldKeepRequestedOrder() {
    let fixture = Fixture::new(Some("en"));
    let output = fixture.output("subset.csv");
    let columns: Vec<String> = ["period", "result", "_id"].iter().map(|c| c.to_string()).collect();

    fixture
        .exporter()
        .export_table_to(OutputFormat::Csv, &output, "t_results", Some(&columns))
        .unwrap();

    let text = fs::read_to_string(&output).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[1], "period,result,_id");
    assert_eq!(lines[2], "morning,8.5,17");
}

#[test]
fn test_exportTable_withUnknownColumn_shouldFailWithUsageExitCode() {
    let fixture = Fixture::new(None);
    let output = fixture.output("missing_column.csv");
    let columns = vec!["aeroC".to_string(), "t_perduta".to_string()];

    let err = fixture
        .exporter()
        .export_table_to(OutputFormat::Csv, &output, "t_risultati", Some(&columns))
        .unwrap_err();

    assert!(err.to_string().contains("The requested columns are not recognised."));
    match &err {
        ExportError::Source(SourceError::ColumnsNotFound { columns, .. }) => {
            assert_eq!(columns, &vec!["t_perduta".to_string()]);
        }
        other => panic!("unexpected error {:?}", other),
    }
    assert_eq!(AppError::from(err).exit_code(), 2);

    // The sink was opened and closed but no section was written
    assert_eq!(fs::read_to_string(&output).unwrap(), "");
}

#[test]
fn test_exportTable_withUntranslatableColumn_shouldFailBeforeQuerying() {
    let fixture = Fixture::new(Some("en"));
    let output = fixture.output("lost_column.csv");
    let columns = vec!["date".to_string(), "t_lost".to_string()];

    let err = fixture
        .exporter()
        .export_table_to(OutputFormat::Csv, &output, "t_results", Some(&columns))
        .unwrap_err();

    assert_eq!(err.to_string(), "Column 't_lost' is not recognised.");
    assert_eq!(AppError::from(err).exit_code(), 2);
}

#[test]
fn test_exportTable_withUnknownTable_shouldFail() {
    let fixture = Fixture::new(None);
    let err = fixture
        .exporter()
        .export_table_to(OutputFormat::Csv, &fixture.output("t.csv"), "t_mancante", None)
        .unwrap_err();
    assert_eq!(err.to_string(), "Table 't_mancante' is not recognised in the database.");

    let fixture = Fixture::new(Some("en"));
    let err = fixture
        .exporter()
        .export_table_to(OutputFormat::Csv, &fixture.output("t.csv"), "t_missing", None)
        .unwrap_err();
    assert!(matches!(err, ExportError::Translation(TranslationError::TableNotRecognised(_))));
    assert_eq!(err.to_string(), "Table 't_missing' is not recognised.");
}

#[test]
fn test_exportTable_withMismatchedSuffix_shouldNotCreateOutput() {
    let fixture = Fixture::new(None);
    let output = fixture.output("parametri.xlsx");

    let err = fixture
        .exporter()
        .export_table_to(OutputFormat::Csv, &output, "t_parametri", None)
        .unwrap_err();

    assert!(err.to_string().contains("does not end in '.csv'"));
    assert!(err.is_user_error());
    assert!(!output.exists());
}

#[test]
fn test_exportTable_toExcel_shouldWriteWorkbook() {
    let fixture = Fixture::new(Some("en"));
    let output = fixture.output("results.xlsx");

    let summary = fixture
        .exporter()
        .export_table_to(OutputFormat::Excel, &output, "t_results", None)
        .unwrap();

    assert_eq!(summary.rows, 6);
    let bytes = fs::read(&output).unwrap();
    assert!(bytes.starts_with(b"PK"));
}

#[test]
fn test_exportTable_toExcel_withUnknownTable_shouldLeaveNoWorkbook() {
    let fixture = Fixture::new(Some("en"));
    let output = fixture.output("missing.xlsx");

    let err = fixture
        .exporter()
        .export_table_to(OutputFormat::Excel, &output, "t_missing", None)
        .unwrap_err();

    assert!(matches!(err, ExportError::Translation(TranslationError::TableNotRecognised(_))));
    assert!(!output.exists());
}
