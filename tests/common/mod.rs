/*!
 * Common test utilities for the glucolog test suite
 */

use anyhow::Result;
use rusqlite::Connection;
use std::path::{Path, PathBuf};

use glucolog::{LanguageCatalog, ReformatRegistry, SqliteSource, Translator};

/// One table of the mock backup
pub struct MockTable {
    pub name: &'static str,
    pub en_name: &'static str,
    pub columns: &'static [&'static str],
    /// SQL value tuples, one per row
    pub rows: &'static [&'static str],
}

/// Tables of the mock backup, in creation order
pub const MOCK_TABLES: &[MockTable] = &[
    MockTable {
        name: "android_metadata",
        en_name: "android_metadata",
        columns: &["sconosciuta", "locale"],
        rows: &["('', 'en_GB')"],
    },
    MockTable {
        name: "t_parametri",
        en_name: "t_parameters",
        columns: &[
            "_id", "cognome", "nome", "data_nascita", "sesso", "mail_medico", "um_glicemia",
            "um_carboidrati", "livello_basso", "livello_alto", "digiuno", "mattino",
            "primo_pomeriggio", "tardo_pomeriggio", "sera", "notte", "sconosciuta", "chetoni",
            "insulina", "meter", "web_server", "PID", "barcode_areo", "areo_nfc_bt",
            "noareo_bt_btle", "periodocustoms1", "periodocustoms2", "periodocustoms3",
            "periodocustoms4", "shealth", "web_server_auto", "show_delete",
        ],
        rows: &["(1, 'Garibaldi', 'Giuseppe', '04-07-2007', 'M', 'giuseppe@garibaldi.nowhere', 2, 1, \
                 '', '', '24:00', '06:00', '12:00', '16:00', '19:00', '21:00', '', 'S', 'S', 11, '', '', \
                 'null@XX123456', 0, 0, '01:00', '01:00', '01:00', '01:00', '', '', '')"],
    },
    MockTable {
        name: "t_risultati",
        en_name: "t_results",
        columns: &[
            "_id", "data", "ora", "periodo", "attivita", "aeroC", "aeroF", "aeroFB", "aeroEX",
            "evento", "commento", "risultato", "carboidrati", "insulina", "dose", "origine",
            "analisi", "dt_cancel", "dt_invio", "fl_invio",
        ],
        // Dates and times are milliseconds since 1970-01-01 and since midnight
        rows: &[
            "(17, 1619611200000, 21900000, 'mattino', '', '', '', '', '', '', '', 8.5, '', '', '', 'S', 'Glu', '', 0, 'W')",
            "(18, 1619697600000, 43620000, 'primo_pomeriggio', '', '', '', '', '', '', '', 9.1, '', '', '', 'S', 'Glu', '', 0, 'W')",
            "(19, 1619784000000, 58080000, 'tardo_pomeriggio', '', '', '', '', '', '', '', 7.3, '', '', '', 'S', 'Glu', '', 0, 'W')",
            "(22, 1619870400000, 69060000, 'sera', '', '', '', '', '', '', '', 10.1, '', '', '', 'S', 'Glu', '', 0, 'W')",
            "(20, 1619956800000, 76500000, 'notte', '', '', '', '', '', '', '', 8.7, '', '', '', 'S', 'Glu', '', 0, 'W')",
            "(20, 1620043200000, 76500000, 'mezzanotte', '', '', '', '', '', '', '', 8.6, '', '', '', 'S', 'Glu', '', 0, 'W')",
        ],
    },
    MockTable {
        name: "t_insulina",
        en_name: "t_insulin",
        columns: &["_id", "sconosciuta", "desc_insulina"],
        rows: &[],
    },
    MockTable {
        name: "t_glucometri",
        en_name: "t_glucometers",
        columns: &[
            "_id", "serial", "data", "ora", "sconosciuta", "risultato", "last_dw_index",
            "last_dw_index_ket",
        ],
        rows: &["(1, 'XX123456', '', '', '', '', 79, 3)"],
    },
    // No translation exists for this table or its column
    MockTable {
        name: "t_nascosto",
        en_name: "t_nascosto",
        columns: &["idiota"],
        rows: &[],
    },
];

/// Look up a mock table by source name
pub fn mock_table(name: &str) -> &'static MockTable {
    MOCK_TABLES
        .iter()
        .find(|t| t.name == name)
        .unwrap_or_else(|| panic!("no mock table {}", name))
}

/// Total number of data rows across the mock tables
pub fn mock_row_count() -> usize {
    MOCK_TABLES.iter().map(|t| t.rows.len()).sum()
}

/// Create the mock backup database at `dir/<name>`
pub fn mock_database(dir: &Path, name: &str) -> Result<PathBuf> {
    let path = dir.join(name);
    let connection = Connection::open(&path)?;

    for table in MOCK_TABLES {
        connection.execute(&format!("CREATE TABLE {} ({})", table.name, table.columns.join(",")), [])?;
        for row in table.rows {
            connection.execute(&format!("INSERT INTO {} VALUES {}", table.name, row), [])?;
        }
    }

    Ok(path)
}

/// The language resources shipped with the crate
pub fn languages_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("languages")
}

/// Translator for `code`, or the identity translator
pub fn translator(code: Option<&str>) -> Translator {
    Translator::from_catalog(&LanguageCatalog::new(languages_dir()), code).unwrap()
}

/// Everything an exporter borrows, built over a fresh mock database
pub struct Fixture {
    pub dir: tempfile::TempDir,
    pub source: SqliteSource,
    pub registry: ReformatRegistry,
    pub translator: Translator,
}

impl Fixture {
    pub fn new(language: Option<&str>) -> Self {
        Self::with_extra_sql(language, "")
    }

    /// Fixture whose backup also runs `sql` after the mock tables are created
    pub fn with_extra_sql(language: Option<&str>, sql: &str) -> Self {
        init_logging();
        let dir = tempfile::tempdir().unwrap();
        let db = mock_database(dir.path(), "glucolog.sql3").unwrap();
        Connection::open(&db).unwrap().execute_batch(sql).unwrap();
        Self {
            source: SqliteSource::open(&db).unwrap(),
            registry: ReformatRegistry::glucolog(),
            translator: translator(language),
            dir,
        }
    }

    pub fn output(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    pub fn exporter(&self) -> glucolog::Exporter<'_, SqliteSource> {
        glucolog::Exporter::new(&self.source, &self.registry, &self.translator)
    }
}

/// Route library logging through the test harness
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Lines consisting only of the CSV section separator
pub fn separator_count(output: &str) -> usize {
    output.lines().filter(|line| *line == "=====,=====,=====,=====,=====").count()
}
