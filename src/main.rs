// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use clap::error::ErrorKind;
use clap::{ArgAction, CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use log::{debug, error, info, warn};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use glucolog::app_config::{default_lang_dir, Config};
use glucolog::errors::{AppError, EXIT_FAILURE};
use glucolog::export::{ExportSummary, Exporter, OutputFormat};
use glucolog::language_utils::{get_language_name, get_local_name};
use glucolog::logging::{DualLogger, DEFAULT_LOGFILE};
use glucolog::{LanguageCatalog, ReformatRegistry, SqliteSource, Translator};

#[derive(Subcommand, Debug)]
enum Commands {
    /// List the tables found in the database
    ListTables,

    /// List the columns of one table
    ListColumns {
        /// Table name (in the display language when -x is given)
        #[arg(short, long)]
        table: String,
    },

    /// Export one table to CSV or Excel
    ExportTable {
        /// Table name (in the display language when -x is given)
        #[arg(short, long)]
        table: String,

        /// Comma separated columns to export; all columns when omitted
        #[arg(short, long, value_delimiter = ',')]
        columns: Option<Vec<String>>,

        /// Output format
        #[arg(short, long, value_enum)]
        format: OutputFormat,

        /// Output file, ending in .csv or .xlsx to match the format
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,
    },

    /// Export every table of the database
    DumpDb {
        /// Output format
        #[arg(short, long, value_enum)]
        format: OutputFormat,

        /// Output file, ending in .csv or .xlsx to match the format
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,
    },

    /// List the available display languages
    ListLanguages,

    /// Generate shell completions for glucolog
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// glucolog - export a GlucoLog backup database
///
/// Lists and exports the tables of a GlucoLog SQLite backup as CSV or as an
/// Excel workbook, optionally translating table names, column names and
/// categorical values.
#[derive(Parser, Debug)]
#[command(name = "glucolog")]
#[command(version)]
#[command(about = "Tool to extract information from a GlucoLog back-up database")]
#[command(long_about = "Tool to extract information from a GlucoLog back-up database.

EXAMPLES:
    glucolog backup.db list-tables                         # Tables in the backup
    glucolog -x en backup.db list-columns -t t_results     # Columns, in English
    glucolog backup.db export-table -t t_risultati -f csv out.csv
    glucolog -x en backup.db export-table -t t_results -c date,time,result -f excel out.xlsx
    glucolog -vv -d backup.db dump-db -f excel backup.xlsx # Everything, verbose
    glucolog list-languages                                # Available translations
    glucolog completions bash > glucolog.bash              # Generate bash completions

LANGUAGES:
    Translations are read from <code>.json files in the language directory
    (--lang-dir or GLUCOLOG_LANG_DIR, default: the languages/ directory
    shipped with glucolog).")]
struct Cli {
    /// Make the program more verbose (repeat for more)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Add debugging information to the log file (repeat for more)
    #[arg(short, long, action = ArgAction::Count)]
    debug: u8,

    /// Log file name
    #[arg(short, long, default_value = DEFAULT_LOGFILE)]
    logfile: PathBuf,

    /// Translate names and values into this language (ISO 639-1 code)
    #[arg(short = 'x', long = "xlat", value_name = "LANG")]
    language: Option<String>,

    /// Directory holding the language files
    #[arg(long, env = "GLUCOLOG_LANG_DIR", value_name = "DIR")]
    lang_dir: Option<PathBuf>,

    /// GlucoLog backup database
    #[arg(value_name = "DATABASE")]
    database: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn config(&self) -> Config {
        Config {
            verbose: self.verbose,
            debug: self.debug,
            logfile: Some(self.logfile.clone()),
            language: self.language.clone(),
            lang_dir: self.lang_dir.clone().unwrap_or_else(default_lang_dir),
        }
    }

    /// Output file and format of an exporting command
    fn output(&self) -> Option<(OutputFormat, &Path)> {
        match &self.command {
            Commands::ExportTable { format, output, .. } | Commands::DumpDb { format, output } => {
                Some((*format, output.as_path()))
            }
            _ => None,
        }
    }
}

/// Everything one command needs to reach the data
struct Session {
    source: SqliteSource,
    registry: ReformatRegistry,
    translator: Translator,
}

impl Session {
    fn open(database: Option<&Path>, catalog: &LanguageCatalog, config: &Config) -> Result<Self, AppError> {
        let database = database
            .ok_or_else(|| AppError::Usage("A DATABASE file is required for this command".to_string()))?;

        let translator = Translator::from_catalog(catalog, config.language.as_deref())?;
        let source = SqliteSource::open(database)?;
        info!("Opened database '{}'", source.path().display());

        Ok(Self {
            source,
            registry: ReformatRegistry::glucolog(),
            translator,
        })
    }

    fn exporter(&self) -> Exporter<'_, SqliteSource> {
        Exporter::new(&self.source, &self.registry, &self.translator)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Commands::Completions { shell } = cli.command {
        let mut cmd = Cli::command();
        generate(shell, &mut cmd, "glucolog", &mut std::io::stdout());
        return ExitCode::SUCCESS;
    }

    // Format/suffix mismatch is a usage error, reported before any I/O
    if let Some((format, output)) = cli.output() {
        if let Err(e) = format.check_path(output) {
            Cli::command().error(ErrorKind::ValueValidation, e).exit();
        }
    }

    let config = cli.config();
    if let Err(e) = DualLogger::init(&config.log_settings()) {
        eprintln!("{}", e);
        return ExitCode::from(EXIT_FAILURE);
    }
    debug!("Configuration: {:?}", config);

    match run(cli, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            log::logger().flush();
            ExitCode::from(e.exit_code())
        }
    }
}

fn run(cli: Cli, config: &Config) -> Result<(), AppError> {
    config
        .validate()
        .map_err(|e| AppError::Usage(format!("{:#}", e)))?;

    let catalog = LanguageCatalog::new(&config.lang_dir);

    match cli.command {
        Commands::ListLanguages => list_languages(&catalog),
        Commands::Completions { .. } => Ok(()),
        Commands::ListTables => {
            let session = Session::open(cli.database.as_deref(), &catalog, config)?;
            let tables = session.exporter().list_tables()?;
            print_listing("Tables found", &tables)
        }
        Commands::ListColumns { table } => {
            let session = Session::open(cli.database.as_deref(), &catalog, config)?;
            let columns = session.exporter().list_columns(&table)?;
            print_listing(&format!("Columns found in '{}'", table), &columns)
        }
        Commands::ExportTable {
            table,
            columns,
            format,
            output,
        } => {
            let session = Session::open(cli.database.as_deref(), &catalog, config)?;
            let summary = session
                .exporter()
                .export_table_to(format, &output, &table, columns.as_deref())?;
            report(&summary, &output);
            Ok(())
        }
        Commands::DumpDb { format, output } => {
            let session = Session::open(cli.database.as_deref(), &catalog, config)?;
            let summary = session.exporter().dump_database_to(format, &output)?;
            report(&summary, &output);
            Ok(())
        }
    }
}

fn list_languages(catalog: &LanguageCatalog) -> Result<(), AppError> {
    let lines: Vec<String> = catalog
        .available()?
        .into_iter()
        .map(|code| {
            let name = get_language_name(&code).unwrap_or_default();
            match get_local_name(&code) {
                Some(local) if local != name => format!("{}  {} ({})", code, name, local),
                _ => format!("{}  {}", code, name),
            }
        })
        .collect();
    print_listing("Languages found", &lines)
}

/// Heading, underline, one entry per line
fn print_listing(heading: &str, entries: &[String]) -> Result<(), AppError> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "{}", heading)?;
    writeln!(out, "{}", "=".repeat(heading.chars().count()))?;
    for entry in entries {
        writeln!(out, "{}", entry)?;
    }
    out.flush()?;
    Ok(())
}

fn report(summary: &ExportSummary, output: &Path) {
    info!(
        "Wrote {} section(s), {} row(s) to '{}'",
        summary.sections,
        summary.rows,
        output.display()
    );
    if summary.gaps > 0 {
        warn!("{} translation(s) were missing; see the log for details", summary.gaps);
    }
}
