//! `kordict` command line entry point.
//!
//! # Responsibility
//! - Import a dictionary XML dump into a SQLite file.
//! - Print one stored headword with its hanja and senses.
//!
//! # Invariants
//! - Logging is initialized before any database work.
//! - Every failure exits with a non-zero status and a one-line message.

use clap::{Parser, Subcommand};
use kordict_core::{
    default_log_level, import_dictionary_file, init_logging, open_db, DictionaryRepository,
    ExceptionTable, ImportStats, RepoError, SqliteDictionaryRepository, WordId,
};
use log::{error, info};
use std::error::Error;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

type CliResult<T> = Result<T, Box<dyn Error>>;

const DEFAULT_LOG_DIR: &str = "logs";

/// Korean dictionary importer
#[derive(Parser, Debug)]
#[clap(name = "kordict", version)]
#[clap(about = "Import the Korean dictionary XML dump into SQLite")]
struct Args {
    /// Log level: trace|debug|info|warn|error
    #[clap(long, global = true, env = "KORDICT_LOG_LEVEL")]
    log_level: Option<String>,

    /// Directory for rotating log files (default: ./logs)
    #[clap(long, global = true, value_name = "DIR", env = "KORDICT_LOG_DIR")]
    log_dir: Option<PathBuf>,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Import every item of the XML dump
    Import {
        /// Dictionary XML dump
        #[clap(long, value_name = "FILE", env = "KORDICT_XML", default_value = "korean_dict.xml")]
        xml: PathBuf,

        /// Target SQLite database
        #[clap(long, value_name = "FILE", env = "KORDICT_DB", default_value = "kordict.sqlite3")]
        db: PathBuf,

        /// Versioned JSON word fixes replacing the built-in table
        #[clap(long, value_name = "FILE")]
        fixes: Option<PathBuf>,
    },
    /// Print a stored headword with its hanja and senses
    Show {
        word_id: WordId,

        #[clap(long, value_name = "FILE", env = "KORDICT_DB", default_value = "kordict.sqlite3")]
        db: PathBuf,
    },
}

fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(err) = setup_logging(args.log_level.as_deref(), args.log_dir.as_deref()) {
        eprintln!("kordict: {err}");
        return ExitCode::FAILURE;
    }

    let result = match args.command {
        Command::Import { xml, db, fixes } => run_import(&xml, &db, fixes.as_deref()),
        Command::Show { word_id, db } => run_show(word_id, &db),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=cli_exit module=cli status=error error={err}");
            eprintln!("kordict: {err}");
            ExitCode::FAILURE
        }
    }
}

fn setup_logging(level: Option<&str>, log_dir: Option<&Path>) -> CliResult<()> {
    let log_dir = resolve_log_dir(log_dir, &std::env::current_dir()?);
    let log_dir = log_dir
        .to_str()
        .ok_or_else(|| format!("log dir `{}` is not valid UTF-8", log_dir.display()))?;
    init_logging(level.unwrap_or(default_log_level()), log_dir)?;
    Ok(())
}

/// Absolute log directory: `log_dir` anchored at `cwd`, or `<cwd>/logs`.
fn resolve_log_dir(log_dir: Option<&Path>, cwd: &Path) -> PathBuf {
    match log_dir {
        Some(dir) if dir.is_absolute() => dir.to_path_buf(),
        Some(dir) => cwd.join(dir),
        None => cwd.join(DEFAULT_LOG_DIR),
    }
}

fn run_import(xml: &Path, db: &Path, fixes: Option<&Path>) -> CliResult<()> {
    let exceptions = match fixes {
        Some(path) => ExceptionTable::from_path(path)?,
        None => ExceptionTable::builtin()?,
    };
    info!(
        "event=cli_import module=cli status=start xml={} db={}",
        xml.display(),
        db.display()
    );

    let mut conn = open_db(db)?;
    let stats = import_dictionary_file(&mut conn, xml, exceptions)?;
    print_stats(&stats);
    Ok(())
}

fn print_stats(stats: &ImportStats) {
    println!("items        {}", stats.items);
    println!("words        {}", stats.words);
    println!("dropped      {}", stats.dropped);
    println!("senses       {}", stats.senses);
    println!("hanja usages {}", stats.hanja_usages);
    println!("new hanja    {}", stats.new_hanja);
    println!("categories   {}", stats.categories);
}

fn run_show(word_id: WordId, db: &Path) -> CliResult<()> {
    let conn = open_db(db)?;
    let repo = SqliteDictionaryRepository::new(&conn);
    let word = repo
        .get_word(word_id)?
        .ok_or_else(|| RepoError::NotFound(format!("word {word_id}")))?;

    println!(
        "{} {} [{} / {}]",
        word.id(),
        word.word(),
        word.unit().label(),
        word.word_type().label()
    );
    if !word.hanja().is_empty() {
        println!("  hanja: {}", word.hanja());
    }
    for hanja in repo.list_hanja_for_word(word_id)? {
        let shared = repo.list_words_for_hanja(hanja.letter())?.len();
        println!("  {} used by {shared} word(s)", hanja.letter());
    }
    for sense in repo.list_senses_for_word(word_id)? {
        println!("  {} ({}) {}", sense.id, sense.pos.label(), sense.definition);
        if !sense.categories.is_empty() {
            println!("      categories: {}", sense.categories.join(", "));
        }
        if !sense.definition_original.is_empty() {
            println!("      original: {}", sense.definition_original);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{resolve_log_dir, Args, Command};
    use clap::{CommandFactory, Parser};
    use std::path::{Path, PathBuf};

    #[test]
    fn command_definition_is_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn log_dir_defaults_to_logs_under_cwd() {
        let cwd = Path::new("/work/dict");
        assert_eq!(resolve_log_dir(None, cwd), PathBuf::from("/work/dict/logs"));
    }

    #[test]
    fn relative_log_dir_is_anchored_at_cwd() {
        let cwd = Path::new("/work/dict");
        assert_eq!(
            resolve_log_dir(Some(Path::new("out/logs")), cwd),
            PathBuf::from("/work/dict/out/logs")
        );
        assert_eq!(
            resolve_log_dir(Some(Path::new("/var/log/kordict")), cwd),
            PathBuf::from("/var/log/kordict")
        );
    }

    #[test]
    fn import_accepts_explicit_paths_and_global_flags() {
        let args = Args::try_parse_from([
            "kordict",
            "import",
            "--xml",
            "dump.xml",
            "--db",
            "out.sqlite3",
            "--fixes",
            "fixes.json",
            "--log-level",
            "warn",
        ])
        .unwrap();

        assert_eq!(args.log_level.as_deref(), Some("warn"));
        match args.command {
            Command::Import { xml, db, fixes } => {
                assert_eq!(xml, PathBuf::from("dump.xml"));
                assert_eq!(db, PathBuf::from("out.sqlite3"));
                assert_eq!(fixes, Some(PathBuf::from("fixes.json")));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn show_parses_word_id_and_rejects_non_numeric_ids() {
        let args =
            Args::try_parse_from(["kordict", "show", "99999999", "--db", "d.sqlite3"]).unwrap();
        match args.command {
            Command::Show { word_id, db } => {
                assert_eq!(word_id, 99_999_999);
                assert_eq!(db, PathBuf::from("d.sqlite3"));
            }
            other => panic!("unexpected command: {other:?}"),
        }

        assert!(Args::try_parse_from(["kordict", "show", "가나"]).is_err());
        assert!(Args::try_parse_from(["kordict"]).is_err());
    }
}
