//! Command-line front end for the bullet journal.
//!
//! # Responsibility
//! - Resolve configuration, start logging and open the journal store.
//! - Expose store procedures as `journal call <procedure> [payload]`.
//! - Write full-data exports to disk.

mod api;
mod config;
mod export;

use crate::config::AppConfig;
use clap::{Parser, Subcommand};
use journal_core::JournalStore;
use log::{error, info};
use serde_json::Value;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "journal")]
#[command(about = "Bullet journal entries, collections and trackers", long_about = None)]
#[command(version)]
struct Cli {
    /// Journal database file (default: <data dir>/bullet-journal/journal.db)
    #[arg(long, global = true, env = "JOURNAL_DB_PATH")]
    db: Option<PathBuf>,

    /// Directory for rolling log files (absolute path)
    #[arg(long, global = true, env = "JOURNAL_LOG_DIR")]
    log_dir: Option<PathBuf>,

    /// trace|debug|info|warn|error
    #[arg(long, global = true, env = "JOURNAL_LOG_LEVEL")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Invoke one store procedure, e.g. `entries.list '{"month":"2024-01"}'`
    Call {
        procedure: String,
        /// JSON payload (default: null)
        payload: Option<String>,
    },
    /// Write all journal data to a JSON file
    Export {
        /// Output file (default: ./bullet-journal-export-YYYY-MM-DD.json)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// List available procedure names
    Procedures,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Command::Procedures = cli.command {
        for procedure in api::PROCEDURES {
            println!("{procedure}");
        }
        return ExitCode::SUCCESS;
    }

    let config = match AppConfig::resolve(cli.db, cli.log_dir, cli.log_level) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Error: {err}");
            return ExitCode::from(2);
        }
    };
    if let Err(err) = config.prepare_dirs() {
        eprintln!("Error: {err}");
        return ExitCode::from(2);
    }
    if let Err(err) = journal_core::init_logging(&config.log_level, &config.log_dir) {
        eprintln!("Warning: logging disabled: {err}");
    }

    let store = match JournalStore::open(&config.db_path) {
        Ok(store) => store,
        Err(err) => {
            error!("event=cli_start module=cli status=error error={err}");
            eprintln!("Error: cannot open `{}`: {err}", config.db_path.display());
            return ExitCode::from(2);
        }
    };

    let code = run(&store, cli.command);

    if let Err(err) = store.close() {
        eprintln!("Warning: {err}");
    }
    code
}

fn run(store: &JournalStore, command: Command) -> ExitCode {
    match command {
        Command::Call { procedure, payload } => {
            let payload = match payload.as_deref().map(serde_json::from_str::<Value>) {
                None => Value::Null,
                Some(Ok(value)) => value,
                Some(Err(err)) => {
                    eprintln!("Error: payload is not valid JSON: {err}");
                    return ExitCode::from(2);
                }
            };

            let response = api::handle(store, &procedure, payload);
            match serde_json::to_string_pretty(&response) {
                Ok(text) => println!("{text}"),
                Err(err) => {
                    eprintln!("Error: {err}");
                    return ExitCode::FAILURE;
                }
            }
            if response.ok {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Command::Export { out } => {
            let path = out.unwrap_or_else(|| {
                PathBuf::from(export::default_export_file_name(&chrono::Utc::now()))
            });
            let result = store
                .export_data()
                .map_err(|err| err.to_string())
                .and_then(|snapshot| {
                    export::write_snapshot(&snapshot, &path).map_err(|err| err.to_string())
                });
            match result {
                Ok(()) => {
                    info!(
                        "event=export_write module=cli status=ok path={}",
                        path.display()
                    );
                    println!("{}", path.display());
                    ExitCode::SUCCESS
                }
                Err(err) => {
                    error!("event=export_write module=cli status=error error={err}");
                    eprintln!("Error: export failed: {err}");
                    ExitCode::FAILURE
                }
            }
        }
        Command::Procedures => ExitCode::SUCCESS,
    }
}
