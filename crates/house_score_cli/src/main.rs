//! Command-line entry point for the scoring core.
//!
//! # Responsibility
//! - Print live standings and CSV exports from a SQLite event store.
//! - Seed a store with the built-in sample events for demos.
//! - Start core logging when a log directory is given via `--log-dir` or
//!   `HOUSE_SCORE_LOG_DIR`.

use house_score_core::logging::init_logging_from_config;
use house_score_core::{
    core_version, sample_events, to_csv, AdminService, DashboardConfig, EventDraft, EventStore,
    SqliteEventStore, Standings,
};
use std::process::ExitCode;

const LOG_DIR_ENV: &str = "HOUSE_SCORE_LOG_DIR";

const USAGE: &str = "usage:
  house_score_cli [--log-dir <abs_dir>] standings <db_path> [config.json]
  house_score_cli [--log-dir <abs_dir>] export <db_path>
  house_score_cli [--log-dir <abs_dir>] seed <db_path>
  house_score_cli version";

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let args: Vec<&str> = args.iter().map(String::as_str).collect();

    let (log_dir, command) = match args.as_slice() {
        ["--log-dir", dir, rest @ ..] => (Some((*dir).to_string()), rest),
        rest => (std::env::var(LOG_DIR_ENV).ok(), rest),
    };

    let outcome = run(command, log_dir.as_deref());

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{message}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: &[&str], log_dir: Option<&str>) -> Result<(), String> {
    let config_path = match command {
        ["standings", _, config_path] => Some(*config_path),
        _ => None,
    };
    let config = match config_path {
        Some(path) => DashboardConfig::load(path).map_err(|err| err.to_string())?,
        None => DashboardConfig::default(),
    };
    if let Some(dir) = log_dir {
        init_logging_from_config(&config, dir)?;
    }

    match command {
        ["standings", db_path] | ["standings", db_path, _] => print_standings(db_path, &config),
        ["export", db_path] => export_csv(db_path),
        ["seed", db_path] => seed(db_path),
        ["version"] => {
            println!("house_score_core version={}", core_version());
            Ok(())
        }
        _ => Err(USAGE.to_string()),
    }
}

fn print_standings(db_path: &str, config: &DashboardConfig) -> Result<(), String> {
    let store = SqliteEventStore::open(db_path).map_err(|err| err.to_string())?;
    let events = store.snapshot().map_err(|err| err.to_string())?;
    let standings = Standings::from_events(&events, &config.known_houses());

    for entry in &standings.entries {
        println!("#{} {:<12} {:>5}", entry.rank, entry.house, entry.score);
    }
    println!("total={} events={}", standings.total_points, events.len());
    Ok(())
}

fn export_csv(db_path: &str) -> Result<(), String> {
    let store = SqliteEventStore::open(db_path).map_err(|err| err.to_string())?;
    let events = store.snapshot().map_err(|err| err.to_string())?;
    println!("{}", to_csv(&events));
    Ok(())
}

fn seed(db_path: &str) -> Result<(), String> {
    let store = SqliteEventStore::open(db_path).map_err(|err| err.to_string())?;
    let admin = AdminService::new(store);

    for event in sample_events() {
        let draft = EventDraft {
            name: event.name,
            date: Some(event.date),
            description: event.description,
            category: event.category,
            grade_level: event.grade_level,
            venue: event.venue,
            winners: event.winners,
        };
        let id = admin.add_event(draft).map_err(|err| err.to_string())?;
        println!("seeded event id={id}");
    }
    Ok(())
}
