mod actors;
mod config;
mod dialog;
mod engine;
mod ingest;
mod models;
mod normalize;
mod storage;
mod transport;
mod types;

use std::io::{stderr, stdout};
use std::path::Path;
use std::process::exit;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use tracing::info;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, Layer};

use crate::config::Config;
use crate::dialog::DialogController;
use crate::engine::Dispatcher;
use crate::ingest::{ingest_file, IngestMode};
use crate::storage::{JsonFileStorage, RecordStore, SessionStorage};
use crate::transport::ConsoleTransport;

const USAGE: &str = "Usage:
  lk-registry run [log_level]
  lk-registry import [path] [--replace:optional] [log_level:optional]
  lk-registry export [log_level:optional] > [output].csv
Available log levels: error, warn, info, debug, trace (default: info)";

#[tokio::main]
async fn main() -> Result<()> {
    //NOTE: Three subcommands with a couple of positional flags; revisit clap if options start taking values
    let args: Vec<String> = std::env::args().collect();

    let Some(command) = args.get(1) else {
        eprintln!("{USAGE}");
        exit(1);
    };

    match command.as_str() {
        "run" => {
            setup_logging(log_level(args.get(2)));
            run(Config::from_env()?).await
        }
        "import" => {
            let Some(path) = args.get(2) else {
                eprintln!("{USAGE}");
                exit(1);
            };

            let replace = args.iter().skip(3).any(|arg| arg == "--replace");
            let level = args.iter().skip(3).find(|arg| *arg != "--replace");
            setup_logging(log_level(level));

            let mode = if replace { IngestMode::Replace } else { IngestMode::Merge };
            import(Config::from_env()?, Path::new(path), mode)
        }
        "export" => {
            setup_logging(log_level(args.get(2)));
            export(Config::from_env()?)
        }
        _ => {
            eprintln!("{USAGE}");
            exit(1);
        }
    }
}

async fn run(config: Config) -> Result<()> {
    info!("Starting with token [{}] and store [{}]", config.masked_token(), config.data_file.display());

    let store = Arc::new(RecordStore::new(JsonFileStorage::new(config.data_file.clone())));
    let transport = Arc::new(ConsoleTransport::new());
    let source = transport.stdin_source();
    let controller = Arc::new(DialogController::new(store, transport));

    let dispatcher = Dispatcher::new(controller, Arc::new(SessionStorage::new()))
        .with_actor_capacity(config.actor_capacity)
        .with_idle_timeout(config.idle_timeout);

    let timer = Instant::now();
    let events = dispatcher.run(source).await?;
    let duration = timer.elapsed();

    info!("Handled {events} events in: {duration:?}");

    Ok(())
}

fn import(config: Config, path: &Path, mode: IngestMode) -> Result<()> {
    let store = RecordStore::new(JsonFileStorage::new(config.data_file));
    let report = ingest_file(&store, path, mode)?;

    for duplicate in &report.duplicates {
        info!("Duplicate skipped: [{}] ({})", duplicate.full_name, duplicate.phone);
    }

    println!("imported={} duplicates={} skipped={}", report.imported, report.duplicates.len(), report.skipped.len());

    Ok(())
}

fn export(config: Config) -> Result<()> {
    let store = RecordStore::new(JsonFileStorage::new(config.data_file));
    let mut writer = csv::Writer::from_writer(stdout().lock());

    writer.write_record(["id", "bank", "full_name", "phone", "card", "status", "remaining_funds"])?;

    for record in store.load()? {
        writer.write_record([
            record.id.as_str(),
            record.bank.as_str(),
            record.full_name.as_str(),
            record.phone.as_str(),
            record.card.as_str(),
            record.status.label(),
            record.remaining_funds.as_deref().unwrap_or_default()
        ])?;
    }

    writer.flush()?;

    Ok(())
}

fn log_level(arg: Option<&String>) -> LevelFilter {
    arg.map(|level| parse_log_level(level)).unwrap_or(LevelFilter::INFO)
}

fn parse_log_level(level: &str) -> LevelFilter {
    match level.to_lowercase().as_str() {
        "trace" => LevelFilter::TRACE,
        "debug" => LevelFilter::DEBUG,
        "info" => LevelFilter::INFO,
        "warn" => LevelFilter::WARN,
        "error" => LevelFilter::ERROR,
        _ => {
            eprintln!("Invalid log level '{}', defaulting to 'info'", level);
            LevelFilter::INFO
        }
    }
}

fn setup_logging(level: LevelFilter) {
    //NOTE: Replies and exports go to stdout, so logging has to use stderr
    let terminal_log = fmt::layer()
        .with_target(false)
        .with_writer(stderr)
        .with_filter(level);

    tracing_subscriber::registry()
        .with(terminal_log)
        .init();
}
