use std::path::Path;
use std::time::Duration;

use clap::Parser;
use smartdo::board::{LocalBoard, TaskBoard};
use smartdo::cli::commands::{Cli, Commands};
use smartdo::cli::handlers;
use smartdo::io::config_io;
use smartdo::io::file_store::FileStore;
use smartdo::io::session::SessionAuth;
use smartdo::logging;
use smartdo::model::config::Config;
use smartdo::remote::SyncedTaskList;

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let data_dir = config_io::resolve_data_dir(cli.data_dir.as_deref());
    let config = match config_io::read_config(&data_dir) {
        Ok(config) => config,
        // `init --force` is how a broken config gets replaced
        Err(_) if matches!(cli.command, Some(Commands::Init(_))) => Config::default(),
        Err(e) => return Err(e.into()),
    };
    let level = cli.log_level.as_deref().unwrap_or(&config.log.level);

    match cli.command {
        None => {
            // No subcommand → launch TUI
            logging::init_file(level, &data_dir, &config.log.file)?;
            let board = open_board(cli.local, &data_dir, &config)?;
            smartdo::tui::run(board, &config.ui)
        }
        Some(command) => {
            logging::init_stderr(level)?;
            handlers::dispatch(command, cli.json, &data_dir, &config)
        }
    }
}

fn open_board(
    local: bool,
    data_dir: &Path,
    config: &Config,
) -> Result<Box<dyn TaskBoard>, Box<dyn std::error::Error>> {
    if local {
        return Ok(Box::new(LocalBoard::new()));
    }
    let store = FileStore::open(&config_io::store_dir(data_dir))?
        .with_lock_timeout(Duration::from_millis(config.store.lock_timeout_ms));
    let auth = SessionAuth::open(data_dir);
    Ok(Box::new(SyncedTaskList::new(store, auth)))
}
