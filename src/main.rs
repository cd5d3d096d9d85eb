use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use clap::Parser;
use folio::cli::commands::Cli;
use folio::cli::handlers;
use folio::io::config_io;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "FOLIO_LOG";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("error"))
}

/// CLI commands log to stderr so stdout stays parseable.
fn init_stderr_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .try_init();
}

/// The TUI owns the terminal, so its log goes to `folio.log` in the data dir.
fn init_file_logging(data_dir: &Path) {
    if std::fs::create_dir_all(data_dir).is_err() {
        return;
    }
    let Ok(file) = OpenOptions::new()
        .create(true)
        .append(true)
        .open(data_dir.join("folio.log"))
    else {
        return;
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init();
}

fn main() {
    let cli = Cli::parse();
    let data_dir = cli.data_dir.clone();

    let result = match cli.command {
        None => {
            // No subcommand → launch TUI
            let resolved = config_io::resolve_data_dir(data_dir.as_deref().map(Path::new));
            init_file_logging(&resolved);
            folio::tui::run(Some(&resolved))
        }
        Some(_) => {
            init_stderr_logging();
            handlers::dispatch(cli)
        }
    };

    if let Err(e) = result {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
