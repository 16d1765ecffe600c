//! autorun - Startup item manager for Windows
//!
//! Usage:
//!   autorun <command>     Run a command (see `autorun --help`)
//!   autorun --help        Show help

use std::fs::File;

use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::FmtSubscriber;

mod cli;

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();

    if args.is_empty() || args.iter().any(|a| a == "--help" || a == "-h") {
        cli::print_help();
        return Ok(());
    }

    init_logging();

    match cli::parse_args(&args) {
        Ok((command, options)) => cli::run(command, options),
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!();
            cli::print_help();
            std::process::exit(1);
        }
    }
}

fn init_logging() {
    let settings = autorun_core::Settings::load_default();
    if !settings.logs_enabled {
        return;
    }

    // One line per completed or failed operation, appended to a log file so
    // command output stays clean. If the file cannot be created, logging is
    // simply disabled (no subscriber set).
    if let Ok(log_file) = File::options().create(true).append(true).open("autorun.log") {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::INFO)
            .with_target(false)
            .with_ansi(false)
            .with_writer(log_file.with_max_level(Level::INFO))
            .finish();

        let _ = tracing::subscriber::set_global_default(subscriber);
    }
}
