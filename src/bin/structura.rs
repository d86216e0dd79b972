use std::process::ExitCode;

use clap::Parser;
use log::{debug, error, info};

use structura::cli::{self, Args};

fn main() -> ExitCode {
    let args = Args::parse();

    // Configuration decides where logs go, so it is loaded before the logger.
    let config = match cli::load_config(&args) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("structura: {err}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(err) = cli::init_logger(&args, &config) {
        eprintln!("structura: {err}");
        return ExitCode::FAILURE;
    }

    info!(level = config.logging.level.as_str(); "Starting structura");
    debug!(args:?; "Parsed arguments");

    match cli::run(&args, &config) {
        Ok(()) => {
            info!("Exiting");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(error:% = err; "structura failed");
            eprintln!("structura: {err}");
            ExitCode::FAILURE
        }
    }
}
