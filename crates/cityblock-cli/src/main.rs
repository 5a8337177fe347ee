//! `cityblock` entry point.

use std::{process, str::FromStr};

use clap::Parser;
use log::{Level, LevelFilter, debug, error, log_enabled};

use cityblock_cli::Args;

fn main() {
    let args = Args::parse();

    let log_level = LevelFilter::from_str(&args.log_level).unwrap_or_else(|_| {
        eprintln!(
            "Invalid log level: {}. Using 'warn' instead.",
            args.log_level
        );
        LevelFilter::Warn
    });

    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(log_level)
        .init();

    debug!("parsed arguments: {args:?}");

    if let Err(err) = cityblock_cli::run(&args) {
        let message = cityblock_cli::error_report(&err);
        // Failures are reported even with logging switched off.
        if log_enabled!(Level::Error) {
            error!("{message}");
        } else {
            eprintln!("error: {message}");
        }
        process::exit(1);
    }
}
