mod check;
mod cli;
mod config;
mod error;
mod filter;
mod fold;
mod github;
mod ledger;
mod model;

use std::{io, process};

use tracing_subscriber::EnvFilter;

fn main() {
    let filter = EnvFilter::try_from_env(config::LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(config::DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    if let Err(e) = cli::run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
