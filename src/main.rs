use clap::Parser;
use std::process;
use tracing_subscriber::EnvFilter;

use eso_processor::cli::{args::Args, commands};

fn main() {
    // Parse command line arguments
    let args = Args::parse();

    // Initialise logging; RUST_LOG overrides the verbosity flag
    let default_level = if args.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    if let Err(error) = commands::run(&args) {
        eprintln!("Error: {error}");
        process::exit(1);
    }
}
