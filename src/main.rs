use clap::Parser;
use tracing_subscriber::EnvFilter;

use rotamatch::cli;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(error) = cli::run(cli::Cli::parse()) {
        eprintln!("{error}");
        std::process::exit(1);
    }
}
