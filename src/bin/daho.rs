//! daho - weighted multi-pattern counting from the command line

use clap::Parser;
use colored::Colorize;
use std::io;
use std::process;

use daho::cli::{commands, Cli};

fn main() {
    tracing_subscriber::FmtSubscriber::builder()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();
    let result = commands::execute(cli.command, cli.bucket_count, stdin.lock(), &mut stdout);

    if let Err(e) = result {
        eprintln!("{}: {:#}", "Error".red().bold(), e);
        process::exit(1);
    }
}
