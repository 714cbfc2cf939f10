//! Stratum CLI - tiered backup rotation from the command line.

use clap::Parser;
use stratum_cli::{commands, config, Cli, Command, Formatter};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Log to stderr so table and JSON output stay clean on stdout
fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}

fn run(cli: Cli) -> stratum_cli::Result<()> {
    let path = config::resolve_path(cli.config)?;
    let retention = config::load(&path)?;

    let format = cli.format.map(Into::into).unwrap_or_default();
    let formatter = Formatter::new(format, !cli.no_color);

    match cli.command {
        Command::Check => commands::execute_check(&path, &retention, &formatter),
        Command::Plan(args) => commands::execute_plan(args, retention, &formatter),
        Command::Rotate(args) => commands::execute_rotate(args, retention, &formatter),
        Command::Purge(args) => commands::execute_purge(args, retention, &formatter),
    }
}
