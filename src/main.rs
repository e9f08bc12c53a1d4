use anyhow::Result;
use clap::{CommandFactory, Parser};
use std::io;
use std::process::ExitCode;

use rusty_reclaim::cli::{Cli, Command};
use rusty_reclaim::commands;
use rusty_reclaim::config::Config;

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbose, cli.quiet);

    match run(cli) {
        Ok(()) => ExitCode::from(commands::EXIT_OK),
        Err(err) => {
            eprintln!("Error: {:#}", err);
            ExitCode::from(commands::exit_code(&err))
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    // Load configuration
    let config = Config::load(cli.config.as_deref())?;

    tracing::debug!(?config, "Loaded configuration");

    // Dispatch to subcommand
    match cli.command {
        Command::Rules(args) => {
            tracing::info!(?args, "Listing rules");
            commands::rules::run(args, &config)?;
        }
        Command::Analyze(args) => {
            tracing::info!(?args, "Starting analysis");
            commands::analyze::run(args, &config, cli.quiet)?;
        }
        Command::Completions(args) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            clap_complete::generate(args.shell, &mut cmd, name, &mut io::stdout());
        }
        Command::Man => {
            let man = clap_mangen::Man::new(Cli::command());
            man.render(&mut io::stdout())?;
        }
    }

    Ok(())
}

fn init_logging(verbosity: u8, quiet: bool) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let level = if quiet {
        "warn"
    } else {
        match verbosity {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("rusty_reclaim={}", level)));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(io::stderr))
        .with(filter)
        .init();
}
