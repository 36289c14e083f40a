// ABOUTME: Entry point for the lxd-image CLI application.
// ABOUTME: Parses arguments, sets up tracing and dispatches to command handlers.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use lxd_image::config::{self, Config};
use lxd_image::error::Result;
use lxd_image::output::{Output, OutputMode};
use std::env;
use std::path::Path;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let mode = OutputMode::from_flags(cli.quiet, cli.json);

    if let Err(e) = run(cli, Output::new(mode)).await {
        Output::new(mode).error(&e.to_string());
        std::process::exit(1);
    }
}

async fn run(cli: Cli, output: Output) -> Result<()> {
    let cwd = env::current_dir()?;

    match cli.command {
        Commands::Init { force } => {
            config::init_config(&cwd, force)?;
            output.success(&format!("Wrote {}", config::CONFIG_FILENAME));
            Ok(())
        }
        Commands::Fetch {
            name,
            reference,
            instance,
        } => {
            let image = commands::parse_image(&name, &reference)?;
            let config = load_config(cli.config.as_deref(), &cwd)?;
            commands::fetch(&config, image, instance, output).await
        }
        Commands::Path { name, reference } => {
            let image = commands::parse_image(&name, &reference)?;
            let config = load_config(cli.config.as_deref(), &cwd)?;
            commands::path(&config, &image, &output)
        }
        Commands::Status => {
            let config = load_config(cli.config.as_deref(), &cwd)?;
            commands::status(&config, &output).await
        }
    }
}

fn load_config(explicit: Option<&Path>, cwd: &Path) -> Result<Config> {
    match explicit {
        Some(path) => Config::load(path),
        None => Config::discover(cwd),
    }
}
