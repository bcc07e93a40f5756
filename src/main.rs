use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use nav_shell::bootstrap::InitState;
use nav_shell::commands::{BootOptions, boot_command, breadcrumbs_command, replay_command, routes_command};
use std::path::Path;

mod cli;

use cli::{Cli, Commands};

fn init_logging(path: &Path) -> Result<()> {
    // Truncate on each run
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)
        .with_context(|| format!("Failed to open log file: {:?}", path))?;
    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_file)?;
    info!("Starting nav-shell");

    match cli.command {
        Commands::Routes { json } => routes_command(cli.language, json),
        Commands::Breadcrumbs { path } => breadcrumbs_command(cli.language, &path),
        Commands::Replay { steps } => replay_command(cli.language, &steps),
        Commands::Boot {
            in_memory,
            config,
            fail_sync,
            theme,
        } => {
            let report = boot_command(BootOptions {
                in_memory,
                config,
                fail_sync,
                theme,
                language: cli.language,
            })
            .await?;
            if let InitState::Failed(failure) = report.state {
                anyhow::bail!("Startup failed: {}", failure);
            }
            Ok(())
        }
    }
}
