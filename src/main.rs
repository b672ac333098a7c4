use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
struct Args {
    /// The command to execute
    #[command(subcommand)]
    command: PageloomCommand,
}

#[derive(Parser)]
struct ServeArgs {
    /// The address to bind to
    #[arg(short, long, default_value = "0.0.0.0")]
    bind: String,

    /// The port to bind to
    #[arg(short, long, default_value = "3000")]
    port: u16,

    /// The path to the configuration file
    #[arg(short, long, default_value = "pageloom.yaml")]
    config_file: PathBuf,
}

#[derive(Parser)]
struct RoutesArgs {
    /// The path to the configuration file
    #[arg(short, long, default_value = "pageloom.yaml")]
    config_file: PathBuf,
}

#[derive(Subcommand)]
enum PageloomCommand {
    /// Serve the site on a local port
    Serve(ServeArgs),

    /// Print the resolved route manifest as JSON
    Routes(RoutesArgs),
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("pageloom=info,tower_http=info")),
        )
        .init();

    let args = Args::parse();

    match args.command {
        PageloomCommand::Serve(args) => {
            commands::serve::run(&args).await?;
        }
        PageloomCommand::Routes(args) => {
            commands::routes::run(&args).await?;
        }
    }

    Ok(())
}
