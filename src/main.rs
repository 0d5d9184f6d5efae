mod api;
mod cli;
mod db;
mod models;
mod services;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "courtside")]
#[command(about = "NBA standings backend: reconciles database, feed, and seed data")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server
    Serve {
        #[arg(short, long, default_value = "3000")]
        port: u16,
    },
    /// Pull a fresh snapshot from the external standings feed
    Fetch,
    /// Print the merged standings table
    Standings,
    /// Seed demo data for offline development
    Seed,
    /// Initialize the database
    InitDb,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load environment variables
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Serve { port }) => {
            tracing::info!("Starting Courtside API server on port {}", port);
            api::serve(port).await?;
        }
        Some(Commands::Fetch) => {
            cli::fetch_feed().await?;
        }
        Some(Commands::Standings) => {
            cli::show_standings().await?;
        }
        Some(Commands::Seed) => {
            cli::seed().await?;
        }
        Some(Commands::InitDb) => {
            tracing::info!("Initializing database...");
            db::init_database().await?;
        }
        None => {
            // Default to serving
            tracing::info!("Starting Courtside API server on port 3000");
            api::serve(3000).await?;
        }
    }

    Ok(())
}
