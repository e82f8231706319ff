//! Utility Hub CLI - seeding and connectivity tools.
//!
//! # Usage
//!
//! ```bash
//! # Seed the default product catalog (requires SUPABASE_SERVICE_KEY)
//! hub-cli seed products
//!
//! # Verify the hosted platform is reachable
//! hub-cli check
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "hub-cli")]
#[command(author, version, about = "Utility Hub CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Seed the hosted platform with default data
    Seed {
        #[command(subcommand)]
        target: SeedTarget,
    },
    /// Verify the hosted platform is reachable
    Check,
}

#[derive(Subcommand)]
enum SeedTarget {
    /// Insert the default product catalog
    Products,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Seed {
            target: SeedTarget::Products,
        } => commands::seed::products().await,
        Commands::Check => commands::check::run().await,
    };

    if let Err(e) = result {
        tracing::error!(error = %e, "command failed");
        std::process::exit(1);
    }
}
