mod catalog;
mod roll;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "datedice")]
#[command(about = "Roll a random date activity and find places for it nearby")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Roll activities around a position and list matching places.
    Roll {
        /// Latitude in degrees.
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        /// Longitude in degrees.
        #[arg(long, allow_negative_numbers = true)]
        lon: f64,
        /// Search radius in meters: 1000, 5000, 10000 or 20000.
        /// Defaults to `DATEDICE_DEFAULT_RADIUS_M`.
        #[arg(long)]
        radius: Option<u32>,
        /// Number of consecutive rerolls.
        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..=20))]
        rolls: u32,
        /// Print snapshots as JSON instead of a table.
        #[arg(long)]
        json: bool,
    },
    /// Show the activity catalog for the configured feature tier.
    Catalog {
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = datedice_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Roll {
            lat,
            lon,
            radius,
            rolls,
            json,
        } => {
            roll::run_roll(
                &config,
                roll::RollArgs {
                    lat,
                    lon,
                    radius,
                    rolls,
                    json,
                },
            )
            .await
        }
        Commands::Catalog { json } => catalog::run_catalog(&config, json),
    }
}

#[cfg(test)]
mod tests;
