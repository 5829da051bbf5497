mod geocode;
mod listings;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::listings::ListingsCommands;

#[derive(Debug, Parser)]
#[command(name = "staybook-cli")]
#[command(about = "Staybook command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Resolve a location through the geocoding pipeline
    Geocode {
        /// Free-text location, e.g. "Paris, France"
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Inspect stored listings
    Listings {
        #[command(subcommand)]
        command: ListingsCommands,
    },
    /// Database maintenance
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
}

#[derive(Debug, Subcommand)]
enum DbCommands {
    /// Check that the database is reachable
    Ping,
    /// Apply pending migrations
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        println!("staybook-cli ready; run with --help to list commands");
        return Ok(());
    };

    let config = staybook_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match command {
        Commands::Geocode { query, json } => {
            geocode::run_geocode(&config, &query.join(" "), json).await?;
        }
        Commands::Listings { command } => {
            let pool = connect(&config).await?;
            listings::run_listings(&pool, command).await?;
        }
        Commands::Db { command } => {
            let pool = connect(&config).await?;
            match command {
                DbCommands::Ping => {
                    staybook_db::health_check(&pool).await?;
                    println!("database ok");
                }
                DbCommands::Migrate => {
                    let applied = staybook_db::run_migrations(&pool).await?;
                    println!("applied {applied} migration(s)");
                }
            }
        }
    }

    Ok(())
}

async fn connect(config: &staybook_core::AppConfig) -> anyhow::Result<sqlx::PgPool> {
    let pool_config = staybook_db::PoolConfig::from_app_config(config);
    let pool = staybook_db::connect_pool(config.require_database_url()?, pool_config).await?;
    Ok(pool)
}

#[cfg(test)]
mod tests;
