//! blogctl CLI - blog backend management
//!
//! This is the main entry point for the blogctl command-line tool:
//! - `serve` runs migrations and starts the HTTP API
//! - `migrate` runs migrations and exits
//! - `seed` resets the database to the demo dataset
//! - `clean` deletes all rows

use std::net::{IpAddr, SocketAddr};

use anyhow::{Context, Result};
use blogctl_core::BlogConfig;
use blogctl_server::db::{create_pool, migrations, seed, PgPool};
use blogctl_server::ServerConfig;
use clap::{Parser, Subcommand};
use tracing::info;

mod tracing_setup;

#[derive(Parser, Debug)]
#[command(
    name = "blogctl",
    author,
    version,
    about = "Blog backend: posts and categories over HTTP, backed by PostgreSQL"
)]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    /// PostgreSQL connection string (overrides config and DATABASE_URL)
    #[arg(long, global = true, value_name = "URL")]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run migrations and start the HTTP API server
    Serve(ServeArgs),
    /// Run database migrations and exit
    Migrate,
    /// Reset the database to the demo dataset
    Seed,
    /// Delete all rows from every blog table
    Clean,
}

#[derive(Parser, Debug)]
struct ServeArgs {
    /// Host to bind to (default from config, usually 127.0.0.1)
    #[arg(long)]
    host: Option<IpAddr>,

    /// Port to bind the HTTP server to (default from config, usually 4000)
    #[arg(long)]
    port: Option<u16>,

    /// Restrict CORS to localhost origins instead of allowing any
    #[arg(long)]
    strict_cors: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    tracing_setup::init(&tracing_setup::TracingConfig { debug: cli.debug })?;

    let mut config = BlogConfig::load()?;
    if let Some(url) = cli.database_url {
        config.database_url = Some(url);
    }

    match cli.command {
        Commands::Serve(args) => run_serve(&config, args).await,
        Commands::Migrate => {
            let pool = connect(&config).await?;
            migrations::run(&pool).await?;
            info!("migrations applied");
            Ok(())
        }
        Commands::Seed => {
            let pool = connect(&config).await?;
            migrations::run(&pool).await?;
            seed::seed(&pool).await?;
            info!("database seeded");
            Ok(())
        }
        Commands::Clean => {
            let pool = connect(&config).await?;
            migrations::run(&pool).await?;
            seed::clean(&pool).await?;
            info!("database cleaned");
            Ok(())
        }
    }
}

async fn connect(config: &BlogConfig) -> Result<PgPool> {
    let url = config.require_database_url()?;
    create_pool(url)
        .await
        .with_context(|| "failed to connect to database")
}

async fn run_serve(config: &BlogConfig, args: ServeArgs) -> Result<()> {
    let pool = connect(config).await?;
    migrations::run(&pool).await?;

    let bind_addr = SocketAddr::new(
        args.host.unwrap_or(config.server.host),
        args.port.unwrap_or(config.server.port),
    );

    let server_config = ServerConfig {
        bind_addr,
        cors_permissive: !args.strict_cors,
    };

    blogctl_server::run_server(pool, server_config)
        .await
        .context("server error")?;
    Ok(())
}
