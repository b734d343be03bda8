//! Taskly - task-list API with GraphQL sign-up / sign-in
//!
//! Serves the GraphQL endpoint backed by a SQL or in-memory user store.

mod config;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::sync::Arc;
use taskly_api::ApiServerConfig;
use taskly_store::{InMemoryUserStore, SeaOrmUserStore, UserStore};
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use config::{ServeArgs, StoreTarget};

/// Taskly - task lists over GraphQL
#[derive(Parser, Debug)]
#[command(name = "taskly")]
#[command(about = "Taskly GraphQL API server", long_about = None)]
#[command(version = env!("GIT_TAG"))]
#[command(long_version = concat!(env!("GIT_TAG"), "\nCommit: ", env!("GIT_HASH"), "\nBuilt: ", env!("BUILD_TIME")))]
struct Cli {
    /// Log level (RUST_LOG takes precedence)
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the GraphQL API server
    #[command(long_about = r#"
Run the GraphQL API server.

EXAMPLES:
  # Local development with SQLite
  taskly serve --jwt-secret dev-secret --cors

  # PostgreSQL, database selected by name
  DB_URI=postgres://taskly:pw@localhost:5432 DB_NAME=taskly \
    JWT_SECRET=... taskly serve --bind 0.0.0.0:4000

ENVIRONMENT VARIABLES:
  DB_URI       Database URL, or "memory"
  DB_NAME      Database name for server URLs
  JWT_SECRET   Session token signing secret
  TASKLY_BIND  Address to bind
  TASKLY_CORS  Allow localhost cross-origin requests
    "#)]
    Serve(ServeArgs),

    /// Print the GraphQL schema (SDL)
    Schema,
}

fn setup_logging(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_thread_ids(false))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve(args) => {
            setup_logging(&cli.log_level);
            serve(args).await
        }
        Commands::Schema => {
            println!("{}", taskly_api::schema_sdl());
            Ok(())
        }
    }
}

async fn serve(args: ServeArgs) -> Result<()> {
    let settings = args.into_settings()?;

    let store: Arc<dyn UserStore> = match &settings.store {
        StoreTarget::Memory => {
            warn!("Using in-memory user store, registrations are lost on exit");
            Arc::new(InMemoryUserStore::new())
        }
        StoreTarget::Database(url) => {
            let db = taskly_store::connect(url)
                .await
                .context("Failed to connect to database")?;
            taskly_store::migrate(&db)
                .await
                .context("Failed to run database migrations")?;
            Arc::new(SeaOrmUserStore::new(db))
        }
    };

    info!("Taskly {} starting", env!("CARGO_PKG_VERSION"));

    let config = ApiServerConfig {
        bind_addr: settings.bind_addr,
        enable_cors: settings.enable_cors,
        jwt_secret: settings.jwt_secret,
    };

    taskly_api::run_api_server(config, store).await
}
