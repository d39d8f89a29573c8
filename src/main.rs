//! INGRES Query Engine Entry Point

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use ingres::{create_rest_router, ApiState, Config, QueryProcessor};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod cli;

/// INGRES: natural language queries over groundwater assessment data
#[derive(Parser, Debug)]
#[command(name = "ingres")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Answer a natural language query
    Query {
        /// Query text
        query: String,
    },
    /// Show the intent a query classifies as
    Classify {
        /// Query text
        query: String,
    },
    /// Show the entities extracted from a query
    Entities {
        /// Query text
        query: String,
    },
    /// List known states, districts and blocks
    Catalog,
    /// Show assessment coverage statistics
    Stats,
    /// Create an empty assessment database
    InitDb {
        /// Database path (defaults to the configured path)
        #[arg(short, long)]
        path: Option<PathBuf>,
    },
    /// Run the REST API server (default behavior)
    Serve {
        /// HTTP port. If not specified, uses config file value.
        #[arg(short, long)]
        port: Option<u16>,
        /// Enable JSON logging format
        #[arg(long)]
        json_logs: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    match &args.command {
        Some(Command::Serve { json_logs, .. }) => init_server_tracing(*json_logs),
        None => init_server_tracing(false),
        Some(_) => {
            // Minimal logging for CLI commands
            tracing_subscriber::fmt()
                .with_max_level(tracing::Level::WARN)
                .with_writer(std::io::stderr)
                .init();
        }
    }

    let config = if let Some(path) = &args.config {
        Config::from_file(path)?
    } else {
        Config::load()?
    };

    match args.command {
        Some(Command::Query { query }) => cli::run_query(&config, query, args.json),
        Some(Command::Classify { query }) => cli::run_classify(&config, query, args.json),
        Some(Command::Entities { query }) => cli::run_entities(&config, query, args.json),
        Some(Command::Catalog) => cli::run_catalog(&config, args.json),
        Some(Command::Stats) => cli::run_stats(&config, args.json),
        Some(Command::InitDb { path }) => cli::run_init_db(&config, path, args.json),
        Some(Command::Serve { port, .. }) => run_api_server(config, port).await,
        None => run_api_server(config, None).await,
    }
}

/// Install the server subscriber: `EnvFilter` (default `info`), optionally JSON.
fn init_server_tracing(json_logs: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

/// Run the REST API server.
async fn run_api_server(mut config: Config, port: Option<u16>) -> anyhow::Result<()> {
    tracing::info!("Starting INGRES Query API v{}", env!("CARGO_PKG_VERSION"));

    if let Some(p) = port {
        config.server.port = p;
    }

    let database_path = config.database_path();
    if !database_path.exists() {
        tracing::warn!(
            path = %database_path.display(),
            "Assessment database not found; store-backed queries will fail until it exists"
        );
    }

    tracing::info!(
        database = %database_path.display(),
        assessment_year = config.resolver.assessment_year,
        "Configuration loaded"
    );

    let state = ApiState::new(Arc::new(QueryProcessor::from_config(&config)));
    let router = create_rest_router(state, &config.server);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on http://{}{}", addr, config.server.prefix);

    axum::serve(listener, router).await?;

    Ok(())
}
