//! Outlet sales prediction service entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use metrics_exporter_prometheus::PrometheusBuilder;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use outlet_sales_api::api::{create_router, AppState};
use outlet_sales_api::artifacts::ArtifactStore;
use outlet_sales_api::config::Config;
use outlet_sales_api::encoding::CATEGORICAL_FEATURES;
use outlet_sales_api::metrics;
use outlet_sales_api::model::Predictor;
use outlet_sales_api::utils::shutdown_signal;

/// Outlet sales prediction service.
#[derive(Parser, Debug)]
#[command(name = "outlet-sales-api")]
#[command(about = "HTTP serving layer for a pre-trained outlet sales regression model")]
#[command(version)]
struct Args {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,

    /// HTTP server port (overrides PORT from the environment).
    #[arg(short, long)]
    port: Option<u16>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP server (default).
    Serve {
        /// HTTP server port (overrides PORT from the environment).
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Load both artifacts and print what they contain.
    CheckArtifacts,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Load configuration
    let config = Config::load()?;

    // Initialize logging
    let filter = if args.verbose || config.debug {
        EnvFilter::new("outlet_sales_api=debug,info")
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(config.rust_log.clone()))
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    // Initialize metrics
    metrics::init_metrics();

    match args.command {
        Some(Command::CheckArtifacts) => cmd_check_artifacts(&config).await,
        Some(Command::Serve { port }) => cmd_serve(&config, port.or(args.port)).await,
        None => cmd_serve(&config, args.port).await,
    }
}

/// Run the HTTP server.
async fn cmd_serve(config: &Config, port_override: Option<u16>) -> anyhow::Result<()> {
    if let Err(e) = config.validate() {
        return Err(anyhow::anyhow!("Configuration validation failed: {}", e));
    }

    let port = port_override.unwrap_or(config.port);

    // Install the Prometheus recorder for the /metrics endpoint.
    let prometheus = PrometheusBuilder::new().install_recorder()?;

    // Create the artifact store and try an eager first load; artifacts that
    // are still missing get retried on each request.
    let store = Arc::new(ArtifactStore::new(config));
    store.ensure_loaded().await?;

    if !store.model_loaded().await {
        warn!(
            path = %config.model_path.display(),
            "model artifact not found; /predict will return 503 until it appears"
        );
    }
    if !store.encoders_loaded().await {
        warn!(
            path = %config.encoders_path.display(),
            "encoder artifact not found; /predict will return 503 until it appears"
        );
    }

    let state = AppState::new(store).with_prometheus(prometheus);
    let router = create_router(state).layer(TraceLayer::new_for_http());

    // Start HTTP server
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;
    info!("HTTP server listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}

/// Load both artifacts and print what they contain.
async fn cmd_check_artifacts(config: &Config) -> anyhow::Result<()> {
    println!("======================================================================");
    println!("OUTLET SALES API - ARTIFACT CHECK");
    println!("======================================================================");

    let store = Arc::new(ArtifactStore::new(config));

    print!("Loading artifacts... ");
    match store.ensure_loaded().await {
        Ok(()) => println!("OK"),
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Artifact load failed"));
        }
    }

    println!("----------------------------------------------------------------------");

    match store.model().await {
        Some(model) => {
            println!("Model: loaded from {}", config.model_path.display());
            println!("  Input features: {}", model.n_features());
            println!("  Trees: {}", model.trees.len());
        }
        None => {
            println!("Model: NOT FOUND at {}", config.model_path.display());
        }
    }

    match store.encoders().await {
        Some(encoders) => {
            println!("Encoders: loaded from {}", config.encoders_path.display());
            for feature in CATEGORICAL_FEATURES {
                match encoders.get(feature) {
                    Some(encoder) => {
                        println!(
                            "  {}: {} labels {:?}",
                            feature,
                            encoder.vocabulary_size(),
                            encoder.labels()
                        );
                    }
                    None => println!("  {}: MISSING", feature),
                }
            }
        }
        None => {
            println!("Encoders: NOT FOUND at {}", config.encoders_path.display());
        }
    }

    println!("======================================================================");
    Ok(())
}
