//! Quote server for panel shipping bookings.
//!
//! Provides an HTTP API for pricing a pickup address and submitting bookings
//! against the configured metro zones.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    routing::{get, post},
    Router,
};
use clap::Parser;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use panelquote::config::{Config, ProviderKind};
use panelquote::PriceResolver;

mod handlers;

#[derive(Parser, Debug)]
#[command(name = "server")]
#[command(about = "Panel shipping quote server")]
struct Args {
    /// Listen address
    #[arg(short, long, default_value = "0.0.0.0:3000")]
    listen: String,

    /// TOML configuration file (built-in zones when omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Use the offline straight-line distance provider
    #[arg(long)]
    offline: bool,

    /// Distance matrix API key (overrides the configured environment variable)
    #[arg(long, env = "PANELQUOTE_API_KEY", hide_env_values = true)]
    api_key: Option<String>,
}

/// Application state shared across handlers
pub struct AppState {
    pub resolver: PriceResolver,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();

    info!("Panelquote Server");

    let mut config = match &args.config {
        Some(path) => {
            info!("Loading config from {}", path.display());
            Config::load_from_file(path)
                .with_context(|| format!("Failed to load {}", path.display()))?
        }
        None => Config::builtin(),
    };
    if args.offline {
        config.provider.kind = ProviderKind::StraightLine;
    }

    let resolver = config.build_resolver(args.api_key.as_deref())?;
    info!(
        "Pricing {} zones within {} km, provider {:?}",
        resolver.zones().len(),
        resolver.settings().zone_radius_km,
        config.provider.kind
    );

    let state = Arc::new(AppState { resolver });

    let app = router(state);

    info!("Starting server on {}", args.listen);

    let listener = tokio::net::TcpListener::bind(&args.listen).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/v1/zones", get(handlers::zones))
        .route("/v1/quote", get(handlers::quote))
        .route("/v1/bookings", post(handlers::create_booking))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
