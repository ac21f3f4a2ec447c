//! Command-line price lookup for a single pickup address.
//!
//! Prints the status line to stderr and the quote as JSON to stdout.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use panelquote::config::{Config, ProviderKind};

/// Exit code for a pickup that could not be priced
const EXIT_REJECTED: i32 = 2;

#[derive(Parser, Debug)]
#[command(name = "quote")]
#[command(about = "Price a panel pickup against the supported metro zones")]
struct Args {
    /// Pickup address, "lat,lon", or (offline) a landmark or zone name
    pickup: String,

    /// TOML configuration file (built-in zones when omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Use the offline straight-line distance provider
    #[arg(long)]
    offline: bool,

    /// Distance matrix API key (overrides the configured environment variable)
    #[arg(long, env = "PANELQUOTE_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Override the drop-off address
    #[arg(long)]
    drop_off: Option<String>,

    /// Override the zone radius in kilometers
    #[arg(long)]
    radius_km: Option<f64>,

    /// Skip the pickup to drop-off feasibility check
    #[arg(long)]
    skip_drop_off: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::load_from_file(path)
            .with_context(|| format!("Failed to load {}", path.display()))?,
        None => Config::builtin(),
    };

    if args.offline {
        config.provider.kind = ProviderKind::StraightLine;
    }
    if let Some(drop_off) = &args.drop_off {
        config.global.drop_off = drop_off.clone();
    }
    if let Some(radius_km) = args.radius_km {
        config.global.zone_radius_km = radius_km;
    }
    if args.skip_drop_off {
        config.global.check_drop_off = false;
    }
    config.validate()?;

    debug!("Resolved configuration: {:?}", config.global);

    let resolver = config.build_resolver(args.api_key.as_deref())?;
    let quote = resolver.resolve(&args.pickup).await;

    eprintln!("{}", quote.status_message());
    println!("{}", serde_json::to_string_pretty(&quote.view())?);

    if !quote.is_priced() {
        std::process::exit(EXIT_REJECTED);
    }

    Ok(())
}
