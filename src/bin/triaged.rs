//! triaged: disaster-triage HTTP daemon.
//!
//! Serves the classification pipeline as `POST /api/classify` and
//! `GET /health`.

use clap::Parser;
use tracing::info;

use disaster_triage::server;
use disaster_triage::server::config::{Config, Secrets};

/// Disaster-relevance classification service.
#[derive(Parser)]
#[command(name = "triaged")]
#[command(version = disaster_triage::PKG_VERSION)]
#[command(about = "Disaster-relevance classification daemon")]
struct Args {
    /// Path to configuration file.
    #[arg(short, long)]
    config: Option<std::path::PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialise tracing (default: info for the daemon; override with RUST_LOG).
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    // Load configuration; refuse to start without a provider key
    let config = Config::load(args.config.as_deref())?;
    let secrets = Secrets::load()?;
    let api_key = secrets.require_api_key()?;

    let pipeline = config.build_pipeline(api_key)?;
    let addr = config.listen_address(std::env::var("PORT").ok().as_deref())?;

    info!(
        version = disaster_triage::version_string(),
        %addr,
        model = %config.provider.model,
        fusion_rule = %pipeline.fusion_rule(),
        "triaged starting"
    );

    let listener = server::bind(addr).await?;
    server::serve(listener, pipeline, &config.server).await?;

    info!("triaged stopped");
    Ok(())
}
