//! triage: one-shot disaster-relevance classification from the command line.
//!
//! Classifies a sentence and/or an image file directly against the
//! completion provider, without a running daemon.

use std::path::PathBuf;

use clap::Parser;
use serde_json::json;

use disaster_triage::{ClassificationPipeline, Dispatch, FusionRule, Label, Mode};

/// Disaster-relevance classifier CLI
#[derive(Parser)]
#[command(name = "triage")]
#[command(version = disaster_triage::PKG_VERSION)]
#[command(about = "Classify text and/or an image as disaster-informative")]
struct Args {
    /// Which modalities to classify: text, image or both
    #[arg(short, long, default_value = "both")]
    mode: Mode,

    /// Sentence to classify
    #[arg(short, long)]
    text: Option<String>,

    /// Path to an image file to classify
    #[arg(short, long)]
    image: Option<PathBuf>,

    /// Fusion rule: or, and
    #[arg(long, default_value = "or")]
    fusion_rule: FusionRule,

    /// Dispatch: concurrent, sequential
    #[arg(long, default_value = "concurrent")]
    dispatch: Dispatch,

    /// Model name
    #[arg(long, default_value = disaster_triage::types::DEFAULT_MODEL)]
    model: String,

    /// OpenAI-compatible base URL
    #[arg(long, default_value = disaster_triage::providers::openai::DEFAULT_BASE_URL)]
    base_url: String,

    /// Provider API key
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Print the JSON envelope instead of a summary
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialise tracing (default: warn for CLI; override with RUST_LOG).
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();

    let api_key = args
        .api_key
        .or_else(|| std::env::var("OPENAI__API_KEY").ok())
        .ok_or("no API key: pass --api-key or set OPENAI_API_KEY")?;

    let image = match &args.image {
        Some(path) => Some(
            tokio::fs::read(path)
                .await
                .map_err(|e| format!("failed to read image {}: {e}", path.display()))?,
        ),
        None => None,
    };

    if args.text.is_none() && image.is_none() {
        eprintln!("warning: no --text or --image given, result is always Not Informative");
    }

    let pipeline = ClassificationPipeline::builder()
        .openai(api_key)
        .base_url(args.base_url)
        .model(args.model)
        .fusion_rule(args.fusion_rule)
        .dispatch(args.dispatch)
        .build()?;

    let result = pipeline
        .run(args.mode, args.text.as_deref(), image.as_deref())
        .await?;

    if args.json {
        let envelope = json!({
            "success": true,
            "mode": args.mode,
            "results": result,
        });
        println!("{}", serde_json::to_string_pretty(&envelope)?);
    } else {
        println!("text:  {}", describe(result.text_label));
        println!("image: {}", describe(result.image_label));
        println!("final: {} ({})", result.final_label, args.fusion_rule);
    }

    Ok(())
}

fn describe(label: Option<Label>) -> String {
    label.map_or_else(|| "-".to_string(), |l| l.to_string())
}
