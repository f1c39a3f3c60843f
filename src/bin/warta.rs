//! warta: generate a share caption from the command line.
//!
//! Prints the resulting caption as JSON on stdout; logs go to stderr.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use warta::caption::validate_params;
use warta::{CaptionEngine, CaptionRequest, Config, ReportSharingData};

/// Warta caption generator
#[derive(Parser)]
#[command(name = "warta")]
#[command(version)]
#[command(about = "Generate a social-media caption for a road-damage report")]
struct Args {
    /// Path to configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Caption tone: formal, urgent, community, informative
    #[arg(short, long, default_value = "formal")]
    tone: String,

    /// Target platform: whatsapp, twitter, facebook, threads, telegram
    #[arg(short, long, default_value = "whatsapp")]
    platform: String,

    /// Skip the premium model
    #[arg(long)]
    free: bool,

    /// Extra instructions for the model
    #[arg(long)]
    instructions: Option<String>,

    /// Report id (used as the cache key)
    #[arg(long, default_value = "cli")]
    id: String,

    /// Damage category key, e.g. berlubang
    #[arg(long)]
    category: String,

    #[arg(long)]
    street: String,

    #[arg(long)]
    district: String,

    #[arg(long)]
    city: String,

    #[arg(long)]
    province: String,

    /// Report creation time (RFC 3339); defaults to now
    #[arg(long)]
    created_at: Option<DateTime<Utc>>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warta=info")),
        )
        .init();

    let args = Args::parse();

    let free_flag = if args.free { "true" } else { "false" };
    let params = validate_params(&args.tone, &args.platform, Some(free_flag))?;

    let config = Config::load(args.config.as_deref())?;
    let engine = CaptionEngine::builder().config(config).build()?;

    let report = ReportSharingData {
        id: args.id,
        category: args.category,
        street: args.street,
        district: args.district,
        city: args.city,
        province: args.province,
        created_at: args.created_at.unwrap_or_else(Utc::now),
        share_count: 0,
    };
    let mut request = CaptionRequest::new(report, params.tone, params.platform)
        .use_free_model(params.use_free_model);
    if let Some(instructions) = args.instructions {
        request = request.custom_instructions(instructions);
    }

    // Ctrl-C aborts the in-flight provider call instead of waiting it out.
    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupted");
            on_signal.cancel();
        }
    });

    let result = engine
        .generate_caption_with_cancel(&request, &cancel)
        .await?;
    println!("{}", serde_json::to_string_pretty(&result)?);

    Ok(())
}
