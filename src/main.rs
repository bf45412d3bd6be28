use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use m3u_channels::{
    config::Config,
    descriptor::{DecodedDescriptor, decode_descriptor},
    drm::DrmSession,
    ingestor::PlaylistIngestor,
    sources::HttpPlaylistFetcher,
};

#[derive(Parser)]
#[command(name = "m3u-channels")]
#[command(version)]
#[command(about = "Parse M3U and JSON IPTV playlists into catalog channel entries")]
#[command(long_about = None)]
struct Cli {
    /// Playlist URL, local file path, or literal playlist content
    #[arg(required_unless_present_any = ["decode", "print_config"])]
    source: Option<String>,

    /// Configuration file path
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Category id attached to every entry
    #[arg(long, default_value = "default")]
    category_id: String,

    /// Category name attached to every entry
    #[arg(long, default_value = "Default")]
    category_name: String,

    /// Log level
    #[arg(short = 'v', long, default_value = "info")]
    log_level: String,

    /// Print skipped entries and other parse issues to stderr
    #[arg(long)]
    report: bool,

    /// Decode a stored channel descriptor instead of loading a playlist
    #[arg(long, value_name = "DESCRIPTOR", conflicts_with = "source")]
    decode: Option<String>,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    print_config: bool,
}

#[derive(Serialize)]
struct DecodeOutput {
    #[serde(flatten)]
    descriptor: DecodedDescriptor,
    #[serde(skip_serializing_if = "Option::is_none")]
    drm_session: Option<DrmSession>,
    #[serde(skip_serializing_if = "Option::is_none")]
    drm_error: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays valid JSON
    let log_filter = format!("m3u_channels={}", cli.log_level);
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;

    if cli.print_config {
        print!("{}", config.to_toml_string()?);
        return Ok(());
    }

    if let Some(descriptor) = cli.decode.as_deref() {
        let decoded = decode_descriptor(descriptor);
        let (drm_session, drm_error) = match decoded.drm_session() {
            Ok(session) => (session, None),
            Err(e) => {
                warn!("Descriptor DRM settings are unusable: {}", e);
                (None, Some(e.to_string()))
            }
        };
        let output = DecodeOutput {
            descriptor: decoded,
            drm_session,
            drm_error,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    let source = cli
        .source
        .context("A playlist source is required")?;
    let source = read_source(source).await?;

    info!("Starting m3u-channels v{}", env!("CARGO_PKG_VERSION"));
    let fetcher = HttpPlaylistFetcher::new(&config.fetch)?;
    let ingestor = PlaylistIngestor::new(fetcher, config.catalog.clone());

    let report = ingestor.load(&source).await;
    if cli.report {
        for issue in &report.issues {
            eprintln!("{issue}");
        }
    }

    let entries = ingestor.convert_to_entries(&report.channels, &cli.category_id, &cli.category_name);
    println!("{}", serde_json::to_string_pretty(&entries)?);
    Ok(())
}

/// Local files are read here; URLs and literal content pass through.
async fn read_source(source: String) -> Result<String> {
    let path = PathBuf::from(&source);
    if source.len() < 4096 && !source.contains('\n') && path.is_file() {
        info!("Reading playlist from file {}", path.display());
        return tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()));
    }
    Ok(source)
}
