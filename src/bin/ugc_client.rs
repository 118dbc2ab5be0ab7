//! Command-line wizard: upload a photo, enhance it, wrap it in a UGC page,
//! then save both results. Talks to a running `fashion-ugc` server.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context};
use clap::Parser;
use reqwest::Client;
use serde::{de::DeserializeOwned, Serialize};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use fashion_ugc::data_uri;
use fashion_ugc::models::{EnhanceRequest, EnhanceResponse, ErrorBody, VideoRequest, VideoResponse};
use fashion_ugc::wizard::Wizard;

#[derive(Parser, Debug)]
#[command(name = "ugc-client")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Fashion photo to process (JPG, PNG, WebP)
    input: PathBuf,

    /// Base URL of the fashion-ugc server
    #[arg(long, short = 's', default_value = "http://localhost:8080")]
    server: String,

    /// Upscale factor (the browser UI offers 1 to 4)
    #[arg(long, default_value_t = 2.0)]
    upscale: f64,

    #[arg(long)]
    no_denoise: bool,

    #[arg(long)]
    no_colors: bool,

    /// tiktok, instagram or authentic
    #[arg(long, default_value = "tiktok")]
    style: String,

    /// Animation length in seconds
    #[arg(long, default_value_t = 15)]
    duration: u32,

    #[arg(long)]
    no_narration: bool,

    /// Where enhanced-image.png and ugc-video.html are written
    #[arg(long, short = 'o', default_value = ".")]
    out_dir: PathBuf,
}

async fn post<T: Serialize, R: DeserializeOwned>(client: &Client, url: &str, body: &T) -> anyhow::Result<R> {
    let response = client.post(url).json(body).send().await.with_context(|| format!("POST {url}"))?;
    let status = response.status();
    if !status.is_success() {
        let message = response
            .json::<ErrorBody>()
            .await
            .map(|e| e.error)
            .unwrap_or_else(|_| "no error body".to_string());
        bail!("{url} returned {status}: {message}");
    }
    Ok(response.json::<R>().await?)
}

async fn read_as_data_uri(path: &Path) -> anyhow::Result<String> {
    let format = image::ImageFormat::from_path(path)
        .map_err(|_| anyhow!("{} is not a recognised image file", path.display()))?;
    let bytes = tokio::fs::read(path).await.with_context(|| format!("reading {}", path.display()))?;
    Ok(data_uri::to_data_uri(format.to_mime_type(), &bytes))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();

    let args = Args::parse();
    let client = Client::new();
    let base = args.server.trim_end_matches('/');
    let mut wizard = Wizard::new();

    info!("📤 {}: {}", wizard.step(), args.input.display());
    wizard.image_uploaded(read_as_data_uri(&args.input).await?)?;

    info!("🎨 {}: x{} denoise={} colors={}", wizard.step(), args.upscale, !args.no_denoise, !args.no_colors);
    let enhanced: EnhanceResponse = post(
        &client,
        &format!("{base}/enhance"),
        &EnhanceRequest {
            image: wizard.uploaded_image().map(str::to_string),
            upscale_factor: args.upscale,
            denoise: !args.no_denoise,
            enhance_colors: !args.no_colors,
        },
    )
    .await?;
    info!(
        "✅ {}x{} -> {}x{}, detected: {}",
        enhanced.metadata.original_size.width, enhanced.metadata.original_size.height,
        enhanced.metadata.enhanced_size.width, enhanced.metadata.enhanced_size.height,
        enhanced.detected_items.join(", ")
    );
    wizard.image_enhanced(enhanced.enhanced_image, enhanced.detected_items)?;

    info!("🎬 {}: {} for {}s", wizard.step(), args.style, args.duration);
    let video: VideoResponse = post(
        &client,
        &format!("{base}/generate-video"),
        &VideoRequest {
            image: wizard.enhanced_image().map(str::to_string),
            detected_items: wizard.detected_items().to_vec(),
            duration: args.duration,
            style: args.style.clone(),
            add_narration: !args.no_narration,
        },
    )
    .await?;
    if !video.narration.is_empty() {
        info!("🗣️ Narration: {}", video.narration.replace("\n\n", " | "));
    }
    wizard.video_generated(video.video_url)?;

    tokio::fs::create_dir_all(&args.out_dir).await?;
    let outputs = [
        ("enhanced-image.png", wizard.enhanced_image()),
        ("ugc-video.html", wizard.generated_video()),
    ];
    for (name, uri) in outputs {
        let uri = uri.ok_or_else(|| anyhow!("missing {name} in wizard state"))?;
        let path = args.out_dir.join(name);
        tokio::fs::write(&path, data_uri::parse(uri)?.bytes).await?;
        info!("💾 {}: {}", wizard.step(), path.display());
    }
    Ok(())
}
