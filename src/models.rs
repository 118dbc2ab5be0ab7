use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DefaultOnNull};

fn default_upscale_factor() -> f64 { 1.0 }
fn default_duration() -> u32 { 15 }
fn default_style() -> String { "tiktok".to_string() }

#[serde_as]
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct EnhanceRequest {
    #[serde(default)]
    pub image: Option<String>, // data URI or bare base64
    /// `null` reads as 0, which skips the resize.
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default = "default_upscale_factor")]
    pub upscale_factor: f64,
    #[serde(default)]
    pub denoise: bool,
    #[serde(default)]
    pub enhance_colors: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EnhanceMetadata {
    pub original_size: ImageSize,
    pub enhanced_size: ImageSize,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct EnhanceResponse {
    pub enhanced_image: String,
    pub detected_items: Vec<String>,
    pub metadata: EnhanceMetadata,
}

#[serde_as]
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct VideoRequest {
    #[serde(default)]
    pub image: Option<String>,
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub detected_items: Vec<String>,
    #[serde(default = "default_duration")]
    pub duration: u32, // seconds
    #[serde(default = "default_style")]
    pub style: String,
    #[serde(default)]
    pub add_narration: bool,
}

/// Cosmetic animation choice for a video style.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct StyleEffects {
    pub transition: String,
    pub speed: String,
    pub filters: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct VideoMetadata {
    pub duration: u32,
    pub style: String,
    pub detected_items: Vec<String>,
    pub effects: StyleEffects,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct VideoResponse {
    pub video_url: String,
    pub narration: String,
    pub metadata: VideoMetadata,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ErrorBody {
    pub error: String,
}
