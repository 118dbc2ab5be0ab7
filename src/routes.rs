use axum::{
    extract::{rejection::JsonRejection, DefaultBodyLimit, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use include_dir::{include_dir, Dir};
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use uuid::Uuid;

use crate::{
    data_uri,
    detection::detect_items,
    enhance::{enhance, EnhanceOptions, EnhancedImage},
    error::{AppError, ProcessingError},
    models::{EnhanceMetadata, EnhanceRequest, EnhanceResponse, VideoMetadata, VideoRequest, VideoResponse},
    video::{self, VideoStyle},
};

const ENHANCE_FAILED: &str = "Failed to enhance image";

static STATIC_DIR: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/static");

#[derive(Clone)]
pub struct AppState {
    /// Shared source for simulated detection and narration picks.
    pub rng: Arc<Mutex<StdRng>>,
}

impl AppState {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { rng: Arc::new(Mutex::new(rng)) }
    }
}

pub fn router(state: AppState, body_limit: usize) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/enhance", post(enhance_image))
        .route("/generate-video", post(generate_video))
        // legacy Next.js client paths
        .route("/api/enhance-image", post(enhance_image))
        .route("/api/generate-video", post(generate_video))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        )
        .with_state(state)
}

pub async fn index() -> Response {
    match STATIC_DIR.get_file("index.html").and_then(|f| f.contents_utf8()) {
        Some(page) => Html(page).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

pub async fn enhance_image(
    State(state): State<AppState>,
    payload: Result<Json<EnhanceRequest>, JsonRejection>,
) -> Result<Json<EnhanceResponse>, AppError> {
    let Json(body) = payload?;
    let image = body.image.filter(|s| !s.is_empty()).ok_or_else(AppError::missing_image)?;
    let request_id = Uuid::new_v4();
    let opts = EnhanceOptions {
        upscale_factor: body.upscale_factor,
        denoise: body.denoise,
        enhance_colors: body.enhance_colors,
    };

    info!(%request_id, "🎨 Enhancing image x{} denoise={} colors={}: {}", opts.upscale_factor, opts.denoise, opts.enhance_colors, data_uri::preview(&image));

    let enhanced = tokio::task::spawn_blocking(move || -> Result<EnhancedImage, ProcessingError> {
        let decoded = data_uri::parse(&image)?;
        enhance(&decoded.bytes, &opts)
    })
    .await
    .map_err(|e| AppError::processing(ENHANCE_FAILED, e))?
    .map_err(|e| AppError::processing(ENHANCE_FAILED, e))?;

    let detected_items = detect_items(&mut *state.rng.lock());

    info!(
        %request_id,
        "✅ Enhanced {}x{} -> {}x{}, detected: {}",
        enhanced.original_size.width, enhanced.original_size.height,
        enhanced.enhanced_size.width, enhanced.enhanced_size.height,
        detected_items.join(", ")
    );

    Ok(Json(EnhanceResponse {
        enhanced_image: data_uri::to_data_uri("image/png", &enhanced.png),
        detected_items,
        metadata: EnhanceMetadata {
            original_size: enhanced.original_size,
            enhanced_size: enhanced.enhanced_size,
        },
    }))
}

pub async fn generate_video(
    State(state): State<AppState>,
    payload: Result<Json<VideoRequest>, JsonRejection>,
) -> Result<Json<VideoResponse>, AppError> {
    let Json(body) = payload?;
    let image = body.image.as_deref().filter(|s| !s.is_empty()).ok_or_else(AppError::missing_image)?;
    let request_id = Uuid::new_v4();
    let style = VideoStyle::parse(&body.style);

    info!(%request_id, "🎬 Generating {}s '{}' video ({:?}), narration={}", body.duration, body.style, style, body.add_narration);

    let narration = if body.add_narration {
        video::narration(&mut *state.rng.lock(), style, &body.detected_items)
    } else {
        String::new()
    };
    let document = video::render_document(image, body.duration, style, &narration);
    let video_url = video::video_url(&document);

    info!(%request_id, "✅ Video page built: {}", data_uri::preview(&video_url));

    Ok(Json(VideoResponse {
        video_url,
        narration,
        metadata: VideoMetadata {
            duration: body.duration,
            style: body.style,
            detected_items: body.detected_items,
            effects: style.effects(),
            generated_at: Utc::now(),
        },
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enhance::encode_png;
    use axum::body::Body;
    use axum::http::{header, Request};
    use base64::Engine;
    use image::{DynamicImage, Rgba, RgbaImage};
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn app() -> Router {
        router(AppState::new(Some(11)), 25 * 1024 * 1024)
    }

    fn sample_image(width: u32, height: u32) -> String {
        let img = RgbaImage::from_pixel(width, height, Rgba([180, 90, 60, 255]));
        data_uri::to_data_uri("image/png", &encode_png(&DynamicImage::ImageRgba8(img)).unwrap())
    }

    async fn send(app: Router, uri: &str, body: Body) -> (StatusCode, Value) {
        let req = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(body)
            .expect("build request");
        let resp = app.oneshot(req).await.expect("call app");
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.expect("read body");
        (status, serde_json::from_slice(&bytes).expect("parse json"))
    }

    async fn post_json(uri: &str, body: Value) -> (StatusCode, Value) {
        send(app(), uri, Body::from(body.to_string())).await
    }

    #[tokio::test]
    async fn enhance_without_image_is_400() {
        let (status, body) = post_json("/enhance", json!({ "upscaleFactor": 2 })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "No image provided" }));

        let (status, _) = post_json("/enhance", json!({ "image": "" })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn malformed_body_is_400_with_error_field() {
        let (status, body) = send(app(), "/enhance", Body::from("{not json")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn undecodable_image_is_500_with_generic_message() {
        let garbage = data_uri::to_data_uri("image/png", b"not an image at all");
        let (status, body) = post_json("/enhance", json!({ "image": garbage })).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": "Failed to enhance image" }));
    }

    #[tokio::test]
    async fn enhance_upscales_and_detects() {
        let (status, body) = post_json(
            "/enhance",
            json!({ "image": sample_image(7, 5), "upscaleFactor": 3, "denoise": true, "enhanceColors": true }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["metadata"]["originalSize"], json!({ "width": 7, "height": 5 }));
        assert_eq!(body["metadata"]["enhancedSize"], json!({ "width": 21, "height": 15 }));

        let items = body["detectedItems"].as_array().unwrap();
        assert!((2..=4).contains(&items.len()));

        let uri = body["enhancedImage"].as_str().unwrap();
        assert!(uri.starts_with("data:image/png;base64,"));
        let decoded = image::load_from_memory(&data_uri::parse(uri).unwrap().bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (21, 15));
    }

    #[tokio::test]
    async fn enhance_with_defaults_keeps_size() {
        let (status, body) = post_json("/enhance", json!({ "image": sample_image(4, 6) })).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["metadata"]["originalSize"], body["metadata"]["enhancedSize"]);
    }

    #[tokio::test]
    async fn seeded_states_detect_the_same_items() {
        let image = sample_image(2, 2);
        let (_, a) = send(app(), "/enhance", Body::from(json!({ "image": image }).to_string())).await;
        let (_, b) = send(app(), "/enhance", Body::from(json!({ "image": image }).to_string())).await;
        assert_eq!(a["detectedItems"], b["detectedItems"]);
    }

    #[tokio::test]
    async fn video_without_image_is_400() {
        let (status, body) = post_json("/generate-video", json!({ "style": "tiktok" })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "No image provided");
    }

    #[tokio::test]
    async fn video_without_narration_has_empty_text() {
        let (status, body) = post_json(
            "/generate-video",
            json!({ "image": sample_image(2, 2), "detectedItems": ["jean"], "duration": 10, "style": "instagram", "addNarration": false }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["narration"], "");
        assert_eq!(body["metadata"]["duration"], 10);
        assert_eq!(body["metadata"]["effects"]["transition"], "pan-smooth");
    }

    #[tokio::test]
    async fn tiktok_narration_is_template_then_items() {
        let (status, body) = post_json(
            "/generate-video",
            json!({ "image": sample_image(2, 2), "detectedItems": ["robe", "sac"], "duration": 15, "style": "tiktok", "addNarration": true }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let narration = body["narration"].as_str().unwrap();
        let (template, items) = narration.split_once("\n\n").unwrap();
        assert!(VideoStyle::TikTok.templates().contains(&template), "{template}");
        assert_eq!(items, "Robe, sac");
    }

    #[tokio::test]
    async fn unknown_style_falls_back_to_authentic() {
        let (status, body) = post_json(
            "/generate-video",
            json!({ "image": sample_image(2, 2), "detectedItems": null, "style": "vaporwave", "addNarration": true }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["metadata"]["style"], "vaporwave");
        assert_eq!(body["metadata"]["effects"], json!({ "transition": "minimal", "speed": "natural", "filters": ["natural", "warm"] }));
        assert_eq!(body["metadata"]["detectedItems"], json!([]));
        let template = body["narration"].as_str().unwrap().trim_end();
        assert!(VideoStyle::Authentic.templates().contains(&template));
    }

    #[tokio::test]
    async fn video_url_embeds_original_image() {
        let image = sample_image(3, 3);
        let (_, body) = post_json(
            "/api/generate-video",
            json!({ "image": image, "detectedItems": ["montre"], "duration": 8, "style": "tiktok", "addNarration": true }),
        )
        .await;
        let url = body["videoUrl"].as_str().unwrap();
        let payload = url.strip_prefix("data:text/html;base64,").unwrap();
        let html = String::from_utf8(base64::engine::general_purpose::STANDARD.decode(payload).unwrap()).unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains(&format!(r#"src="{image}""#)));
        assert!(html.contains("animation: zoom-in 8s ease-in-out infinite;"));
    }

    #[tokio::test]
    async fn legacy_enhance_path_is_routed() {
        let (status, _) = post_json("/api/enhance-image", json!({ "image": sample_image(2, 2) })).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn index_serves_wizard_page() {
        let req = Request::builder().uri("/").body(Body::empty()).unwrap();
        let resp = app().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        assert!(String::from_utf8_lossy(&bytes).contains("/generate-video"));
    }

    #[tokio::test]
    async fn non_ascii_image_with_logging_enabled_is_500() {
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::INFO)
            .with_test_writer()
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let (status, body) = post_json("/enhance", json!({ "image": "€".repeat(20) })).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": "Failed to enhance image" }));

        let (status, _) = post_json("/enhance", json!({ "image": sample_image(2, 2) })).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn huge_upscale_factor_is_500() {
        let (status, body) = post_json("/enhance", json!({ "image": sample_image(2, 2), "upscaleFactor": 1e5 })).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": "Failed to enhance image" }));
    }

    #[tokio::test]
    async fn null_upscale_factor_skips_resize() {
        let (status, body) = post_json("/enhance", json!({ "image": sample_image(3, 2), "upscaleFactor": null })).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["metadata"]["enhancedSize"], json!({ "width": 3, "height": 2 }));
    }
}
