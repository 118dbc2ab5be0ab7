use std::io::Cursor;

use image::codecs::png::{CompressionType, FilterType as PngFilter, PngEncoder};
use image::imageops::{self, FilterType};
use image::{DynamicImage, GenericImageView, ImageReader, RgbaImage};
use tracing::{debug, warn};

use crate::error::ProcessingError;
use crate::models::ImageSize;

/// Size assumed when the header carries no readable dimensions.
pub const FALLBACK_SIZE: ImageSize = ImageSize { width: 800, height: 600 };
/// Largest upscaled image the pipeline will allocate (64 megapixels).
pub const MAX_OUTPUT_PIXELS: u64 = 8192 * 8192;
pub const MEDIAN_WINDOW: u32 = 3;
pub const BRIGHTNESS: f32 = 1.1;
pub const SATURATION: f32 = 1.2;
pub const SHARPEN_SIGMA: f32 = 1.0;
pub const SHARPEN_FLAT_GAIN: f32 = 1.0;
pub const SHARPEN_JAGGED_GAIN: f32 = 0.2;
/// Detail amplitude (0-255 scale) separating flat from jagged areas.
pub const SHARPEN_THRESHOLD: f32 = 2.0;

#[derive(Debug, Clone, Copy)]
pub struct EnhanceOptions {
    pub upscale_factor: f64,
    pub denoise: bool,
    pub enhance_colors: bool,
}

#[derive(Debug, Clone)]
pub struct EnhancedImage {
    pub png: Vec<u8>,
    pub original_size: ImageSize,
    pub enhanced_size: ImageSize,
}

/// Runs the enhancement pipeline: upscale, denoise, colour boost, PNG encode.
pub fn enhance(bytes: &[u8], opts: &EnhanceOptions) -> Result<EnhancedImage, ProcessingError> {
    let original_size = read_dimensions(bytes);
    let mut img = image::load_from_memory(bytes)?;

    if opts.upscale_factor > 1.0 {
        let target = scaled_size(original_size, opts.upscale_factor)?;
        debug!("upscaling {}x{} -> {}x{}", original_size.width, original_size.height, target.width, target.height);
        img = img.resize_exact(target.width, target.height, FilterType::Lanczos3);
    }

    if opts.denoise {
        img = DynamicImage::ImageRgba8(median_filter(&img.to_rgba8(), MEDIAN_WINDOW));
    }

    if opts.enhance_colors {
        let mut rgba = img.to_rgba8();
        modulate(&mut rgba, BRIGHTNESS, SATURATION);
        img = DynamicImage::ImageRgba8(sharpen(
            &rgba,
            SHARPEN_SIGMA,
            SHARPEN_THRESHOLD,
            SHARPEN_FLAT_GAIN,
            SHARPEN_JAGGED_GAIN,
        ));
    }

    let (width, height) = img.dimensions();
    Ok(EnhancedImage {
        png: encode_png(&img)?,
        original_size,
        enhanced_size: ImageSize { width, height },
    })
}

/// Reads width/height from the image header without decoding pixels.
pub fn read_dimensions(bytes: &[u8]) -> ImageSize {
    let dims = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .ok()
        .and_then(|reader| reader.into_dimensions().ok());
    match dims {
        Some((width, height)) => ImageSize { width, height },
        None => {
            warn!("⚠️ Could not read image dimensions, assuming {}x{}", FALLBACK_SIZE.width, FALLBACK_SIZE.height);
            FALLBACK_SIZE
        }
    }
}

/// Target size for an upscale, refused when it would exceed `MAX_OUTPUT_PIXELS`.
pub fn scaled_size(size: ImageSize, factor: f64) -> Result<ImageSize, ProcessingError> {
    let scale = |v: u32| ((v as f64 * factor).round() as u64).max(1);
    let (width, height) = (scale(size.width), scale(size.height));
    if width.saturating_mul(height) > MAX_OUTPUT_PIXELS {
        return Err(ProcessingError::TooLarge { width, height, limit: MAX_OUTPUT_PIXELS });
    }
    Ok(ImageSize { width: width as u32, height: height as u32 })
}

/// Per-channel median over a square window, edges clamped.
pub fn median_filter(src: &RgbaImage, window: u32) -> RgbaImage {
    let (w, h) = src.dimensions();
    let radius = (window / 2) as i64;
    let mut out = RgbaImage::new(w, h);
    let mut samples: Vec<u8> = Vec::with_capacity((window * window) as usize);

    for y in 0..h {
        for x in 0..w {
            let mut px = [0u8; 4];
            for (c, slot) in px.iter_mut().enumerate() {
                samples.clear();
                for dy in -radius..=radius {
                    let sy = (y as i64 + dy).clamp(0, h as i64 - 1) as u32;
                    for dx in -radius..=radius {
                        let sx = (x as i64 + dx).clamp(0, w as i64 - 1) as u32;
                        samples.push(src.get_pixel(sx, sy)[c]);
                    }
                }
                samples.sort_unstable();
                *slot = samples[samples.len() / 2];
            }
            out.put_pixel(x, y, image::Rgba(px));
        }
    }
    out
}

/// Multiplies brightness, then pushes each channel away from luminance.
pub fn modulate(img: &mut RgbaImage, brightness: f32, saturation: f32) {
    for pixel in img.pixels_mut() {
        let r = pixel[0] as f32 * brightness;
        let g = pixel[1] as f32 * brightness;
        let b = pixel[2] as f32 * brightness;
        let lum = 0.2126 * r + 0.7152 * g + 0.0722 * b;
        pixel[0] = (lum + (r - lum) * saturation).round().clamp(0.0, 255.0) as u8;
        pixel[1] = (lum + (g - lum) * saturation).round().clamp(0.0, 255.0) as u8;
        pixel[2] = (lum + (b - lum) * saturation).round().clamp(0.0, 255.0) as u8;
    }
}

/// Unsharp mask with separate gains for flat and jagged detail.
pub fn sharpen(src: &RgbaImage, sigma: f32, threshold: f32, flat_gain: f32, jagged_gain: f32) -> RgbaImage {
    let blurred = imageops::blur(src, sigma);
    let mut out = src.clone();
    for (pixel, soft) in out.pixels_mut().zip(blurred.pixels()) {
        for c in 0..3 {
            let orig = pixel[c] as f32;
            let detail = orig - soft[c] as f32;
            let gain = if detail.abs() <= threshold { flat_gain } else { jagged_gain };
            pixel[c] = (orig + detail * gain).round().clamp(0.0, 255.0) as u8;
        }
    }
    out
}

pub fn encode_png(img: &DynamicImage) -> Result<Vec<u8>, ProcessingError> {
    let mut buf = Cursor::new(Vec::new());
    let encoder = PngEncoder::new_with_quality(&mut buf, CompressionType::Default, PngFilter::Adaptive);
    img.write_with_encoder(encoder)?;
    Ok(buf.into_inner())
}
