//! `data:` URI helpers for the Base64 images exchanged with the browser.

use base64::engine::general_purpose::{STANDARD, STANDARD_NO_PAD};
use base64::Engine;

/// A decoded `data:` URI payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pub mime: Option<String>,
    pub bytes: Vec<u8>,
}

/// Splits an optional `data:<mime>;base64,` prefix from the payload.
pub fn split(encoded: &str) -> (Option<&str>, &str) {
    if let Some(rest) = encoded.strip_prefix("data:") {
        if let Some((mime, payload)) = rest.split_once(";base64,") {
            return (Some(mime), payload);
        }
    }
    (None, encoded)
}

/// Decodes a data URI, or a bare base64 string, into raw bytes.
pub fn parse(encoded: &str) -> Result<DecodedImage, base64::DecodeError> {
    let (mime, payload) = split(encoded.trim());
    let compact: String = payload.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    let bytes = match STANDARD.decode(&compact) {
        Ok(bytes) => bytes,
        Err(_) => STANDARD_NO_PAD.decode(compact.trim_end_matches('='))?,
    };
    Ok(DecodedImage { mime: mime.map(str::to_string), bytes })
}

pub fn to_data_uri(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}

/// Short preview of a large base64 value, for log lines.
pub fn preview(data: &str) -> String {
    match data.char_indices().nth(50) {
        Some((cut, _)) => format!("{}...[{} chars total]", &data[..cut], data.chars().count()),
        None => data.to_string(),
    }
}
