//! UGC "video" wrapper: a self-contained HTML page that animates the still
//! image with CSS keyframes and overlays the narration. No video container
//! is produced; consumers expecting MP4/WebM will not be able to play it.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::models::StyleEffects;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoStyle {
    TikTok,
    Instagram,
    Authentic,
}

impl VideoStyle {
    /// Unrecognized names fall back to `Authentic`.
    pub fn parse(name: &str) -> Self {
        match name {
            "tiktok" => VideoStyle::TikTok,
            "instagram" => VideoStyle::Instagram,
            _ => VideoStyle::Authentic,
        }
    }

    pub fn templates(self) -> &'static [&'static str; 4] {
        match self {
            VideoStyle::TikTok => &[
                "Découvrez cette pièce incroyable ! 😍",
                "Le look parfait pour cet automne ✨",
                "J'adore ce style, vous en pensez quoi ? 💕",
                "Coup de cœur du jour ! 🔥",
            ],
            VideoStyle::Instagram => &[
                "L'élégance à l'état pur ✨",
                "Confort et style réunis",
                "La tendance de la saison",
                "Un incontournable de ma garde-robe",
            ],
            VideoStyle::Authentic => &[
                "Honnêtement, je porte ça tout le temps",
                "Super qualité, je recommande vraiment",
                "Exactement ce que je cherchais",
                "Parfait pour un look décontracté",
            ],
        }
    }

    pub fn transition(self) -> &'static str {
        match self {
            VideoStyle::TikTok => "zoom-in",
            VideoStyle::Instagram => "pan-smooth",
            VideoStyle::Authentic => "minimal",
        }
    }

    pub fn effects(self) -> StyleEffects {
        let (speed, filters): (&str, [&str; 2]) = match self {
            VideoStyle::TikTok => ("fast", ["vibrant", "sharp"]),
            VideoStyle::Instagram => ("medium", ["elegant", "soft"]),
            VideoStyle::Authentic => ("natural", ["natural", "warm"]),
        };
        StyleEffects {
            transition: self.transition().to_string(),
            speed: speed.to_string(),
            filters: filters.iter().map(|f| f.to_string()).collect(),
        }
    }
}

/// A random template for the style, a blank line, then the item list
/// with its first letter capitalized.
pub fn narration<R: Rng + ?Sized>(rng: &mut R, style: VideoStyle, items: &[String]) -> String {
    let templates = style.templates();
    let template = templates.choose(rng).copied().unwrap_or(templates[0]);
    format!("{}\n\n{}", template, capitalize_first(&items.join(", ")))
}

fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn render_document(image: &str, duration: u32, style: VideoStyle, narration: &str) -> String {
    let narration_block = if narration.is_empty() {
        String::new()
    } else {
        format!(r#"    <div id="narration">{}</div>"#, escape_html(narration))
    };
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="UTF-8">
  <style>
    body {{
      margin: 0;
      padding: 0;
      overflow: hidden;
      background: #000;
      display: flex;
      align-items: center;
      justify-content: center;
      height: 100vh;
    }}
    #videoContainer {{
      position: relative;
      width: 100%;
      height: 100%;
      display: flex;
      align-items: center;
      justify-content: center;
    }}
    #mainImage {{
      max-width: 100%;
      max-height: 100%;
      object-fit: contain;
      animation: {transition} {duration}s ease-in-out infinite;
    }}
    #narration {{
      position: absolute;
      bottom: 80px;
      left: 50%;
      transform: translateX(-50%);
      background: rgba(0,0,0,0.7);
      color: white;
      padding: 20px 30px;
      border-radius: 12px;
      font-family: Arial, sans-serif;
      font-size: 18px;
      text-align: center;
      white-space: pre-line;
      max-width: 80%;
      animation: fadeIn 1s ease-in;
    }}
    @keyframes zoom-in {{
      0% {{ transform: scale(1); }}
      50% {{ transform: scale(1.1); }}
      100% {{ transform: scale(1); }}
    }}
    @keyframes pan-smooth {{
      0% {{ transform: translateX(0) scale(1.05); }}
      50% {{ transform: translateX(-20px) scale(1.1); }}
      100% {{ transform: translateX(0) scale(1.05); }}
    }}
    @keyframes minimal {{
      0%, 100% {{ opacity: 1; }}
    }}
    @keyframes fadeIn {{
      from {{ opacity: 0; transform: translateX(-50%) translateY(20px); }}
      to {{ opacity: 1; transform: translateX(-50%) translateY(0); }}
    }}
  </style>
</head>
<body>
  <div id="videoContainer">
    <img id="mainImage" src="{image}" alt="Fashion UGC">
{narration_block}
  </div>
</body>
</html>
"#,
        transition = style.transition(),
        duration = duration,
        image = escape_html(image),
        narration_block = narration_block,
    )
}

/// Wraps the rendered page as a `data:text/html;base64,` URI.
pub fn video_url(document: &str) -> String {
    format!("data:text/html;base64,{}", STANDARD.encode(document.as_bytes()))
}
