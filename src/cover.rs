//! Cover image generation as an inline SVG data URL.
//!
//! No model call: the cover is a deterministic 1200×1600 vector layout
//! (gradient background, accent rules, title/subtitle/brand text),
//! base64-encoded so clients can drop it straight into an `img` tag.

use base64::Engine;

/// Subtitles at or above this length are dropped from the cover.
const MAX_SUBTITLE_CHARS: usize = 80;

/// Visual parameters for a rendered cover.
#[derive(Debug, Clone)]
pub struct CoverStyle {
    pub brand: String,
    pub primary: String,
    pub secondary: String,
    pub accent: String,
    pub font_family: String,
    pub show_subtitle: bool,
}

impl Default for CoverStyle {
    fn default() -> Self {
        Self {
            brand: "Bookforge".into(),
            primary: "#0f172a".into(),
            secondary: "#1e293b".into(),
            accent: "#fbbf24".into(),
            font_family: "Inter, Arial, sans-serif".into(),
            show_subtitle: true,
        }
    }
}

/// Render a cover and return it as a `data:image/svg+xml;base64,` URL.
pub fn cover_data_url(title: &str, subtitle: Option<&str>, style: &CoverStyle) -> String {
    let svg = render_cover_svg(title, subtitle, style);
    let encoded = base64::engine::general_purpose::STANDARD.encode(svg.as_bytes());
    format!("data:image/svg+xml;base64,{encoded}")
}

/// Render the cover SVG document.
pub fn render_cover_svg(title: &str, subtitle: Option<&str>, style: &CoverStyle) -> String {
    let title = xml_escape(title);
    let subtitle = subtitle
        .filter(|s| style.show_subtitle && s.chars().count() < MAX_SUBTITLE_CHARS)
        .map(xml_escape);

    let subtitle_block = match &subtitle {
        Some(text) => format!(
            r#"  <text x="600" y="720" text-anchor="middle" font-size="38" font-weight="400" font-family="{font}" fill="{accent}">{text}</text>
"#,
            font = style.font_family,
            accent = style.accent,
        ),
        None => String::new(),
    };

    format!(
        r##"<svg width="1200" height="1600" viewBox="0 0 1200 1600" xmlns="http://www.w3.org/2000/svg">
  <defs>
    <linearGradient id="bg" x1="0" y1="0" x2="0" y2="1">
      <stop offset="0%" stop-color="{primary}" />
      <stop offset="100%" stop-color="{secondary}" />
    </linearGradient>
  </defs>
  <rect width="1200" height="1600" fill="url(#bg)" />
  <line x1="150" y1="300" x2="1050" y2="300" stroke="{accent}" stroke-width="4" opacity="0.8"/>
  <line x1="150" y1="1300" x2="1050" y2="1300" stroke="{accent}" stroke-width="2" opacity="0.5"/>
  <text x="600" y="620" text-anchor="middle" font-size="88" font-weight="800" font-family="{font}" fill="#ffffff">{title}</text>
{subtitle_block}  <text x="600" y="1480" text-anchor="middle" font-size="26" font-weight="500" font-family="{font}" fill="#cbd5f5">{brand}</text>
</svg>
"##,
        primary = style.primary,
        secondary = style.secondary,
        accent = style.accent,
        font = style.font_family,
        brand = xml_escape(&style.brand),
    )
}

fn xml_escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}
