//! Chart styling, passed explicitly to the renderer.

use std::fmt;

use serde::{Deserialize, Serialize};

/// 8-bit RGB color; (de)serialized as `"#rrggbb"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Parse `#rrggbb` (the `#` is optional).
    pub fn from_hex(s: &str) -> Option<Self> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some(Rgb(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

impl TryFrom<String> for Rgb {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Rgb::from_hex(&value).ok_or_else(|| format!("invalid color '{value}', expected #rrggbb"))
    }
}

impl From<Rgb> for String {
    fn from(c: Rgb) -> Self {
        c.to_string()
    }
}

/// Point marker shape. Facets cycle through these in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Marker {
    Circle,
    Square,
    Triangle,
    Cross,
}

impl Marker {
    pub const CYCLE: [Marker; 4] = [Marker::Circle, Marker::Square, Marker::Triangle, Marker::Cross];

    /// Marker for the `idx`-th facet value.
    pub fn nth(idx: usize) -> Self {
        Self::CYCLE[idx % Self::CYCLE.len()]
    }
}

/// What to draw for a point whose standard deviation is undefined (single-run group).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorBarPolicy {
    /// Draw a zero-length bar.
    #[default]
    ZeroLength,
    /// Draw no bar at that point.
    Suppress,
}

/// Output image format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageFormat {
    #[default]
    Png,
    Svg,
}

impl ImageFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Svg => "svg",
        }
    }

    /// Parse `png` / `svg` (case-insensitive).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "png" => Some(Self::Png),
            "svg" => Some(Self::Svg),
            _ => None,
        }
    }
}

/// Rendering configuration.
///
/// Use [`Default`] for the stock look; every field can be overridden from a JSON config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartStyle {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    pub format: ImageFormat,
    /// Series colors, indexed by value column.
    pub palette: Vec<Rgb>,
    pub line_width: u32,
    pub marker_size: u32,
    /// Width of the error-bar caps in pixels.
    pub error_bar_cap: u32,
    pub error_bars: ErrorBarPolicy,
    pub font_family: String,
    pub caption_font_size: u32,
    pub label_font_size: u32,
    /// Draw title, axis labels, tick labels and legend. Turning this off needs no fonts.
    pub show_text: bool,
    pub show_grid: bool,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            width: 1400,
            height: 800,
            format: ImageFormat::Png,
            palette: vec![
                Rgb(0xe4, 0x1a, 0x1c),
                Rgb(0x37, 0x7e, 0xb8),
                Rgb(0x4d, 0xaf, 0x4a),
                Rgb(0x98, 0x4e, 0xa3),
                Rgb(0xff, 0x7f, 0x00),
                Rgb(0xff, 0xff, 0x33),
                Rgb(0xa6, 0x56, 0x28),
                Rgb(0xf7, 0x81, 0xbf),
            ],
            line_width: 2,
            marker_size: 5,
            error_bar_cap: 8,
            error_bars: ErrorBarPolicy::ZeroLength,
            font_family: "sans-serif".to_string(),
            caption_font_size: 28,
            label_font_size: 16,
            show_text: true,
            show_grid: true,
        }
    }
}

impl ChartStyle {
    /// Color for the `idx`-th value column; cycles through the palette.
    pub fn color(&self, idx: usize) -> Rgb {
        if self.palette.is_empty() {
            return Rgb(0, 0, 0);
        }
        self.palette[idx % self.palette.len()]
    }
}
