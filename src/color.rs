use palette::{FromColor, Hsv, Srgb};
use thiserror::Error;

/// Error for a color string that does not look like `#RRGGBB`.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid hex color `{0}`: expected 6 hex digits after an optional `#`")]
pub struct HexFormatError(pub String);

/// Core color type used throughout the crate.
/// Wraps sRGB u8 components; HSV input is converted through `palette`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a hex color string like `#ff8800` or `#FF8800`.
    pub fn from_hex(hex: &str) -> Result<Self, HexFormatError> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 {
            return Err(HexFormatError(hex.to_string()));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16).map_err(|_| HexFormatError(hex.to_string()))
        };
        Ok(Self {
            r: channel(0..2)?,
            g: channel(2..4)?,
            b: channel(4..6)?,
        })
    }

    /// Convert HSV input to a color.
    ///
    /// Hue is in degrees and wraps modulo 360; saturation and value are
    /// percentages clamped to [0, 100]. Each channel is rounded to the
    /// nearest integer, ties away from zero. Identical inputs always
    /// produce an identical color.
    pub fn from_hsv(hue_deg: f64, sat_pct: i32, val_pct: i32) -> Self {
        let hue = hue_deg.rem_euclid(360.0) as f32;
        let sat = sat_pct.clamp(0, 100) as f32 / 100.0;
        let val = val_pct.clamp(0, 100) as f32 / 100.0;
        let srgb: Srgb<f32> = Srgb::from_color(Hsv::new(hue, sat, val));
        Self::from_srgb_f32_clamped(srgb)
    }

    /// Serialize to lowercase hex `#rrggbb`.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Serialize to uppercase hex `#RRGGBB`, the on-disk and label form.
    pub fn to_hex_upper(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Clamp an Srgb<f32> to [0, 1] and convert to Color.
    fn from_srgb_f32_clamped(srgb: Srgb<f32>) -> Self {
        let r = (srgb.red.clamp(0.0, 1.0) * 255.0).round() as u8;
        let g = (srgb.green.clamp(0.0, 1.0) * 255.0).round() as u8;
        let b = (srgb.blue.clamp(0.0, 1.0) * 255.0).round() as u8;
        Self { r, g, b }
    }

    /// Rec. 601 luma, in [0, 255].
    pub fn luma(self) -> f64 {
        0.299 * f64::from(self.r) + 0.587 * f64::from(self.g) + 0.114 * f64::from(self.b)
    }

    /// Whether a label on this color needs dark text to stay readable.
    /// Light backgrounds get black labels, dark backgrounds white.
    pub fn is_light(self) -> bool {
        self.luma() > 140.0
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}
