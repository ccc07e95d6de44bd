//! Clear color and background hex parsing.
//!
//! The background comes from a color picker as `#RRGGBB` text. It is parsed
//! once per frame; [`ClearColor::from_hex`] is the only place that turns text
//! into the color the render pass clears to.

use std::fmt;

/// Background used until the user picks another one.
pub const DEFAULT_BACKGROUND: &str = "#ffffff";

/// The color the frame is cleared to before the model is drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClearColor(pub [f64; 4]);

impl ClearColor {
    pub const WHITE: Self = Self([1.0, 1.0, 1.0, 1.0]);

    /// Opaque clear color from a `#RRGGBB` string.
    pub fn from_hex(hex: &str) -> Result<Self, ColorParseError> {
        let [r, g, b] = hex_to_rgb(hex)?;
        Ok(Self([r as f64, g as f64, b as f64, 1.0]))
    }

    /// Back to `#rrggbb` text (alpha is dropped).
    pub fn to_hex(&self) -> String {
        let channel = |c: f64| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!(
            "#{:02x}{:02x}{:02x}",
            channel(self.0[0]),
            channel(self.0[1]),
            channel(self.0[2])
        )
    }

    pub(crate) fn to_wgpu(self) -> wgpu::Color {
        wgpu::Color {
            r: self.0[0],
            g: self.0[1],
            b: self.0[2],
            a: self.0[3],
        }
    }
}

impl Default for ClearColor {
    fn default() -> Self {
        Self::WHITE
    }
}

/// Why a background string was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColorParseError {
    /// Not exactly six hex digits after the optional `#`.
    Length(usize),
    /// A character outside `0-9a-fA-F`.
    InvalidDigit(char),
}

impl fmt::Display for ColorParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColorParseError::Length(n) => write!(f, "expected 6 hex digits, found {n}"),
            ColorParseError::InvalidDigit(c) => write!(f, "invalid hex digit {c:?}"),
        }
    }
}

impl std::error::Error for ColorParseError {}

/// Parse `#RRGGBB` (leading `#` optional) into channels in `[0, 1]`.
pub fn hex_to_rgb(hex: &str) -> Result<[f32; 3], ColorParseError> {
    let digits = hex.trim().strip_prefix('#').unwrap_or(hex.trim());
    if let Some(bad) = digits.chars().find(|c| !c.is_ascii_hexdigit()) {
        return Err(ColorParseError::InvalidDigit(bad));
    }
    if digits.len() != 6 {
        return Err(ColorParseError::Length(digits.len()));
    }

    let mut rgb = [0.0; 3];
    for (i, channel) in rgb.iter_mut().enumerate() {
        let byte = u8::from_str_radix(&digits[i * 2..i * 2 + 2], 16)
            .map_err(|_| ColorParseError::InvalidDigit(digits.as_bytes()[i * 2] as char))?;
        *channel = byte as f32 / 255.0;
    }
    Ok(rgb)
}
