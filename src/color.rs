use image::Rgba;
use palette::Srgb;

use crate::error::{EditorError, Result};

/// A packed 32-bit ARGB pixel value (`0xAARRGGBB`).
///
/// Equality is exact bitwise equality; two colors that differ only in alpha
/// are distinct palette entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Color(pub u32);

impl Color {
    pub const fn from_argb(a: u8, r: u8, g: u8, b: u8) -> Self {
        Self((a as u32) << 24 | (r as u32) << 16 | (g as u32) << 8 | b as u32)
    }

    /// Opaque color from RGB components.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::from_argb(0xff, r, g, b)
    }

    pub const fn alpha(self) -> u8 {
        (self.0 >> 24) as u8
    }

    pub const fn red(self) -> u8 {
        (self.0 >> 16) as u8
    }

    pub const fn green(self) -> u8 {
        (self.0 >> 8) as u8
    }

    pub const fn blue(self) -> u8 {
        self.0 as u8
    }

    /// Parse `#rrggbb` (opaque) or `#aarrggbb`. The leading `#` is optional.
    pub fn from_hex(hex: &str) -> Result<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        let invalid = || EditorError::InvalidColor(hex.to_string());
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let value = u32::from_str_radix(digits, 16).map_err(|_| invalid())?;
        match digits.len() {
            6 => Ok(Self(0xff00_0000 | value)),
            8 => Ok(Self(value)),
            _ => Err(invalid()),
        }
    }

    /// Lowercase hex. Opaque colors print as `#rrggbb`, others as `#aarrggbb`.
    pub fn to_hex(self) -> String {
        if self.alpha() == 0xff {
            format!("#{:06x}", self.0 & 0x00ff_ffff)
        } else {
            format!("#{:08x}", self.0)
        }
    }

    pub fn to_rgba(self) -> Rgba<u8> {
        Rgba([self.red(), self.green(), self.blue(), self.alpha()])
    }

    pub fn from_rgba(px: Rgba<u8>) -> Self {
        let [r, g, b, a] = px.0;
        Self::from_argb(a, r, g, b)
    }

    /// Convert to `palette::Srgb<u8>`, dropping alpha.
    pub fn to_srgb_u8(self) -> Srgb<u8> {
        Srgb::new(self.red(), self.green(), self.blue())
    }

    /// WCAG 2.0 relative luminance of the RGB part.
    pub fn relative_luminance(self) -> f32 {
        fn linearize(c: f32) -> f32 {
            if c <= 0.04045 {
                c / 12.92
            } else {
                ((c + 0.055) / 1.055).powf(2.4)
            }
        }
        let srgb: Srgb<f32> = self.to_srgb_u8().into_format();
        0.2126 * linearize(srgb.red) + 0.7152 * linearize(srgb.green) + 0.0722 * linearize(srgb.blue)
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(&self.to_hex())
    }
}

impl std::str::FromStr for Color {
    type Err = EditorError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hex(s)
    }
}
