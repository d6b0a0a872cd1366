//! Color model: RGB values in the 7-bit-alpha convention, YIQ derivation,
//! and normalization from the accepted input forms.
//!
//! Alpha runs 0 (opaque) to 127 (fully transparent) — the blending-channel
//! convention of classic truecolor raster libraries, *not* the 0–255 alpha
//! of the `image` crate. Conversion happens once, at the backend boundary
//! ([`Rgb::to_rgba8`] / [`Rgb::from_rgba8`]).
//!
//! The default alpha differs by input form and is preserved deliberately:
//!
//! | Input form            | Missing alpha becomes |
//! |-----------------------|-----------------------|
//! | 6-digit hex string    | 0 (opaque)            |
//! | packed `0xRRGGBB` int | 0 (opaque)            |
//! | 3-element channel slice | 127 (transparent)   |
//!
//! The asymmetry comes straight from the upstream behavior this crate
//! replicates; callers relying on a specific default should pass alpha
//! explicitly.

use crate::error::{Error, Result};

/// Largest valid alpha value: fully transparent.
pub const ALPHA_TRANSPARENT: u8 = 127;

/// Smallest alpha value: fully opaque.
pub const ALPHA_OPAQUE: u8 = 0;

/// An immutable RGB color with a 7-bit alpha channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    red: u8,
    green: u8,
    blue: u8,
    alpha: u8,
}

impl Rgb {
    /// Build a color from explicit channels. Alpha must be in `[0, 127]`.
    pub fn new(red: u8, green: u8, blue: u8, alpha: u8) -> Result<Self> {
        if alpha > ALPHA_TRANSPARENT {
            return Err(Error::InvalidColorFormat(format!(
                "alpha {alpha} out of range 0-127"
            )));
        }
        Ok(Self {
            red,
            green,
            blue,
            alpha,
        })
    }

    /// Fully opaque color (alpha 0).
    pub fn opaque(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red,
            green,
            blue,
            alpha: ALPHA_OPAQUE,
        }
    }

    /// Opaque black, the fallback color for elements drawn without an
    /// explicit color.
    pub fn black() -> Self {
        Self::opaque(0, 0, 0)
    }

    /// Invisible black: the default rotation background and letterbox fill.
    pub fn transparent_black() -> Self {
        Self {
            red: 0,
            green: 0,
            blue: 0,
            alpha: ALPHA_TRANSPARENT,
        }
    }

    /// Parse a 6- or 8-digit hex color, optionally `#`-prefixed.
    ///
    /// The 8-digit form is ARGB: the leading byte is an 8-bit alpha, halved
    /// (floor) into the 7-bit convention, so `"#80efefef"` carries alpha 64.
    /// The 6-digit form is opaque (alpha 0).
    pub fn from_hex(hex: &str) -> Result<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 && digits.len() != 8 {
            return Err(Error::InvalidColorFormat(format!(
                "hex color '{hex}' must have 6 or 8 digits"
            )));
        }
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(Error::InvalidColorFormat(format!(
                "hex color '{hex}' has non-hex digits"
            )));
        }
        let mut bytes = [0u8; 4];
        for (i, byte) in bytes.iter_mut().take(digits.len() / 2).enumerate() {
            // slicing is safe: all-hex-digit strings are single-byte ascii
            *byte = u8::from_str_radix(&digits[i * 2..i * 2 + 2], 16)
                .map_err(|_| Error::InvalidColorFormat(format!("hex color '{hex}' is malformed")))?;
        }
        if digits.len() == 6 {
            Ok(Self::opaque(bytes[0], bytes[1], bytes[2]))
        } else {
            // ARGB: leading byte is alpha in 0-255, halved into 0-127
            Ok(Self {
                red: bytes[1],
                green: bytes[2],
                blue: bytes[3],
                alpha: bytes[0] / 2,
            })
        }
    }

    /// Unpack a `0xRRGGBB` integer. Alpha is 0 (opaque).
    pub fn from_int(color: u32) -> Self {
        Self::opaque(
            ((color >> 16) & 0xFF) as u8,
            ((color >> 8) & 0xFF) as u8,
            (color & 0xFF) as u8,
        )
    }

    /// Build from a channel slice of 3 or 4 elements.
    ///
    /// A 3-element slice defaults alpha to 127 — fully transparent, unlike
    /// the hex/int forms (see the module docs).
    pub fn from_channels(channels: &[u8]) -> Result<Self> {
        match *channels {
            [r, g, b] => Ok(Self {
                red: r,
                green: g,
                blue: b,
                alpha: ALPHA_TRANSPARENT,
            }),
            [r, g, b, a] => Self::new(r, g, b, a),
            _ => Err(Error::InvalidColorFormat(format!(
                "channel array must have 3 or 4 elements, got {}",
                channels.len()
            ))),
        }
    }

    /// Normalize any accepted color form into an `Rgb`.
    pub fn normalize(spec: impl Into<ColorSpec>) -> Result<Self> {
        match spec.into() {
            ColorSpec::Rgb(rgb) => Ok(rgb),
            ColorSpec::Hex(hex) => Self::from_hex(&hex),
            ColorSpec::Int(packed) => Ok(Self::from_int(packed)),
            ColorSpec::Channels(channels) => Self::from_channels(&channels),
        }
    }

    pub fn red(&self) -> u8 {
        self.red
    }

    pub fn green(&self) -> u8 {
        self.green
    }

    pub fn blue(&self) -> u8 {
        self.blue
    }

    pub fn alpha(&self) -> u8 {
        self.alpha
    }

    /// `[red, green, blue, alpha]` with alpha still in the 0–127 convention.
    pub fn to_array(&self) -> [u8; 4] {
        [self.red, self.green, self.blue, self.alpha]
    }

    /// Convert to the `image` crate's RGBA8, expanding 7-bit alpha to 8-bit
    /// coverage: 0 (opaque) → 255, a → 255 − 2a, 127 (transparent) → 0.
    pub fn to_rgba8(&self) -> image::Rgba<u8> {
        let coverage = if self.alpha == ALPHA_TRANSPARENT {
            0
        } else {
            255 - self.alpha * 2
        };
        image::Rgba([self.red, self.green, self.blue, coverage])
    }

    /// Inverse of [`to_rgba8`](Self::to_rgba8); exact for every value that
    /// `to_rgba8` produces.
    pub fn from_rgba8(pixel: image::Rgba<u8>) -> Self {
        let image::Rgba([r, g, b, coverage]) = pixel;
        let alpha = if coverage == 0 {
            ALPHA_TRANSPARENT
        } else {
            (255 - coverage) / 2
        };
        Self {
            red: r,
            green: g,
            blue: b,
            alpha,
        }
    }
}

/// Any of the color input forms [`Rgb::normalize`] accepts.
#[derive(Debug, Clone)]
pub enum ColorSpec {
    Rgb(Rgb),
    Hex(String),
    Int(u32),
    Channels(Vec<u8>),
}

impl From<Rgb> for ColorSpec {
    fn from(rgb: Rgb) -> Self {
        ColorSpec::Rgb(rgb)
    }
}

impl From<&str> for ColorSpec {
    fn from(hex: &str) -> Self {
        ColorSpec::Hex(hex.to_string())
    }
}

impl From<String> for ColorSpec {
    fn from(hex: String) -> Self {
        ColorSpec::Hex(hex)
    }
}

impl From<u32> for ColorSpec {
    fn from(packed: u32) -> Self {
        ColorSpec::Int(packed)
    }
}

impl From<[u8; 3]> for ColorSpec {
    fn from(channels: [u8; 3]) -> Self {
        ColorSpec::Channels(channels.to_vec())
    }
}

impl From<[u8; 4]> for ColorSpec {
    fn from(channels: [u8; 4]) -> Self {
        ColorSpec::Channels(channels.to_vec())
    }
}

impl From<&[u8]> for ColorSpec {
    fn from(channels: &[u8]) -> Self {
        ColorSpec::Channels(channels.to_vec())
    }
}

/// Luma/chrominance triple derived from RGB.
///
/// Only the luma component is consumed by the crate (greyscale palette
/// derivation); I and Q are carried for completeness.
///
/// <https://en.wikipedia.org/wiki/YIQ>
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Yiq {
    pub y: u8,
    pub i: f64,
    pub q: f64,
}

impl Yiq {
    pub fn from_rgb(rgb: Rgb) -> Self {
        let (r, g, b) = (
            f64::from(rgb.red()),
            f64::from(rgb.green()),
            f64::from(rgb.blue()),
        );
        Self {
            // Scaled-integer floor of 0.299R + 0.587G + 0.114B. Exact decimal
            // arithmetic matters here: the coefficients sum to exactly 1, so a
            // grey (g, g, g) pixel keeps luma g and greyscale is idempotent.
            // Naive f64 math lands a hair under g and floors to g - 1.
            y: ((299 * u32::from(rgb.red())
                + 587 * u32::from(rgb.green())
                + 114 * u32::from(rgb.blue()))
                / 1000) as u8,
            i: 0.596 * r - 0.274 * g - 0.322 * b,
            q: 0.211 * r - 0.523 * g + 0.312 * b,
        }
    }

    /// Luma of a color: `floor(0.299R + 0.587G + 0.114B)`.
    pub fn luma(rgb: Rgb) -> u8 {
        Self::from_rgb(rgb).y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // Hex parsing
    // =========================================================================

    #[test]
    fn from_hex_six_digits_is_opaque() {
        assert_eq!(Rgb::from_hex("efefef").unwrap().to_array(), [239, 239, 239, 0]);
        assert_eq!(Rgb::from_hex("#efefef").unwrap().to_array(), [239, 239, 239, 0]);
    }

    #[test]
    fn from_hex_eight_digits_halves_leading_alpha() {
        // 0x80 = 128 → floor(128 / 2) = 64
        assert_eq!(
            Rgb::from_hex("#80efefef").unwrap().to_array(),
            [239, 239, 239, 64]
        );
        assert_eq!(
            Rgb::from_hex("80efefef").unwrap().to_array(),
            [239, 239, 239, 64]
        );
    }

    #[test]
    fn from_hex_full_alpha_maps_to_transparent_limit() {
        // 0xFF → floor(255 / 2) = 127
        assert_eq!(Rgb::from_hex("ff000000").unwrap().alpha(), 127);
    }

    #[test]
    fn from_hex_rejects_wrong_length() {
        assert!(Rgb::from_hex("fff").is_err());
        assert!(Rgb::from_hex("efefe").is_err());
        assert!(Rgb::from_hex("#efefefefef").is_err());
        assert!(Rgb::from_hex("").is_err());
    }

    #[test]
    fn from_hex_rejects_non_hex_digits() {
        assert!(Rgb::from_hex("zzefef").is_err());
    }

    // =========================================================================
    // Other input forms
    // =========================================================================

    #[test]
    fn from_int_unpacks_rrggbb() {
        assert_eq!(Rgb::from_int(0xFF8001).to_array(), [255, 128, 1, 0]);
    }

    #[test]
    fn from_channels_three_defaults_transparent() {
        // Unlike hex/int, the slice form defaults alpha to 127. Deliberate.
        assert_eq!(
            Rgb::from_channels(&[10, 20, 30]).unwrap().to_array(),
            [10, 20, 30, 127]
        );
    }

    #[test]
    fn from_channels_four_keeps_alpha() {
        assert_eq!(
            Rgb::from_channels(&[10, 20, 30, 40]).unwrap().to_array(),
            [10, 20, 30, 40]
        );
    }

    #[test]
    fn from_channels_rejects_wrong_length() {
        assert!(Rgb::from_channels(&[1, 2]).is_err());
        assert!(Rgb::from_channels(&[1, 2, 3, 4, 5]).is_err());
    }

    #[test]
    fn from_channels_rejects_alpha_above_127() {
        assert!(Rgb::from_channels(&[1, 2, 3, 128]).is_err());
    }

    #[test]
    fn normalize_accepts_every_form() {
        assert_eq!(
            Rgb::normalize("#efefef").unwrap().to_array(),
            [239, 239, 239, 0]
        );
        assert_eq!(Rgb::normalize(0xefefefu32).unwrap().to_array(), [239, 239, 239, 0]);
        assert_eq!(
            Rgb::normalize([239u8, 239, 239]).unwrap().to_array(),
            [239, 239, 239, 127]
        );
        let rgb = Rgb::opaque(1, 2, 3);
        assert_eq!(Rgb::normalize(rgb).unwrap(), rgb);
    }

    // =========================================================================
    // Alpha conversion and luma
    // =========================================================================

    #[test]
    fn rgba8_round_trip() {
        for alpha in [0u8, 1, 63, 64, 126, 127] {
            let color = Rgb::new(12, 34, 56, alpha).unwrap();
            assert_eq!(Rgb::from_rgba8(color.to_rgba8()), color, "alpha {alpha}");
        }
    }

    #[test]
    fn opaque_maps_to_full_coverage() {
        assert_eq!(Rgb::opaque(1, 2, 3).to_rgba8().0[3], 255);
        assert_eq!(Rgb::transparent_black().to_rgba8().0[3], 0);
    }

    #[test]
    fn luma_uses_floor() {
        // 0.299*255 + 0.587*0 + 0.114*0 = 76.245 → 76
        assert_eq!(Yiq::luma(Rgb::opaque(255, 0, 0)), 76);
        // 0.587*255 = 149.685 → 149
        assert_eq!(Yiq::luma(Rgb::opaque(0, 255, 0)), 149);
        // 0.114*255 = 29.07 → 29
        assert_eq!(Yiq::luma(Rgb::opaque(0, 0, 255)), 29);
    }

    #[test]
    fn luma_of_grey_is_identity() {
        // Coefficients sum to exactly 1, so grey pixels keep their value —
        // the invariant behind greyscale idempotence.
        for g in [0u8, 1, 10, 128, 254, 255] {
            assert_eq!(Yiq::luma(Rgb::opaque(g, g, g)), g);
        }
    }

    #[test]
    fn new_rejects_alpha_out_of_range() {
        assert!(Rgb::new(0, 0, 0, 128).is_err());
        assert!(Rgb::new(0, 0, 0, 127).is_ok());
    }
}
