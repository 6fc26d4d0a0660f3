//! Gamma-encoded sRGB, the form colors are stored in.

use super::linear_rgb::LinearRgb;

/// Encode one linear channel with the sRGB transfer curve (IEC 61966-2-1).
#[inline]
pub(crate) fn encode_gamma(linear: f64) -> f64 {
    if linear <= 0.003_130_8 {
        12.92 * linear
    } else {
        1.055 * linear.powf(1.0 / 2.4) - 0.055
    }
}

/// A color in sRGB, channels in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Srgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Srgb {
    #[inline]
    pub fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    /// # Example
    /// ```
    /// use greytocolor::color::Srgb;
    /// assert_eq!(Srgb::from_u8(255, 0, 0).r, 1.0);
    /// ```
    #[inline]
    pub fn from_u8(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: f64::from(r) / 255.0,
            g: f64::from(g) / 255.0,
            b: f64::from(b) / 255.0,
        }
    }

    #[inline]
    pub fn from_bytes(bytes: [u8; 3]) -> Self {
        Self::from_u8(bytes[0], bytes[1], bytes[2])
    }

    /// `[R, G, B]` bytes, rounded and clamped to `0..=255`.
    #[inline]
    pub fn to_bytes(self) -> [u8; 3] {
        let byte = |v: f64| (v * 255.0).round().clamp(0.0, 255.0) as u8;
        [byte(self.r), byte(self.g), byte(self.b)]
    }
}

impl From<LinearRgb> for Srgb {
    fn from(linear: LinearRgb) -> Self {
        Self {
            r: encode_gamma(linear.r),
            g: encode_gamma(linear.g),
            b: encode_gamma(linear.b),
        }
    }
}
