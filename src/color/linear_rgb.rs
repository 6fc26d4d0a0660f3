//! Linear-light RGB, the bridge between sRGB and Oklab.

use super::srgb::Srgb;

/// Decode one sRGB channel to linear light.
#[inline]
pub(crate) fn decode_gamma(encoded: f64) -> f64 {
    if encoded <= 0.040_45 {
        encoded / 12.92
    } else {
        ((encoded + 0.055) / 1.055).powf(2.4)
    }
}

/// A color in linear RGB. Not clamped; Oklab round trips may leave the
/// unit cube.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearRgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl LinearRgb {
    #[inline]
    pub fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }
}

impl From<Srgb> for LinearRgb {
    fn from(srgb: Srgb) -> Self {
        Self {
            r: decode_gamma(srgb.r),
            g: decode_gamma(srgb.g),
            b: decode_gamma(srgb.b),
        }
    }
}
