//! Per-pixel feature record.

use super::error::FeatureError;
use super::LAB_MAX_LUM;

/// A pixel in the engine's LAB-like color space.
///
/// `l` lives in `[LAB_MIN_LUM, LAB_MAX_LUM]`; `a` and `b` are the two
/// chromatic channels. This is the only thing the engine needs from an
/// RGB converter.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LabPixel {
    /// Luminance
    pub l: f64,
    /// First chromatic channel
    pub a: f64,
    /// Second chromatic channel
    pub b: f64,
}

impl LabPixel {
    #[inline]
    pub fn new(l: f64, a: f64, b: f64) -> Self {
        Self { l, a, b }
    }
}

/// Luminance, texture statistics and chroma of one pixel.
///
/// The three relative features (`relative_luminance`, `dispersion`,
/// `entropy`) are `None` until they have been computed successfully. Their
/// setters reject anything outside `[0, 1]` and keep the previous value, so
/// a feature is either valid or uncomputed, never clamped.
///
/// # Example
///
/// ```
/// use colorize_engine::{LabPixel, PixelFeature};
///
/// let mut pixel = PixelFeature::from_lab(LabPixel::new(2.1, 0.0, 0.0));
/// assert_eq!(pixel.relative_luminance(), None);
///
/// pixel.calc_relative_luminance().unwrap();
/// assert_eq!(pixel.relative_luminance(), Some(0.5));
///
/// assert!(pixel.set_dispersion(1.2).is_err());
/// assert_eq!(pixel.dispersion(), None);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PixelFeature {
    luminance: f64,
    relative_luminance: Option<f64>,
    chroma_a: f64,
    chroma_b: f64,
    dispersion: Option<f64>,
    entropy: Option<f64>,
    colored: bool,
}

fn check_relative(feature: &'static str, value: f64) -> Result<f64, FeatureError> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(FeatureError::OutOfRange { feature, value })
    }
}

impl PixelFeature {
    /// Create an uncomputed, uncolored feature from a LAB triple.
    pub fn from_lab(lab: LabPixel) -> Self {
        Self {
            luminance: lab.l,
            chroma_a: lab.a,
            chroma_b: lab.b,
            ..Self::default()
        }
    }

    /// LAB luminance (possibly aligned).
    #[inline]
    pub fn luminance(&self) -> f64 {
        self.luminance
    }

    #[inline]
    pub(crate) fn set_luminance(&mut self, luminance: f64) {
        self.luminance = luminance;
    }

    #[inline]
    pub fn relative_luminance(&self) -> Option<f64> {
        self.relative_luminance
    }

    /// Store a relative luminance in `[0, 1]`.
    pub fn set_relative_luminance(&mut self, value: f64) -> Result<(), FeatureError> {
        self.relative_luminance = Some(check_relative("relative luminance", value)?);
        Ok(())
    }

    /// Derive relative luminance from the current LAB luminance.
    ///
    /// A luminance outside the LAB domain leaves the previous value in place.
    pub fn calc_relative_luminance(&mut self) -> Result<(), FeatureError> {
        self.set_relative_luminance(self.luminance / LAB_MAX_LUM)
    }

    /// Recompute relative luminance after the LAB luminance has moved.
    ///
    /// Unlike [`calc_relative_luminance`](Self::calc_relative_luminance), a
    /// rejected value leaves the sentinel: the previous value belongs to a
    /// luminance the pixel no longer has.
    pub fn refresh_relative_luminance(&mut self) -> Result<(), FeatureError> {
        self.relative_luminance = None;
        self.calc_relative_luminance()
    }

    #[inline]
    pub fn dispersion(&self) -> Option<f64> {
        self.dispersion
    }

    pub fn set_dispersion(&mut self, value: f64) -> Result<(), FeatureError> {
        self.dispersion = Some(check_relative("dispersion", value)?);
        Ok(())
    }

    #[inline]
    pub fn entropy(&self) -> Option<f64> {
        self.entropy
    }

    pub fn set_entropy(&mut self, value: f64) -> Result<(), FeatureError> {
        self.entropy = Some(check_relative("entropy", value)?);
        Ok(())
    }

    /// Drop all derived features back to the uncomputed state.
    pub fn reset_features(&mut self) {
        self.relative_luminance = None;
        self.dispersion = None;
        self.entropy = None;
    }

    #[inline]
    pub fn chroma_a(&self) -> f64 {
        self.chroma_a
    }

    #[inline]
    pub fn chroma_b(&self) -> f64 {
        self.chroma_b
    }

    #[inline]
    pub fn set_chroma(&mut self, a: f64, b: f64) {
        self.chroma_a = a;
        self.chroma_b = b;
    }

    #[inline]
    pub fn is_colored(&self) -> bool {
        self.colored
    }

    #[inline]
    pub(crate) fn set_colored(&mut self, colored: bool) {
        self.colored = colored;
    }

    /// The pixel as a LAB triple.
    #[inline]
    pub fn lab(&self) -> LabPixel {
        LabPixel::new(self.luminance, self.chroma_a, self.chroma_b)
    }
}
