//! Per-pixel features in the luminance/texture space.
//!
//! Every pixel of both the target and the source image carries a
//! [`PixelFeature`]: its LAB luminance and chroma plus three derived values
//! in `[0, 1]` used for matching.
//!
//! | Feature | Window | Meaning |
//! |---------|--------|---------|
//! | relative luminance | 1x1 | `luminance / LAB_MAX_LUM` |
//! | dispersion (SKO) | 5x5 | local luminance contrast |
//! | entropy | 11x11 | local luminance histogram randomness |
//!
//! Only relative luminance and dispersion drive the matcher; entropy is
//! computed alongside as an extra texture descriptor.

mod error;
mod extract;
mod grid;
mod pixel;

pub use error::FeatureError;
pub use extract::{pixel_dispersion, pixel_entropy, FeatureExtractor};
pub use grid::ImageFeatureGrid;
pub use pixel::{LabPixel, PixelFeature};

/// Lower bound of the LAB luminance domain.
pub const LAB_MIN_LUM: f64 = 0.0;

/// Upper bound of the LAB luminance domain.
pub const LAB_MAX_LUM: f64 = 4.2;

/// Width of a luminance histogram bin, in LAB units.
pub const LAB_LUM_HIST_DIVIDER: f64 = 0.001;

/// Normalization ceiling for dispersion.
pub const SKO_MAX: f64 = 1.0;

/// Entropy (bits) that maps to 1.0 for the default entropy window.
pub const ENTROPY_MAX: f64 = 7.0;

/// Default side of the dispersion window.
pub const DEFAULT_DISPERSION_WINDOW: usize = 5;

/// Default side of the entropy window.
pub const DEFAULT_ENTROPY_WINDOW: usize = 11;
