//! Conversion between stored RGB and the engine's LAB-like space.
//!
//! Pixels travel `Srgb -> LinearRgb -> Oklab -> LabPixel` on the way in and
//! back on the way out. Oklab lightness (0 for black, 1 for white) is
//! stretched onto `[0, LAB_MAX_LUM]`; the two chromatic axes are passed to
//! the engine unchanged.
//!
//! ```
//! use greytocolor::color::{lab_to_srgb, srgb_to_lab, Srgb};
//!
//! let white = srgb_to_lab(Srgb::from_u8(255, 255, 255));
//! assert!((white.l - 4.2).abs() < 1e-6);
//! assert!(white.a.abs() < 1e-6);
//!
//! let orange = Srgb::from_u8(230, 120, 30);
//! assert_eq!(lab_to_srgb(srgb_to_lab(orange)).to_bytes(), [230, 120, 30]);
//! ```

mod linear_rgb;
mod oklab;
mod srgb;

pub use linear_rgb::LinearRgb;
pub use oklab::Oklab;
pub use srgb::Srgb;

use colorize_engine::{LabPixel, LAB_MAX_LUM};

/// Convert a stored color into the engine's LAB-like space.
#[inline]
pub fn srgb_to_lab(color: Srgb) -> LabPixel {
    let lab = Oklab::from(LinearRgb::from(color));
    LabPixel::new(lab.l * LAB_MAX_LUM, lab.a, lab.b)
}

/// Convert an engine pixel back to a stored color. Out-of-gamut results
/// are clamped when written as bytes.
#[inline]
pub fn lab_to_srgb(pixel: LabPixel) -> Srgb {
    let lab = Oklab::new(pixel.l / LAB_MAX_LUM, pixel.a, pixel.b);
    Srgb::from(LinearRgb::from(lab))
}
