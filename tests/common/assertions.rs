//! Assertion helpers for tests.

use greytocolor::color::{srgb_to_lab, Srgb};
use greytocolor::imaging::RgbImage;
use pretty_assertions::assert_eq;

/// Assert bytes start with the PNG signature
pub fn assert_png(bytes: &[u8]) {
    assert!(
        bytes.starts_with(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]),
        "Expected PNG image, got {} bytes starting with {:?}",
        bytes.len(),
        &bytes[..8.min(bytes.len())]
    );
}

/// Assert two images have the same size and per-pixel lightness within
/// `tolerance` (engine luminance units)
pub fn assert_same_luminance(expected: &RgbImage, actual: &RgbImage, tolerance: f64) {
    assert_eq!(
        (expected.width(), expected.height()),
        (actual.width(), actual.height()),
        "Image sizes differ"
    );
    for (i, (e, a)) in expected.pixels().iter().zip(actual.pixels()).enumerate() {
        let (le, la) = (srgb_to_lab(*e).l, srgb_to_lab(*a).l);
        assert!(
            (le - la).abs() < tolerance,
            "Pixel {i}: luminance {la:.4} differs from {le:.4}"
        );
    }
}

/// Assert a pixel is visibly warmer (more red than blue)
pub fn assert_reddish(pixel: Srgb) {
    let [r, g, b] = pixel.to_bytes();
    assert!(r > b + 20 && r > g, "Expected a red tint, got ({r}, {g}, {b})");
}

/// Assert a pixel is visibly cooler (more blue than red)
pub fn assert_bluish(pixel: Srgb) {
    let [r, g, b] = pixel.to_bytes();
    assert!(b > r + 20, "Expected a blue tint, got ({r}, {g}, {b})");
}
