//! Test images and files.

use std::path::{Path, PathBuf};

use colorize_engine::LabPixel;
use greytocolor::color::{lab_to_srgb, srgb_to_lab, Srgb};
use greytocolor::imaging::{save_png, RgbImage};

/// Dark red used for the left half of two-tone sources
pub const DARK_RED: [u8; 3] = [130, 30, 25];

/// Light blue used for the right half of two-tone sources
pub const LIGHT_BLUE: [u8; 3] = [150, 190, 250];

/// Neutral grey with the same lightness as `color`
pub fn grey_like(color: [u8; 3]) -> Srgb {
    let lab = srgb_to_lab(Srgb::from_bytes(color));
    lab_to_srgb(LabPixel::new(lab.l, 0.0, 0.0))
}

/// `width x height` image, `left` in the left half and `right` in the rest
pub fn two_tone(width: usize, height: usize, left: Srgb, right: Srgb) -> RgbImage {
    let pixels = (0..height)
        .flat_map(|_| (0..width).map(move |x| if x < width / 2 { left } else { right }))
        .collect();
    RgbImage::new(width, height, pixels).unwrap()
}

/// Two-tone color source: dark red left, light blue right
pub fn color_source(width: usize, height: usize) -> RgbImage {
    two_tone(
        width,
        height,
        Srgb::from_bytes(DARK_RED),
        Srgb::from_bytes(LIGHT_BLUE),
    )
}

/// Greyscale version of [`color_source`]
pub fn grey_target(width: usize, height: usize) -> RgbImage {
    two_tone(width, height, grey_like(DARK_RED), grey_like(LIGHT_BLUE))
}

/// Save `image` as `name` inside `dir` and return the path
pub fn write_png(dir: &Path, name: &str, image: &RgbImage) -> PathBuf {
    let path = dir.join(name);
    save_png(&path, image).unwrap();
    path
}
