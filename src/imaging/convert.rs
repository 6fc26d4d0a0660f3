//! Building engine images from decoded pixels and back.

use colorize_engine::{FeatureImage, LabPixel, SourceImage, TargetImage};

use super::png_io::RgbImage;
use crate::color::{lab_to_srgb, srgb_to_lab};
use crate::error::ImageError;

/// Row-major LAB pixels of a decoded image.
pub fn lab_pixels(image: &RgbImage) -> Result<Vec<LabPixel>, ImageError> {
    if image.is_empty() {
        return Err(ImageError::Empty);
    }
    Ok(image.pixels().iter().map(|&p| srgb_to_lab(p)).collect())
}

/// Target image from decoded pixels.
///
/// Only luminance is kept: any chroma in the file is dropped, so pixels
/// that end up uncolored come out neutral grey.
pub fn target_from_rgb(image: &RgbImage) -> Result<TargetImage, ImageError> {
    let lab: Vec<LabPixel> = lab_pixels(image)?
        .into_iter()
        .map(|p| LabPixel::new(p.l, 0.0, 0.0))
        .collect();
    Ok(TargetImage::from_lab(image.width(), image.height(), &lab)?)
}

/// Source image from decoded pixels, chroma included.
pub fn source_from_rgb(image: &RgbImage) -> Result<SourceImage, ImageError> {
    Ok(SourceImage::from_lab(
        image.width(),
        image.height(),
        &lab_pixels(image)?,
    )?)
}

/// Reconstruct displayable pixels from the target's luminance and chroma.
pub fn result_to_rgb(target: &TargetImage) -> Result<RgbImage, ImageError> {
    let pixels = target.result_lab().into_iter().map(lab_to_srgb).collect();
    RgbImage::new(target.width(), target.height(), pixels)
}
