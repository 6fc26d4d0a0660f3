//! The color image that chroma is taken from.

use super::FeatureImage;
use crate::feature::{FeatureError, ImageFeatureGrid, LabPixel};

/// Source of a colorization run. Read-only apart from feature extraction.
#[derive(Debug, Clone, Default)]
pub struct SourceImage {
    grid: ImageFeatureGrid,
}

impl SourceImage {
    pub fn new(grid: ImageFeatureGrid) -> Self {
        Self { grid }
    }

    /// Build from row-major LAB pixels.
    pub fn from_lab(
        width: usize,
        height: usize,
        pixels: &[LabPixel],
    ) -> Result<Self, FeatureError> {
        Ok(Self::new(ImageFeatureGrid::from_lab(width, height, pixels)?))
    }

    #[inline]
    pub(crate) fn grid_mut(&mut self) -> &mut ImageFeatureGrid {
        &mut self.grid
    }

    pub fn into_grid(self) -> ImageFeatureGrid {
        self.grid
    }

    pub fn clear(&mut self) {
        self.grid.clear();
    }
}

impl FeatureImage for SourceImage {
    #[inline]
    fn grid(&self) -> &ImageFeatureGrid {
        &self.grid
    }
}
