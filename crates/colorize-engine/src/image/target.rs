//! The greyscale image being colorized.

use super::{Colorizable, FeatureImage};
use crate::align::LuminanceAligner;
use crate::feature::{FeatureError, ImageFeatureGrid, LabPixel};

/// Target of a colorization run.
///
/// Owns its feature grid, the [`LuminanceAligner`] that records how the
/// grid's luminance was moved for matching, and the chroma each pixel had
/// when the image was built. Uncolored pixels always carry that chroma.
///
/// # Example
///
/// ```
/// use colorize_engine::{Colorizable, FeatureImage, LabPixel, TargetImage};
///
/// let mut target = TargetImage::from_lab(2, 2, &[LabPixel::new(1.0, 0.0, 0.0); 4]).unwrap();
/// assert!(target.commit_color(1, 1, 0.3, -0.2));
/// assert!(target.is_colored(1, 1));
///
/// // Colored pixels are never recolored
/// assert!(!target.commit_color(1, 1, 0.0, 0.0));
/// ```
#[derive(Debug, Clone, Default)]
pub struct TargetImage {
    grid: ImageFeatureGrid,
    aligner: LuminanceAligner,
    initial_chroma: Vec<(f64, f64)>,
}

impl TargetImage {
    pub fn new(grid: ImageFeatureGrid) -> Self {
        let initial_chroma = grid
            .pixels()
            .iter()
            .map(|p| (p.chroma_a(), p.chroma_b()))
            .collect();
        Self {
            grid,
            aligner: LuminanceAligner::new(),
            initial_chroma,
        }
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
    pub fn aligner(&self) -> &LuminanceAligner {
        &self.aligner
    }

    /// Current LAB values in row-major order: assigned chroma for colored
    /// pixels, the original chroma for the rest.
    pub fn result_lab(&self) -> Vec<LabPixel> {
        self.grid.pixels().iter().map(|p| p.lab()).collect()
    }

    pub fn into_grid(self) -> ImageFeatureGrid {
        self.grid
    }

    /// Drop the grid and any pending alignment.
    pub fn clear(&mut self) {
        self.grid.clear();
        self.aligner = LuminanceAligner::new();
        self.initial_chroma.clear();
    }
}

impl FeatureImage for TargetImage {
    #[inline]
    fn grid(&self) -> &ImageFeatureGrid {
        &self.grid
    }
}

impl Colorizable for TargetImage {
    #[inline]
    fn grid_mut(&mut self) -> &mut ImageFeatureGrid {
        &mut self.grid
    }

    #[inline]
    fn aligner_parts(&mut self) -> (&mut LuminanceAligner, &mut ImageFeatureGrid) {
        (&mut self.aligner, &mut self.grid)
    }

    fn uncolor_all(&mut self) {
        for (pixel, &(a, b)) in self.grid.pixels_mut().iter_mut().zip(&self.initial_chroma) {
            pixel.set_chroma(a, b);
            pixel.set_colored(false);
        }
    }
}
