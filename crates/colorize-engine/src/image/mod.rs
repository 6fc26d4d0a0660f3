//! Target and source images.
//!
//! Both images wrap an [`ImageFeatureGrid`]. What each of them may do is
//! expressed by two capability traits instead of a shared mutable base:
//!
//! - [`FeatureImage`]: read access to features, implemented by both
//! - [`Colorizable`]: chroma writes, colored flags and luminance alignment,
//!   implemented only by [`TargetImage`]
//!
//! The source image is never colorized and never aligned, so the type
//! system keeps the orchestrator from touching it that way.

mod source;
mod target;

pub use source::SourceImage;
pub use target::TargetImage;

use crate::align::LuminanceAligner;
use crate::feature::{ImageFeatureGrid, PixelFeature};

/// Read access to an image's feature grid.
pub trait FeatureImage {
    fn grid(&self) -> &ImageFeatureGrid;

    #[inline]
    fn width(&self) -> usize {
        self.grid().width()
    }

    #[inline]
    fn height(&self) -> usize {
        self.grid().height()
    }

    #[inline]
    fn is_empty(&self) -> bool {
        self.grid().is_empty()
    }

    #[inline]
    fn feature(&self, x: usize, y: usize) -> Option<&PixelFeature> {
        self.grid().get(x, y)
    }

    #[inline]
    fn max_luminance(&self) -> Option<f64> {
        self.grid().max_luminance()
    }

    #[inline]
    fn min_luminance(&self) -> Option<f64> {
        self.grid().min_luminance()
    }
}

/// An image that can receive chroma from a match.
pub trait Colorizable: FeatureImage {
    fn grid_mut(&mut self) -> &mut ImageFeatureGrid;

    /// Grid and aligner borrowed together, for alignment calls.
    fn aligner_parts(&mut self) -> (&mut LuminanceAligner, &mut ImageFeatureGrid);

    #[inline]
    fn is_colored(&self, x: usize, y: usize) -> bool {
        self.feature(x, y).is_some_and(PixelFeature::is_colored)
    }

    /// Assign chroma to `(x, y)` and mark it colored.
    ///
    /// Returns `false` (and changes nothing) if the pixel is outside the
    /// image or already colored.
    fn commit_color(&mut self, x: usize, y: usize, chroma_a: f64, chroma_b: f64) -> bool {
        match self.grid_mut().get_mut(x, y) {
            Some(pixel) if !pixel.is_colored() => {
                pixel.set_chroma(chroma_a, chroma_b);
                pixel.set_colored(true);
                true
            }
            _ => false,
        }
    }

    /// Reset every colored flag and put back the chroma the image had
    /// before any run, so skipped pixels never show an earlier run's color.
    /// Only valid between runs.
    fn uncolor_all(&mut self);

    /// Number of pixels currently colored.
    fn colored_count(&self) -> usize {
        self.grid().pixels().iter().filter(|p| p.is_colored()).count()
    }
}
