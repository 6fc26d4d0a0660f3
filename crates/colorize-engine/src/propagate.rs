//! Spreading a resolved chroma to similar neighbors.
//!
//! After the matcher colors a pixel, [`NeighborPropagator`] copies the same
//! chroma to adjacent uncolored pixels whose luminance and dispersion are
//! close to their already-colored neighbor. This skips the random search for
//! most pixels of flat regions and keeps those regions a single color.
//!
//! # Traversal
//!
//! ```text
//!   S . . .      S = seed, walk down the seed's column
//!   v > > x      each accepted cell below starts a walk to the right
//!   v > x        each accepted cell of a rightward walk becomes a new seed
//!   x            a walk stops at the border, a colored cell, or a rejection
//! ```
//!
//! Seeds wait on an explicit stack, so the depth of the flood is bounded by
//! heap memory rather than the call stack.

use crate::feature::PixelFeature;
use crate::image::Colorizable;

/// Flood-style chroma propagation over a target image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NeighborPropagator {
    luminance_threshold: f64,
    dispersion_threshold: f64,
}

impl NeighborPropagator {
    #[inline]
    pub fn new(luminance_threshold: f64, dispersion_threshold: f64) -> Self {
        Self {
            luminance_threshold,
            dispersion_threshold,
        }
    }

    /// Whether `next` is close enough to `prev` to share its chroma.
    ///
    /// Both differences must be strictly below their thresholds, and both
    /// pixels need a computed dispersion.
    pub fn is_similar(&self, prev: &PixelFeature, next: &PixelFeature) -> bool {
        match (prev.dispersion(), next.dispersion()) {
            (Some(prev_dispersion), Some(next_dispersion)) => {
                (prev.luminance() - next.luminance()).abs() < self.luminance_threshold
                    && (prev_dispersion - next_dispersion).abs() < self.dispersion_threshold
            }
            _ => false,
        }
    }

    fn accepts<T: Colorizable + ?Sized>(
        &self,
        target: &T,
        prev: (usize, usize),
        next: (usize, usize),
    ) -> bool {
        if target.is_colored(next.0, next.1) {
            return false;
        }
        match (target.feature(prev.0, prev.1), target.feature(next.0, next.1)) {
            (Some(p), Some(n)) => self.is_similar(p, n),
            _ => false,
        }
    }

    /// Spread the chroma of the colored pixel `(x, y)`.
    ///
    /// Returns the number of pixels colored. Does nothing if `(x, y)` is
    /// outside the image or not colored yet.
    pub fn propagate<T: Colorizable + ?Sized>(&self, target: &mut T, x: usize, y: usize) -> usize {
        let Some(seed) = target.feature(x, y).filter(|p| p.is_colored()) else {
            return 0;
        };
        let (chroma_a, chroma_b) = (seed.chroma_a(), seed.chroma_b());
        let (width, height) = (target.width(), target.height());

        let mut pending = vec![(x, y)];
        let mut colored = 0;

        while let Some((column, start_row)) = pending.pop() {
            let mut above = start_row;
            while above + 1 < height {
                let row = above + 1;
                if !self.accepts(target, (column, above), (column, row)) {
                    break;
                }
                target.commit_color(column, row, chroma_a, chroma_b);
                colored += 1;

                let mut left = column;
                while left + 1 < width {
                    let right = left + 1;
                    if !self.accepts(target, (left, row), (right, row)) {
                        break;
                    }
                    target.commit_color(right, row, chroma_a, chroma_b);
                    colored += 1;
                    pending.push((right, row));
                    left = right;
                }

                above = row;
            }
        }

        colored
    }
}
