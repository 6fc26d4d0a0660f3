//! Dense 2-D grid of pixel features.

use super::error::FeatureError;
use super::pixel::{LabPixel, PixelFeature};

/// Row-major grid of [`PixelFeature`]s with fixed dimensions.
///
/// Coordinates are `(x, y)` with `x < width`, `y < height`. Access outside
/// the grid returns `None`; there is no wraparound.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImageFeatureGrid {
    width: usize,
    height: usize,
    pixels: Vec<PixelFeature>,
}

impl ImageFeatureGrid {
    /// Build a grid from row-major LAB pixels.
    ///
    /// # Errors
    ///
    /// [`FeatureError::DimensionMismatch`] when `pixels.len() != width * height`.
    ///
    /// # Example
    ///
    /// ```
    /// use colorize_engine::{ImageFeatureGrid, LabPixel};
    ///
    /// let grid = ImageFeatureGrid::from_lab(2, 1, &[LabPixel::default(); 2]).unwrap();
    /// assert_eq!(grid.width(), 2);
    /// assert!(grid.get(2, 0).is_none());
    /// ```
    pub fn from_lab(
        width: usize,
        height: usize,
        pixels: &[LabPixel],
    ) -> Result<Self, FeatureError> {
        let expected = width * height;
        if pixels.len() != expected {
            return Err(FeatureError::DimensionMismatch {
                width,
                height,
                expected,
                actual: pixels.len(),
            });
        }

        Ok(Self {
            width,
            height,
            pixels: pixels.iter().copied().map(PixelFeature::from_lab).collect(),
        })
    }

    /// Build a grid of `width * height` copies of one LAB pixel.
    pub fn filled(width: usize, height: usize, lab: LabPixel) -> Self {
        Self {
            width,
            height,
            pixels: vec![PixelFeature::from_lab(lab); width * height],
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    #[inline]
    fn index(&self, x: usize, y: usize) -> Option<usize> {
        (x < self.width && y < self.height).then(|| y * self.width + x)
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Option<&PixelFeature> {
        self.index(x, y).map(|i| &self.pixels[i])
    }

    #[inline]
    pub fn get_mut(&mut self, x: usize, y: usize) -> Option<&mut PixelFeature> {
        self.index(x, y).map(|i| &mut self.pixels[i])
    }

    /// All pixels in row-major order.
    #[inline]
    pub fn pixels(&self) -> &[PixelFeature] {
        &self.pixels
    }

    #[inline]
    pub fn pixels_mut(&mut self) -> &mut [PixelFeature] {
        &mut self.pixels
    }

    /// Largest LAB luminance, `None` for an empty grid.
    pub fn max_luminance(&self) -> Option<f64> {
        self.pixels
            .iter()
            .map(PixelFeature::luminance)
            .reduce(f64::max)
    }

    /// Smallest LAB luminance, `None` for an empty grid.
    pub fn min_luminance(&self) -> Option<f64> {
        self.pixels
            .iter()
            .map(PixelFeature::luminance)
            .reduce(f64::min)
    }

    /// Relative luminances of the `side x side` window centred on `(x, y)`,
    /// clipped at the borders. The center pixel is included.
    ///
    /// Returns `None` if any pixel in the window has no relative luminance.
    pub fn window_relative_luminances(&self, x: usize, y: usize, side: usize) -> Option<Vec<f64>> {
        let half = side / 2;
        let x0 = x.saturating_sub(half);
        let y0 = y.saturating_sub(half);
        let x1 = (x + half).min(self.width.saturating_sub(1));
        let y1 = (y + half).min(self.height.saturating_sub(1));

        let mut values = Vec::with_capacity(side * side);
        for wy in y0..=y1 {
            for wx in x0..=x1 {
                values.push(self.get(wx, wy)?.relative_luminance()?);
            }
        }
        Some(values)
    }

    /// Drop every pixel; the grid becomes 0x0.
    pub fn clear(&mut self) {
        self.pixels.clear();
        self.width = 0;
        self.height = 0;
    }
}
