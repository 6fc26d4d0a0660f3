//! Neighborhood statistics: relative luminance, dispersion (SKO) and entropy.
//!
//! Dispersion and entropy are computed over square windows centred on each
//! pixel. Windows are clipped at the image borders: offsets that fall outside
//! the grid are left out, never wrapped or mirrored. The center pixel itself
//! is part of its window, so a 1x1 image still has a one-pixel neighborhood.

use std::collections::HashMap;

use super::error::FeatureError;
use super::grid::ImageFeatureGrid;
use super::pixel::PixelFeature;
use super::{
    DEFAULT_DISPERSION_WINDOW, DEFAULT_ENTROPY_WINDOW, ENTROPY_MAX, LAB_LUM_HIST_DIVIDER,
    LAB_MAX_LUM, SKO_MAX,
};

/// Raw SKO of a neighborhood: `sqrt(sum((center - n)^2))`.
///
/// # Errors
///
/// - [`FeatureError::EmptyNeighborhood`] when `neighbors` is empty
/// - [`FeatureError::NegativeLuminance`] when `center` is negative
///
/// # Example
///
/// ```
/// use colorize_engine::feature::pixel_dispersion;
///
/// assert_eq!(pixel_dispersion(1.0, &[1.0; 9]).unwrap(), 0.0);
/// assert!(pixel_dispersion(1.0, &[]).is_err());
/// ```
pub fn pixel_dispersion(center: f64, neighbors: &[f64]) -> Result<f64, FeatureError> {
    if neighbors.is_empty() {
        return Err(FeatureError::EmptyNeighborhood);
    }
    if center < 0.0 {
        return Err(FeatureError::NegativeLuminance(center));
    }

    let sum: f64 = neighbors.iter().map(|&n| (center - n).powi(2)).sum();
    Ok(sum.sqrt())
}

/// Shannon entropy (bits) of a neighborhood's relative luminance histogram.
///
/// Histogram bins are `LAB_LUM_HIST_DIVIDER` LAB units wide.
pub fn pixel_entropy(values: &[f64]) -> Result<f64, FeatureError> {
    if values.is_empty() {
        return Err(FeatureError::EmptyNeighborhood);
    }

    let bin_width = LAB_LUM_HIST_DIVIDER / LAB_MAX_LUM;
    let mut histogram: HashMap<i64, usize> = HashMap::new();
    for &value in values {
        *histogram.entry((value / bin_width).floor() as i64).or_insert(0) += 1;
    }

    let total = values.len() as f64;
    let entropy = histogram
        .values()
        .map(|&count| {
            let p = count as f64 / total;
            -p * p.log2()
        })
        .sum::<f64>();

    // A single bin gives -1 * log2(1) = -0.0
    Ok(entropy.max(0.0))
}

/// Largest raw SKO a `side x side` window of relative luminances can reach.
///
/// The center contributes nothing to its own sum, and each of the other
/// `side² - 1` terms is at most `1.0` (relative luminances live in `[0, 1]`),
/// so the square root of that count bounds the raw value. Dividing by it
/// keeps dispersion in `[0, SKO_MAX]` for every window size without looking
/// at the image.
///
/// # Arguments
///
/// * `side` - Window side, already checked to be odd and at least 3
#[inline]
fn dispersion_divisor(side: usize) -> f64 {
    SKO_MAX * (((side * side) - 1) as f64).sqrt()
}

/// Entropy normalization constant for a `side x side` window.
///
/// A window of `n` values has at most `log2(n)` bits of entropy (every value
/// in its own bin). `ENTROPY_MAX` covers the default 11x11 window
/// (log2(121) < 7), so default results stay comparable with a fixed scale;
/// bigger windows normalize by their own maximum so they stay inside `[0, 1]`.
///
/// # Arguments
///
/// * `side` - Window side, already checked to be odd and at least 3
#[inline]
fn entropy_divisor(side: usize) -> f64 {
    ENTROPY_MAX.max(((side * side) as f64).log2())
}

fn check_window(side: usize) -> Result<usize, FeatureError> {
    if side < 3 || side % 2 == 0 {
        return Err(FeatureError::InvalidWindow(side));
    }
    Ok(side)
}

/// Computes the per-pixel features of an [`ImageFeatureGrid`].
///
/// # Example
///
/// ```
/// use colorize_engine::{FeatureExtractor, ImageFeatureGrid, LabPixel};
///
/// let mut grid = ImageFeatureGrid::filled(3, 3, LabPixel::new(1.0, 0.0, 0.0));
/// let extractor = FeatureExtractor::default();
/// extractor.extract(&mut grid, true);
///
/// let center = grid.get(1, 1).unwrap();
/// assert_eq!(center.dispersion(), Some(0.0));
/// assert_eq!(center.entropy(), Some(0.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureExtractor {
    dispersion_window: usize,
    entropy_window: usize,
}

impl Default for FeatureExtractor {
    fn default() -> Self {
        Self {
            dispersion_window: DEFAULT_DISPERSION_WINDOW,
            entropy_window: DEFAULT_ENTROPY_WINDOW,
        }
    }
}

impl FeatureExtractor {
    /// Create an extractor with custom window sides.
    ///
    /// # Errors
    ///
    /// [`FeatureError::InvalidWindow`] unless both sides are odd and >= 3.
    pub fn new(dispersion_window: usize, entropy_window: usize) -> Result<Self, FeatureError> {
        Ok(Self {
            dispersion_window: check_window(dispersion_window)?,
            entropy_window: check_window(entropy_window)?,
        })
    }

    #[inline]
    pub fn dispersion_window(&self) -> usize {
        self.dispersion_window
    }

    #[inline]
    pub fn entropy_window(&self) -> usize {
        self.entropy_window
    }

    /// Set relative luminance on every pixel.
    ///
    /// Returns the number of pixels whose luminance was outside the LAB
    /// domain. Those pixels are left at the sentinel.
    pub fn relative_luminance(&self, grid: &mut ImageFeatureGrid) -> usize {
        grid.pixels_mut()
            .iter_mut()
            .filter_map(|pixel| pixel.refresh_relative_luminance().err())
            .count()
    }

    /// Set normalized dispersion on every pixel.
    ///
    /// Pixels whose window has an uncomputed relative luminance get no value.
    /// Returns the number of such pixels.
    pub fn dispersion(&self, grid: &mut ImageFeatureGrid) -> usize {
        let divisor = dispersion_divisor(self.dispersion_window);
        self.apply_window(
            grid,
            self.dispersion_window,
            "dispersion",
            |center, window| pixel_dispersion(center, window).map(|raw| raw / divisor),
            PixelFeature::set_dispersion,
        )
    }

    /// Set normalized entropy on every pixel. Returns the number of pixels
    /// left without a value.
    pub fn entropy(&self, grid: &mut ImageFeatureGrid) -> usize {
        let divisor = entropy_divisor(self.entropy_window);
        self.apply_window(
            grid,
            self.entropy_window,
            "entropy",
            |_, window| pixel_entropy(window).map(|bits| bits / divisor),
            PixelFeature::set_entropy,
        )
    }

    /// Relative luminance, dispersion and optionally entropy in one pass.
    ///
    /// Every derived feature is dropped first, so a pixel ends up with values
    /// from this pass or the sentinel, never with leftovers of an earlier one.
    pub fn extract(&self, grid: &mut ImageFeatureGrid, with_entropy: bool) -> usize {
        grid.pixels_mut()
            .iter_mut()
            .for_each(PixelFeature::reset_features);

        let mut missing = self.relative_luminance(grid);
        missing += self.dispersion(grid);
        if with_entropy {
            missing += self.entropy(grid);
        }
        missing
    }

    fn apply_window<F>(
        &self,
        grid: &mut ImageFeatureGrid,
        side: usize,
        feature: &'static str,
        calc: F,
        store: fn(&mut PixelFeature, f64) -> Result<(), FeatureError>,
    ) -> usize
    where
        F: Fn(f64, &[f64]) -> Result<f64, FeatureError>,
    {
        let (width, height) = (grid.width(), grid.height());
        let mut values = Vec::with_capacity(grid.len());
        for y in 0..height {
            for x in 0..width {
                let value = grid
                    .get(x, y)
                    .and_then(|p| p.relative_luminance())
                    .zip(grid.window_relative_luminances(x, y, side))
                    .and_then(|(center, window)| calc(center, &window).ok());
                values.push(value);
            }
        }

        let mut missing = 0;
        for (pixel, value) in grid.pixels_mut().iter_mut().zip(values) {
            let stored = value.map(|v| store(pixel, v));
            if !matches!(stored, Some(Ok(()))) {
                missing += 1;
            }
        }

        if missing > 0 {
            tracing::debug!(feature, missing, "Pixels left without a value");
        }
        missing
    }
}
