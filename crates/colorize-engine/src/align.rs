//! Luminance alignment of the target image.
//!
//! Before matching, the target's luminance distribution is moved into the
//! source's dynamic range. [`LuminanceAligner`] remembers every transform it
//! applied so that [`LuminanceAligner::restore`] can put the original
//! luminance back without looking at the source image again.

use std::collections::HashMap;

use thiserror::Error;

use crate::feature::{ImageFeatureGrid, LAB_LUM_HIST_DIVIDER};

/// Error type for luminance alignment.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AlignError {
    /// Scale factor is zero, negative, or not finite
    #[error("invalid luminance scale factor {0}")]
    InvalidScaleFactor(f64),

    /// Requested bounds are not strictly increasing
    #[error("invalid target range: {0}")]
    InvalidRange(String),

    /// Every pixel has the same luminance, so there is no range to remap
    #[error("image luminance has zero range ({0})")]
    ZeroRange(f64),

    /// Grid has no pixels
    #[error("image is empty")]
    EmptyImage,
}

/// One reversible luminance transform.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Transform {
    Scale(f64),
    /// Scale that pins the old maximum onto `to_max` exactly
    ScaleTo { factor: f64, from_max: f64, to_max: f64 },
    /// Affine `[from_min, from_max] -> [to_min, to_max]`
    Borders { from: (f64, f64), to: (f64, f64) },
    /// Two affine segments meeting at the modal luminance
    Center {
        from: (f64, f64, f64),
        to: (f64, f64, f64),
    },
}

#[inline]
fn remap(value: f64, from: (f64, f64), to: (f64, f64)) -> f64 {
    let (from_min, from_max) = from;
    let (to_min, to_max) = to;
    if value == from_max {
        return to_max;
    }
    if value == from_min {
        return to_min;
    }
    to_min + (value - from_min) * (to_max - to_min) / (from_max - from_min)
}

#[inline]
fn remap_two_segment(value: f64, from: (f64, f64, f64), to: (f64, f64, f64)) -> f64 {
    let (from_min, from_center, from_max) = from;
    let (to_min, to_center, to_max) = to;
    if value <= from_center {
        if from_center == from_min {
            to_center
        } else {
            remap(value, (from_min, from_center), (to_min, to_center))
        }
    } else if from_max == from_center {
        to_center
    } else {
        remap(value, (from_center, from_max), (to_center, to_max))
    }
}

impl Transform {
    fn apply(&self, value: f64) -> f64 {
        match *self {
            Transform::Scale(factor) => value * factor,
            Transform::ScaleTo {
                factor,
                from_max,
                to_max,
            } => {
                if value >= from_max {
                    to_max
                } else {
                    (value * factor).min(to_max)
                }
            }
            Transform::Borders { from, to } => remap(value, from, to),
            Transform::Center { from, to } => remap_two_segment(value, from, to),
        }
    }

    fn invert(&self, value: f64) -> f64 {
        match *self {
            Transform::Scale(factor) => value / factor,
            Transform::ScaleTo {
                factor,
                from_max,
                to_max,
            } => {
                if value >= to_max {
                    from_max
                } else {
                    value / factor
                }
            }
            Transform::Borders { from, to } => remap(value, to, from),
            Transform::Center { from, to } => remap_two_segment(value, to, from),
        }
    }
}

/// Most common luminance of a grid.
///
/// Luminances are binned `LAB_LUM_HIST_DIVIDER` wide; the result is the
/// center of the fullest bin (lowest bin on ties), kept inside the grid's
/// `[min, max]`. `None` for an empty grid.
pub fn most_common_luminance(grid: &ImageFeatureGrid) -> Option<f64> {
    let min = grid.min_luminance()?;
    let max = grid.max_luminance()?;

    let mut histogram: HashMap<i64, usize> = HashMap::new();
    for pixel in grid.pixels() {
        let bin = (pixel.luminance() / LAB_LUM_HIST_DIVIDER).floor() as i64;
        *histogram.entry(bin).or_insert(0) += 1;
    }

    let (bin, _) = histogram
        .into_iter()
        .max_by(|(bin_a, count_a), (bin_b, count_b)| count_a.cmp(count_b).then(bin_b.cmp(bin_a)))?;

    let center = (bin as f64 + 0.5) * LAB_LUM_HIST_DIVIDER;
    Some(center.clamp(min, max))
}

/// Reversible luminance rescaling of a target grid.
///
/// # Example
///
/// ```
/// use colorize_engine::{ImageFeatureGrid, LabPixel, LuminanceAligner};
///
/// let mut grid = ImageFeatureGrid::filled(2, 2, LabPixel::new(1.5, 0.0, 0.0));
/// let mut aligner = LuminanceAligner::new();
///
/// aligner.scale(&mut grid, 2.0).unwrap();
/// assert_eq!(grid.get(0, 0).unwrap().luminance(), 3.0);
///
/// aligner.restore(&mut grid);
/// assert_eq!(grid.get(0, 0).unwrap().luminance(), 1.5);
/// ```
#[derive(Debug, Clone, Default)]
pub struct LuminanceAligner {
    applied: Vec<Transform>,
}

impl LuminanceAligner {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether any transform is waiting to be restored.
    #[inline]
    pub fn is_aligned(&self) -> bool {
        !self.applied.is_empty()
    }

    /// Product of the scale factors currently applied (1.0 when none).
    pub fn scale_factor(&self) -> f64 {
        self.applied
            .iter()
            .filter_map(|t| match t {
                Transform::Scale(factor) | Transform::ScaleTo { factor, .. } => Some(*factor),
                _ => None,
            })
            .product()
    }

    /// Multiply every pixel's LAB luminance by `factor`.
    ///
    /// # Errors
    ///
    /// [`AlignError::InvalidScaleFactor`] for non-positive or non-finite
    /// factors. The grid is left unchanged.
    pub fn scale(&mut self, grid: &mut ImageFeatureGrid, factor: f64) -> Result<(), AlignError> {
        if !factor.is_finite() || factor <= 0.0 {
            return Err(AlignError::InvalidScaleFactor(factor));
        }
        self.apply(grid, Transform::Scale(factor));
        Ok(())
    }

    /// Scale the grid so its maximum luminance becomes exactly `new_max`.
    ///
    /// The factor is `new_max / max`. Pixels at the old maximum are set to
    /// `new_max` itself instead of the rounded product, and no pixel is
    /// scaled above it, so a maximum that lands on the domain ceiling stays
    /// inside the domain. Returns the factor.
    ///
    /// # Errors
    ///
    /// - [`AlignError::EmptyImage`] for a grid without pixels
    /// - [`AlignError::InvalidScaleFactor`] if the factor is not positive and
    ///   finite (for example an all-black grid)
    pub fn scale_to_max(
        &mut self,
        grid: &mut ImageFeatureGrid,
        new_max: f64,
    ) -> Result<f64, AlignError> {
        let max = grid.max_luminance().ok_or(AlignError::EmptyImage)?;
        let factor = new_max / max;
        if !factor.is_finite() || factor <= 0.0 {
            return Err(AlignError::InvalidScaleFactor(factor));
        }

        self.apply(
            grid,
            Transform::ScaleTo {
                factor,
                from_max: max,
                to_max: new_max,
            },
        );
        Ok(factor)
    }

    /// Affinely remap the grid's `[min, max]` luminance to `[new_min, new_max]`.
    pub fn normalize_by_borders(
        &mut self,
        grid: &mut ImageFeatureGrid,
        new_min: f64,
        new_max: f64,
    ) -> Result<(), AlignError> {
        if !(new_min < new_max) {
            return Err(AlignError::InvalidRange(format!("{new_min} >= {new_max}")));
        }
        let (min, max) = Self::bounds(grid)?;

        self.apply(
            grid,
            Transform::Borders {
                from: (min, max),
                to: (new_min, new_max),
            },
        );
        Ok(())
    }

    /// Remap luminance in two segments so the modal luminance lands on
    /// `new_center`: `[min, mode] -> [new_min, new_center]` and
    /// `[mode, max] -> [new_center, new_max]`.
    pub fn normalize_by_center(
        &mut self,
        grid: &mut ImageFeatureGrid,
        new_min: f64,
        new_center: f64,
        new_max: f64,
    ) -> Result<(), AlignError> {
        if !(new_min < new_center && new_center < new_max) {
            return Err(AlignError::InvalidRange(format!(
                "{new_min} < {new_center} < {new_max} does not hold"
            )));
        }
        let (min, max) = Self::bounds(grid)?;
        let center = most_common_luminance(grid).ok_or(AlignError::EmptyImage)?;

        self.apply(
            grid,
            Transform::Center {
                from: (min, center, max),
                to: (new_min, new_center, new_max),
            },
        );
        Ok(())
    }

    /// Undo every applied transform, newest first, and recompute relative
    /// luminance. Does nothing if the grid was never aligned.
    pub fn restore(&mut self, grid: &mut ImageFeatureGrid) {
        if self.applied.is_empty() {
            return;
        }

        while let Some(transform) = self.applied.pop() {
            for pixel in grid.pixels_mut() {
                pixel.set_luminance(transform.invert(pixel.luminance()));
            }
        }

        let out_of_domain = grid
            .pixels_mut()
            .iter_mut()
            .filter_map(|pixel| pixel.refresh_relative_luminance().err())
            .count();
        if out_of_domain > 0 {
            tracing::warn!(out_of_domain, "Restored luminance outside the LAB domain");
        }
    }

    fn bounds(grid: &ImageFeatureGrid) -> Result<(f64, f64), AlignError> {
        let min = grid.min_luminance().ok_or(AlignError::EmptyImage)?;
        let max = grid.max_luminance().ok_or(AlignError::EmptyImage)?;
        if min == max {
            return Err(AlignError::ZeroRange(min));
        }
        Ok((min, max))
    }

    fn apply(&mut self, grid: &mut ImageFeatureGrid, transform: Transform) {
        for pixel in grid.pixels_mut() {
            pixel.set_luminance(transform.apply(pixel.luminance()));
        }
        tracing::debug!(?transform, "Applied luminance transform");
        self.applied.push(transform);
    }
}
