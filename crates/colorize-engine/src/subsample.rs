//! Facet division and per-rectangle luminance subsampling.
//!
//! An image side is split into `samples` facets, and the two sides together
//! give `samples * samples` sample rectangles. The mean relative luminance of
//! each rectangle forms a coarse fingerprint of the image.

use thiserror::Error;

use crate::image::FeatureImage;

/// Error type for subsampling.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SubsampleError {
    #[error("number of samples must be at least 1")]
    ZeroSamples,

    #[error("image is empty")]
    EmptyImage,

    /// Every pixel of a rectangle lacks relative luminance
    #[error("no computed luminance in sample rectangle {0:?}")]
    NoLuminance(SampleRect),
}

/// A segment `[start, start + len)` of one image side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Facet {
    pub start: usize,
    pub len: usize,
}

/// A rectangle built from one width facet and one height facet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleRect {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

/// Split `length` into `samples` facets.
///
/// If `length < samples` every facet covers the whole side. Otherwise the
/// first `samples - 1` facets are `length / samples` long and the last one
/// takes the remainder, so the lengths add up to `length`.
///
/// # Example
///
/// ```
/// use colorize_engine::subsample::divide_facet;
///
/// let facets = divide_facet(100, 16).unwrap();
/// assert_eq!(facets.len(), 16);
/// assert_eq!(facets.iter().map(|f| f.len).sum::<usize>(), 100);
/// assert_eq!(facets[15].len, 10);
/// ```
pub fn divide_facet(length: usize, samples: usize) -> Result<Vec<Facet>, SubsampleError> {
    if samples == 0 {
        return Err(SubsampleError::ZeroSamples);
    }

    if length < samples {
        return Ok(vec![Facet { start: 0, len: length }; samples]);
    }

    let step = length / samples;
    let mut facets: Vec<Facet> = (0..samples - 1)
        .map(|i| Facet {
            start: i * step,
            len: step,
        })
        .collect();
    let last_start = (samples - 1) * step;
    facets.push(Facet {
        start: last_start,
        len: length - last_start,
    });
    Ok(facets)
}

/// All sample rectangles of a `width x height` image, width facets outer.
pub fn sample_rects(
    samples: usize,
    width: usize,
    height: usize,
) -> Result<Vec<SampleRect>, SubsampleError> {
    let columns = divide_facet(width, samples)?;
    let rows = divide_facet(height, samples)?;

    Ok(columns
        .iter()
        .flat_map(|column| {
            rows.iter().map(move |row| SampleRect {
                x: column.start,
                y: row.start,
                width: column.len,
                height: row.len,
            })
        })
        .collect())
}

/// Mean relative luminance of every sample rectangle, in [`sample_rects`]
/// order. Pixels without relative luminance are left out of the mean.
pub fn subsample_luminance<I: FeatureImage + ?Sized>(
    image: &I,
    samples: usize,
) -> Result<Vec<f64>, SubsampleError> {
    if image.is_empty() {
        return Err(SubsampleError::EmptyImage);
    }

    sample_rects(samples, image.width(), image.height())?
        .into_iter()
        .map(|rect| {
            let (sum, count) = (rect.y..rect.y + rect.height)
                .flat_map(|y| (rect.x..rect.x + rect.width).map(move |x| (x, y)))
                .filter_map(|(x, y)| image.feature(x, y).and_then(|p| p.relative_luminance()))
                .fold((0.0, 0usize), |(sum, count), value| (sum + value, count + 1));

            if count == 0 {
                return Err(SubsampleError::NoLuminance(rect));
            }
            Ok(sum / count as f64)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feature::{FeatureExtractor, LabPixel};
    use crate::image::SourceImage;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_divide_100_into_16() {
        let facets = divide_facet(100, 16).unwrap();
        assert_eq!(facets.len(), 16);
        assert_eq!(facets.iter().map(|f| f.len).sum::<usize>(), 100);
        assert!(facets[..15].iter().all(|f| f.len == 6));
        assert_eq!(facets[15], Facet { start: 90, len: 10 });
    }

    #[test]
    fn test_facets_are_contiguous() {
        let facets = divide_facet(37, 5).unwrap();
        for pair in facets.windows(2) {
            assert_eq!(pair[0].start + pair[0].len, pair[1].start);
        }
        assert_eq!(facets.last().map(|f| f.start + f.len), Some(37));
    }

    #[test]
    fn test_short_side_repeats_whole_side() {
        assert_eq!(
            divide_facet(3, 5).unwrap(),
            vec![Facet { start: 0, len: 3 }; 5]
        );
    }

    #[test]
    fn test_zero_samples() {
        assert_eq!(divide_facet(10, 0), Err(SubsampleError::ZeroSamples));
        assert_eq!(sample_rects(0, 10, 10), Err(SubsampleError::ZeroSamples));
    }

    #[test]
    fn test_sample_rects_width_outer() {
        let rects = sample_rects(2, 4, 6).unwrap();
        assert_eq!(
            rects,
            vec![
                SampleRect { x: 0, y: 0, width: 2, height: 3 },
                SampleRect { x: 0, y: 3, width: 2, height: 3 },
                SampleRect { x: 2, y: 0, width: 2, height: 3 },
                SampleRect { x: 2, y: 3, width: 2, height: 3 },
            ]
        );
    }

    #[test]
    fn test_subsample_luminance() {
        // Left half at 0.42 (relative 0.1), right half at 2.1 (relative 0.5)
        let pixels: Vec<LabPixel> = (0..16)
            .map(|i| LabPixel::new(if i % 4 < 2 { 0.42 } else { 2.1 }, 0.0, 0.0))
            .collect();
        let mut source = SourceImage::from_lab(4, 4, &pixels).unwrap();
        FeatureExtractor::default().relative_luminance(source.grid_mut());

        let passport = subsample_luminance(&source, 2).unwrap();
        assert_eq!(passport.len(), 4);
        assert!((passport[0] - 0.1).abs() < 1e-12);
        assert!((passport[1] - 0.1).abs() < 1e-12);
        assert!((passport[2] - 0.5).abs() < 1e-12);
        assert!((passport[3] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_subsample_requires_luminance() {
        let source = SourceImage::from_lab(2, 2, &[LabPixel::new(1.0, 0.0, 0.0); 4]).unwrap();
        assert!(matches!(
            subsample_luminance(&source, 1),
            Err(SubsampleError::NoLuminance(_))
        ));
        assert_eq!(
            subsample_luminance(&SourceImage::default(), 4),
            Err(SubsampleError::EmptyImage)
        );
    }
}
