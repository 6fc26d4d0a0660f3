//! Colorizer builder: the entry point for a colorization run.
//!
//! A run moves through
//!
//! ```text
//! Idle -> Preparing -> Matching -> Restoring -> Done
//!            |            |            |
//!            +------------+------------+--> Failed
//! ```
//!
//! `Restoring` always runs, so a failed run still leaves the target with
//! its original luminance. Chroma already written before a failure is kept.

mod error;
mod options;

pub use error::ColorizeError;
pub use options::{ColorizeMethod, ColorizeOptions, NoMatchPolicy};

use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::feature::{FeatureExtractor, ImageFeatureGrid};
use crate::image::{Colorizable, FeatureImage, SourceImage, TargetImage};
use crate::matcher::{MatchOutcome, StochasticMatcher};
use crate::propagate::NeighborPropagator;

/// Where a [`Colorizer`] is in its current or last run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorizeState {
    #[default]
    Idle,
    Preparing,
    Matching,
    Restoring,
    Done,
    Failed,
}

/// Counters of a finished run.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ColorizeReport {
    /// Factor the target luminance was scaled by for matching
    pub scale_factor: f64,
    /// Pixels colored from a stochastic match
    pub matched: usize,
    /// Pixels colored by neighbor propagation
    pub propagated: usize,
    /// Pixels skipped because their features were not computed
    pub skipped: usize,
    /// Pixels for which no source candidate was accepted
    pub no_match: usize,
    /// Wall-clock time of the whole run, restore included
    pub elapsed: Duration,
}

/// High-level colorization builder.
///
/// - Configuration methods consume and return `self`
/// - [`colorize()`](Self::colorize) can be called again for more images
/// - With a [`seed`](Self::seed), every run draws the same random sequence
///
/// # Example
///
/// ```
/// use colorize_engine::{Colorizable, Colorizer, LabPixel, SourceImage, TargetImage};
///
/// let mut target = TargetImage::from_lab(4, 4, &[LabPixel::new(1.0, 0.0, 0.0); 16]).unwrap();
/// let mut source = SourceImage::from_lab(4, 4, &[LabPixel::new(2.0, 0.4, -0.1); 16]).unwrap();
///
/// let mut colorizer = Colorizer::new().seed(42);
/// let report = colorizer.colorize(&mut target, &mut source).unwrap();
///
/// assert_eq!(report.scale_factor, 2.0);
/// assert_eq!(target.colored_count(), 16);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Colorizer {
    options: ColorizeOptions,
    method: ColorizeMethod,
    seed: Option<u64>,
    state: ColorizeState,
}

impl Colorizer {
    /// Create a colorizer with default options and the neighbor method.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace all options at once.
    #[inline]
    pub fn options(mut self, options: ColorizeOptions) -> Self {
        self.options = options;
        self
    }

    #[inline]
    pub fn method(mut self, method: ColorizeMethod) -> Self {
        self.method = method;
        self
    }

    /// Seed the random source used for matching.
    #[inline]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    #[inline]
    pub fn state(&self) -> ColorizeState {
        self.state
    }

    /// Transfer chroma from `source` to `target`.
    ///
    /// Both images get fresh features. The target is scaled so its maximum
    /// luminance equals the source maximum, matched pixel by pixel (columns
    /// outer, rows inner), and restored afterwards.
    ///
    /// # Errors
    ///
    /// - [`ColorizeError::EmptyImage`] if either image has no pixels
    /// - [`ColorizeError::InvalidOption`] / [`ColorizeError::Feature`] for
    ///   unusable options
    /// - [`ColorizeError::Align`] if the scale factor is not positive and
    ///   finite (for example an all-black target)
    /// - [`ColorizeError::NoMatchFound`] under [`NoMatchPolicy::Abort`]
    ///
    /// On error the target luminance is still restored, but chroma written
    /// before the failure stays in place.
    pub fn colorize(
        &mut self,
        target: &mut TargetImage,
        source: &mut SourceImage,
    ) -> Result<ColorizeReport, ColorizeError> {
        let started = Instant::now();

        self.state = ColorizeState::Preparing;
        let result = self.prepare(target, source).and_then(|scale_factor| {
            self.state = ColorizeState::Matching;
            self.match_pixels(target, source, scale_factor)
        });

        self.state = ColorizeState::Restoring;
        let (aligner, grid) = target.aligner_parts();
        aligner.restore(grid);

        match result {
            Ok(mut report) => {
                report.elapsed = started.elapsed();
                self.state = ColorizeState::Done;
                tracing::info!(
                    matched = report.matched,
                    propagated = report.propagated,
                    skipped = report.skipped,
                    no_match = report.no_match,
                    elapsed_ms = report.elapsed.as_millis() as u64,
                    "Colorization finished"
                );
                Ok(report)
            }
            Err(e) => {
                self.state = ColorizeState::Failed;
                tracing::warn!(error = %e, "Colorization failed");
                Err(e)
            }
        }
    }

    /// Fresh features for both images and the target scaled into the
    /// source range. Returns the scale factor.
    fn prepare(
        &self,
        target: &mut TargetImage,
        source: &mut SourceImage,
    ) -> Result<f64, ColorizeError> {
        let extractor = self.options.extractor()?;
        if target.is_empty() {
            return Err(ColorizeError::EmptyImage("target"));
        }
        if source.is_empty() {
            return Err(ColorizeError::EmptyImage("source"));
        }

        for grid in [target.grid_mut(), source.grid_mut()] {
            grid.pixels_mut()
                .iter_mut()
                .for_each(|pixel| pixel.reset_features());
        }
        target.uncolor_all();

        let source_max = source
            .max_luminance()
            .ok_or(ColorizeError::EmptyImage("source"))?;

        // Features are computed only after scaling, from the final luminance
        let (aligner, grid) = target.aligner_parts();
        let scale_factor = aligner.scale_to_max(grid, source_max)?;
        tracing::debug!(source_max, scale_factor, "Scaled target luminance");

        self.extract(&extractor, target.grid_mut(), "target");
        self.extract(&extractor, source.grid_mut(), "source");

        Ok(scale_factor)
    }

    fn extract(
        &self,
        extractor: &FeatureExtractor,
        grid: &mut ImageFeatureGrid,
        image: &'static str,
    ) {
        let missing = extractor.extract(grid, self.options.compute_entropy);
        tracing::debug!(image, pixels = grid.len(), missing, "Extracted features");
    }

    fn match_pixels(
        &self,
        target: &mut TargetImage,
        source: &SourceImage,
        scale_factor: f64,
    ) -> Result<ColorizeReport, ColorizeError> {
        let matcher = StochasticMatcher::new(
            self.options.attempts,
            self.options.luminance_threshold,
            self.options.dispersion_threshold,
        );
        let propagator = NeighborPropagator::new(
            self.options.luminance_threshold,
            self.options.dispersion_threshold,
        );
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut report = ColorizeReport {
            scale_factor,
            ..ColorizeReport::default()
        };

        for x in 0..target.width() {
            for y in 0..target.height() {
                let Some(pixel) = target.feature(x, y).filter(|p| !p.is_colored()) else {
                    continue;
                };

                let (chroma_a, chroma_b) = match matcher.find_match(pixel, source, &mut rng) {
                    MatchOutcome::Matched(found) => {
                        report.matched += 1;
                        (found.chroma_a, found.chroma_b)
                    }
                    MatchOutcome::Declined => {
                        tracing::warn!(x, y, "Target pixel has uncomputed features, skipping");
                        report.skipped += 1;
                        continue;
                    }
                    MatchOutcome::NoMatchFound => {
                        report.no_match += 1;
                        match self.options.no_match {
                            NoMatchPolicy::Skip => {
                                tracing::warn!(x, y, "No source match, leaving pixel uncolored");
                                continue;
                            }
                            NoMatchPolicy::Abort => {
                                return Err(ColorizeError::NoMatchFound { x, y });
                            }
                            NoMatchPolicy::Fallback => match source.feature(0, 0) {
                                Some(first) => (first.chroma_a(), first.chroma_b()),
                                None => continue,
                            },
                        }
                    }
                };

                target.commit_color(x, y, chroma_a, chroma_b);
                if self.method == ColorizeMethod::Neighbor {
                    report.propagated += propagator.propagate(target, x, y);
                }
            }
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::align::AlignError;
    use crate::feature::{LabPixel, LAB_MAX_LUM};

    fn uniform_target(width: usize, height: usize, l: f64) -> TargetImage {
        TargetImage::from_lab(width, height, &vec![LabPixel::new(l, 0.0, 0.0); width * height])
            .unwrap()
    }

    fn uniform_source(width: usize, height: usize, lab: LabPixel) -> SourceImage {
        SourceImage::from_lab(width, height, &vec![lab; width * height]).unwrap()
    }

    /// Source whose every 3x3 window touches a negative luminance, so no
    /// source pixel ever gets a dispersion.
    fn featureless_source() -> SourceImage {
        SourceImage::from_lab(
            1,
            3,
            &[
                LabPixel::new(2.0, 0.5, 0.5),
                LabPixel::new(-0.5, 0.5, 0.5),
                LabPixel::new(2.0, 0.5, 0.5),
            ],
        )
        .unwrap()
    }

    fn small_windows() -> ColorizeOptions {
        ColorizeOptions::new().dispersion_window(3).entropy_window(3)
    }

    #[test]
    fn test_new_defaults() {
        let colorizer = Colorizer::new();
        assert_eq!(colorizer.state(), ColorizeState::Idle);
        assert_eq!(colorizer.method, ColorizeMethod::Neighbor);
        assert_eq!(colorizer.seed, None);
        assert_eq!(colorizer.options, ColorizeOptions::default());
    }

    #[test]
    fn test_uniform_images_get_source_chroma() {
        let (a0, b0) = (0.3, -0.2);
        for method in [ColorizeMethod::Neighbor, ColorizeMethod::Simple] {
            for seed in 0..5 {
                let mut target = uniform_target(4, 4, 2.0);
                let mut source = uniform_source(4, 4, LabPixel::new(2.0, a0, b0));

                let mut colorizer = Colorizer::new().method(method).seed(seed);
                let report = colorizer.colorize(&mut target, &mut source).unwrap();

                assert_eq!(colorizer.state(), ColorizeState::Done);
                assert_eq!(report.matched + report.propagated, 16);
                for pixel in target.grid().pixels() {
                    assert!(pixel.is_colored());
                    assert_eq!((pixel.chroma_a(), pixel.chroma_b()), (a0, b0));
                }
            }
        }
    }

    #[test]
    fn test_neighbor_method_propagates() {
        let mut target = uniform_target(4, 4, 2.0);
        let mut source = uniform_source(4, 4, LabPixel::new(2.0, 0.1, 0.1));

        let report = Colorizer::new()
            .seed(1)
            .colorize(&mut target, &mut source)
            .unwrap();

        // (0, 0) floods every row below it, the rest of row 0 is matched
        assert_eq!(report.matched, 4);
        assert_eq!(report.propagated, 12);
    }

    #[test]
    fn test_scale_factor_and_restore() {
        // Target luminance spans [0, 2.1], source spans [0, 4.2]
        let ramp = |i: usize, top: f64| if i == 15 { top } else { i as f64 * 0.14 };
        let target_lab: Vec<LabPixel> = (0..16)
            .map(|i| LabPixel::new(ramp(i, 2.1), 0.0, 0.0))
            .collect();
        let source_lab: Vec<LabPixel> = (0..16)
            .map(|i| LabPixel::new(ramp(i, 4.2), 0.2, 0.1))
            .collect();
        let mut target = TargetImage::from_lab(4, 4, &target_lab).unwrap();
        let mut source = SourceImage::from_lab(4, 4, &source_lab).unwrap();
        let before: Vec<f64> = target.grid().pixels().iter().map(|p| p.luminance()).collect();

        let report = Colorizer::new()
            .seed(3)
            .colorize(&mut target, &mut source)
            .unwrap();

        assert_eq!(report.scale_factor, 2.0);
        assert!(!target.aligner().is_aligned());
        assert_eq!(target.min_luminance(), Some(0.0));
        assert_eq!(target.max_luminance(), Some(2.1));
        let after: Vec<f64> = target.grid().pixels().iter().map(|p| p.luminance()).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_single_pixel_images() {
        let mut target = uniform_target(1, 1, 1.0);
        let mut source = uniform_source(1, 1, LabPixel::new(3.0, -0.3, 0.3));

        let report = Colorizer::new()
            .seed(0)
            .colorize(&mut target, &mut source)
            .unwrap();

        assert_eq!(report.matched, 1);
        let pixel = target.feature(0, 0).unwrap();
        assert_eq!((pixel.chroma_a(), pixel.chroma_b()), (-0.3, 0.3));
        assert_eq!(pixel.luminance(), 1.0);
    }

    #[test]
    fn test_empty_images_fail() {
        let mut colorizer = Colorizer::new();
        let mut empty_target = TargetImage::default();
        let mut source = uniform_source(2, 2, LabPixel::new(1.0, 0.0, 0.0));
        assert_eq!(
            colorizer.colorize(&mut empty_target, &mut source),
            Err(ColorizeError::EmptyImage("target"))
        );
        assert_eq!(colorizer.state(), ColorizeState::Failed);

        let mut target = uniform_target(2, 2, 1.0);
        let mut empty_source = SourceImage::default();
        assert_eq!(
            colorizer.colorize(&mut target, &mut empty_source),
            Err(ColorizeError::EmptyImage("source"))
        );
    }

    #[test]
    fn test_black_target_has_no_scale_factor() {
        let mut target = uniform_target(2, 2, 0.0);
        let mut source = uniform_source(2, 2, LabPixel::new(1.0, 0.1, 0.1));
        let result = Colorizer::new().colorize(&mut target, &mut source);
        assert!(matches!(
            result,
            Err(ColorizeError::Align(AlignError::InvalidScaleFactor(f))) if f.is_infinite()
        ));
        assert_eq!(target.colored_count(), 0);
    }

    #[test]
    fn test_invalid_options_leave_images_alone() {
        let mut target = uniform_target(2, 2, 1.0);
        target.commit_color(0, 0, 0.7, 0.7);
        let mut source = uniform_source(2, 2, LabPixel::new(1.0, 0.1, 0.1));

        let mut colorizer = Colorizer::new().options(ColorizeOptions::new().attempts(0));
        assert!(matches!(
            colorizer.colorize(&mut target, &mut source),
            Err(ColorizeError::InvalidOption(_))
        ));
        assert!(target.is_colored(0, 0));
    }

    #[test]
    fn test_no_match_policies() {
        // Skip
        let mut target = uniform_target(2, 2, 2.0);
        let report = Colorizer::new()
            .options(small_windows())
            .seed(1)
            .colorize(&mut target, &mut featureless_source())
            .unwrap();
        assert_eq!(report.no_match, 4);
        assert_eq!(target.colored_count(), 0);

        // Fallback takes source (0, 0)
        let mut target = uniform_target(2, 2, 2.0);
        let report = Colorizer::new()
            .options(small_windows().no_match(NoMatchPolicy::Fallback))
            .method(ColorizeMethod::Simple)
            .seed(1)
            .colorize(&mut target, &mut featureless_source())
            .unwrap();
        assert_eq!(report.no_match, 4);
        assert_eq!(report.matched, 0);
        for pixel in target.grid().pixels() {
            assert_eq!((pixel.chroma_a(), pixel.chroma_b()), (0.5, 0.5));
        }
    }

    #[test]
    fn test_abort_restores_luminance() {
        let mut target = uniform_target(2, 2, 1.0);
        let mut colorizer = Colorizer::new()
            .options(small_windows().no_match(NoMatchPolicy::Abort))
            .seed(1);

        let result = colorizer.colorize(&mut target, &mut featureless_source());

        assert_eq!(result, Err(ColorizeError::NoMatchFound { x: 0, y: 0 }));
        assert_eq!(colorizer.state(), ColorizeState::Failed);
        assert!(!target.aligner().is_aligned());
        assert!(target.grid().pixels().iter().all(|p| p.luminance() == 1.0));
    }

    #[test]
    fn test_partial_colors_survive_abort() {
        // Only the first two source pixels have a full 3x3 window without
        // the negative luminance, so each single attempt may miss
        let chroma = (0.3, -0.2);
        let source_lab: Vec<LabPixel> = [1.0, 1.0, 1.0, -0.5]
            .iter()
            .map(|&l| LabPixel::new(l, chroma.0, chroma.1))
            .collect();
        let options = small_windows().attempts(1).no_match(NoMatchPolicy::Abort);

        let mut checked = 0;
        for seed in 0..64 {
            let mut target = uniform_target(4, 4, 1.0);
            let mut source = SourceImage::from_lab(4, 1, &source_lab).unwrap();
            let result = Colorizer::new()
                .options(options.clone())
                .method(ColorizeMethod::Simple)
                .seed(seed)
                .colorize(&mut target, &mut source);

            let Err(ColorizeError::NoMatchFound { x, y }) = result else {
                continue;
            };
            let failed_at = x * 4 + y;
            if failed_at == 0 {
                continue;
            }

            assert_eq!(target.colored_count(), failed_at, "seed {seed}");
            for px in 0..4 {
                for py in 0..4 {
                    let pixel = target.feature(px, py).unwrap();
                    assert_eq!(pixel.luminance(), 1.0);
                    if px * 4 + py < failed_at {
                        assert!(pixel.is_colored(), "seed {seed} ({px}, {py})");
                        assert_eq!((pixel.chroma_a(), pixel.chroma_b()), chroma);
                    } else {
                        assert!(!pixel.is_colored(), "seed {seed} ({px}, {py})");
                        assert_eq!((pixel.chroma_a(), pixel.chroma_b()), (0.0, 0.0));
                    }
                }
            }
            checked += 1;
        }

        assert!(checked > 0, "no seed aborted after a first match");
    }

    #[test]
    fn test_scaled_maximum_keeps_fresh_features() {
        // 1.034 * (4.2 / 1.034) rounds above the LAB domain
        let mut target_lab = vec![LabPixel::new(1.0, 0.0, 0.0); 64];
        target_lab[4 * 8 + 4] = LabPixel::new(1.034, 0.0, 0.0);
        let mut target = TargetImage::from_lab(8, 8, &target_lab).unwrap();
        let mut source = uniform_source(8, 8, LabPixel::new(LAB_MAX_LUM, 0.1, 0.1));

        let colorizer = Colorizer::new();
        let scale_factor = colorizer.prepare(&mut target, &mut source).unwrap();
        assert_eq!(scale_factor, LAB_MAX_LUM / 1.034);

        let brightest = target.feature(4, 4).unwrap();
        assert_eq!(brightest.luminance(), LAB_MAX_LUM);
        assert_eq!(brightest.relative_luminance(), Some(1.0));

        // The real step next to the maximum is 1 - 1/1.034 in relative units
        let neighbor = target.feature(3, 4).unwrap();
        let expected = 1.0 / 1.034;
        assert!((neighbor.relative_luminance().unwrap() - expected).abs() < 1e-12);
        assert!(neighbor.dispersion().unwrap() < 0.01);
        assert_eq!(target.feature(0, 0).unwrap().dispersion(), Some(0.0));

        let (aligner, grid) = target.aligner_parts();
        aligner.restore(grid);
        assert_eq!(target.feature(4, 4).unwrap().luminance(), 1.034);
    }

    #[test]
    fn test_rerun_clears_chroma_of_skipped_pixels() {
        let mut target = uniform_target(2, 2, 2.0);
        Colorizer::new()
            .seed(1)
            .colorize(&mut target, &mut uniform_source(2, 2, LabPixel::new(2.0, 0.4, 0.4)))
            .unwrap();
        assert_eq!(target.colored_count(), 4);

        let report = Colorizer::new()
            .options(small_windows())
            .seed(1)
            .colorize(&mut target, &mut featureless_source())
            .unwrap();

        assert_eq!(report.no_match, 4);
        assert_eq!(target.colored_count(), 0);
        assert_eq!(target.result_lab(), vec![LabPixel::new(2.0, 0.0, 0.0); 4]);
    }

    #[test]
    fn test_uncomputed_target_pixels_are_skipped() {
        let mut target = TargetImage::from_lab(
            3,
            1,
            &[
                LabPixel::new(1.0, 0.0, 0.0),
                LabPixel::new(-0.5, 0.0, 0.0),
                LabPixel::new(1.0, 0.0, 0.0),
            ],
        )
        .unwrap();
        let mut source = uniform_source(3, 3, LabPixel::new(1.0, 0.1, 0.1));

        let mut colorizer = Colorizer::new().options(small_windows()).seed(2);
        let report = colorizer.colorize(&mut target, &mut source).unwrap();

        assert_eq!(colorizer.state(), ColorizeState::Done);
        assert_eq!(report.skipped, 3);
        assert_eq!(target.colored_count(), 0);
    }

    #[test]
    fn test_same_seed_same_result() {
        let target_lab: Vec<LabPixel> = (0..36)
            .map(|i| LabPixel::new((i * 7 % 11) as f64 * 0.2, 0.0, 0.0))
            .collect();
        let source_lab: Vec<LabPixel> = (0..64)
            .map(|i| LabPixel::new((i * 5 % 13) as f64 * 0.3, i as f64 * 0.01, -(i as f64) * 0.005))
            .collect();

        let run = || {
            let mut target = TargetImage::from_lab(6, 6, &target_lab).unwrap();
            let mut source = SourceImage::from_lab(8, 8, &source_lab).unwrap();
            Colorizer::new()
                .seed(11)
                .colorize(&mut target, &mut source)
                .unwrap();
            target.result_lab()
        };

        assert_eq!(run(), run());
    }

    #[test]
    fn test_rerun_starts_from_scratch() {
        let mut target = uniform_target(3, 3, 1.0);
        let mut colorizer = Colorizer::new().seed(4);

        colorizer
            .colorize(&mut target, &mut uniform_source(3, 3, LabPixel::new(1.0, 0.1, 0.1)))
            .unwrap();
        colorizer
            .colorize(&mut target, &mut uniform_source(3, 3, LabPixel::new(1.0, -0.4, 0.2)))
            .unwrap();

        for pixel in target.grid().pixels() {
            assert_eq!((pixel.chroma_a(), pixel.chroma_b()), (-0.4, 0.2));
        }
    }
}
