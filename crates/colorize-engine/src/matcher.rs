//! Stochastic best-match search in the source image.
//!
//! For one target pixel the matcher samples a fixed number of random source
//! pixels and keeps the best one under a two-criterion rule on luminance and
//! dispersion. A candidate replaces the current best if
//!
//! ```text
//! (dLum < bestLum          && dDisp < bestDisp + dispThr) ||
//! (dLum < bestLum + lumThr && dDisp < bestDisp)
//! ```
//!
//! so either criterion may win as long as the other does not get worse by
//! more than its threshold.

use rand::Rng;

use crate::feature::PixelFeature;
use crate::image::{FeatureImage, SourceImage};

/// Default number of random source samples per target pixel.
pub const DEFAULT_ATTEMPTS: usize = 300;

/// Default luminance tolerance, in LAB units.
pub const DEFAULT_LUMINANCE_THRESHOLD: f64 = 0.1;

/// Default dispersion tolerance.
pub const DEFAULT_DISPERSION_THRESHOLD: f64 = 0.05;

/// Source pixel chosen for a target pixel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SourceMatch {
    pub x: usize,
    pub y: usize,
    pub chroma_a: f64,
    pub chroma_b: f64,
}

/// Result of a single match search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MatchOutcome {
    /// A source pixel was accepted
    Matched(SourceMatch),
    /// Every attempt was rejected (or hit a source pixel without features)
    NoMatchFound,
    /// The target pixel has uncomputed luminance or dispersion; nothing tried
    Declined,
}

/// Best-of-N random matcher.
///
/// # Example
///
/// ```
/// use colorize_engine::{
///     FeatureExtractor, FeatureImage, ImageFeatureGrid, LabPixel, MatchOutcome, SourceImage,
///     StochasticMatcher,
/// };
/// use rand::rngs::StdRng;
/// use rand::SeedableRng;
///
/// let mut grid = ImageFeatureGrid::filled(4, 4, LabPixel::new(2.0, 0.25, -0.5));
/// FeatureExtractor::default().extract(&mut grid, false);
/// let source = SourceImage::new(grid);
///
/// let target = source.grid().get(0, 0).unwrap().clone();
/// let mut rng = StdRng::seed_from_u64(7);
/// let outcome = StochasticMatcher::default().find_match(&target, &source, &mut rng);
///
/// match outcome {
///     MatchOutcome::Matched(m) => assert_eq!((m.chroma_a, m.chroma_b), (0.25, -0.5)),
///     other => panic!("unexpected {other:?}"),
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StochasticMatcher {
    attempts: usize,
    luminance_threshold: f64,
    dispersion_threshold: f64,
}

impl Default for StochasticMatcher {
    fn default() -> Self {
        Self::new(
            DEFAULT_ATTEMPTS,
            DEFAULT_LUMINANCE_THRESHOLD,
            DEFAULT_DISPERSION_THRESHOLD,
        )
    }
}

impl StochasticMatcher {
    #[inline]
    pub fn new(attempts: usize, luminance_threshold: f64, dispersion_threshold: f64) -> Self {
        Self {
            attempts,
            luminance_threshold,
            dispersion_threshold,
        }
    }

    #[inline]
    pub fn attempts(&self) -> usize {
        self.attempts
    }

    /// Search `source` for a pixel resembling `target`.
    ///
    /// The target must have relative luminance and dispersion computed,
    /// otherwise the search is [`MatchOutcome::Declined`]. Source pixels
    /// without dispersion are passed over.
    pub fn find_match<R: Rng + ?Sized>(
        &self,
        target: &PixelFeature,
        source: &SourceImage,
        rng: &mut R,
    ) -> MatchOutcome {
        let (Some(_), Some(target_dispersion)) = (target.relative_luminance(), target.dispersion())
        else {
            return MatchOutcome::Declined;
        };
        if source.is_empty() {
            return MatchOutcome::NoMatchFound;
        }

        let target_luminance = target.luminance();
        let (width, height) = (source.width(), source.height());

        let mut best_lum = f64::INFINITY;
        let mut best_dispersion = f64::INFINITY;
        let mut best: Option<(usize, usize)> = None;

        for _ in 0..self.attempts {
            let x = rng.gen_range(0..width);
            let y = rng.gen_range(0..height);
            let Some(candidate) = source.feature(x, y) else {
                continue;
            };
            let Some(candidate_dispersion) = candidate.dispersion() else {
                continue;
            };

            let diff_lum = (target_luminance - candidate.luminance()).abs();
            let diff_dispersion = (target_dispersion - candidate_dispersion).abs();

            let luminance_wins = diff_lum < best_lum
                && diff_dispersion < best_dispersion + self.dispersion_threshold;
            let dispersion_wins = diff_lum < best_lum + self.luminance_threshold
                && diff_dispersion < best_dispersion;

            if luminance_wins || dispersion_wins {
                best_lum = diff_lum;
                best_dispersion = diff_dispersion;
                best = Some((x, y));
            }
        }

        match best.and_then(|(x, y)| source.feature(x, y).map(|p| (x, y, p))) {
            Some((x, y, pixel)) => MatchOutcome::Matched(SourceMatch {
                x,
                y,
                chroma_a: pixel.chroma_a(),
                chroma_b: pixel.chroma_b(),
            }),
            None => MatchOutcome::NoMatchFound,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feature::{FeatureExtractor, ImageFeatureGrid, LabPixel};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn prepared(width: usize, height: usize, pixels: &[LabPixel]) -> ImageFeatureGrid {
        let mut grid = ImageFeatureGrid::from_lab(width, height, pixels).unwrap();
        FeatureExtractor::new(3, 3).unwrap().extract(&mut grid, false);
        grid
    }

    fn target_pixel(luminance: f64, dispersion: f64) -> PixelFeature {
        let mut pixel = PixelFeature::from_lab(LabPixel::new(luminance, 0.0, 0.0));
        pixel.calc_relative_luminance().unwrap();
        pixel.set_dispersion(dispersion).unwrap();
        pixel
    }

    #[test]
    fn test_declines_uncomputed_target() {
        let source = SourceImage::new(prepared(2, 2, &[LabPixel::new(1.0, 0.1, 0.1); 4]));
        let mut rng = StdRng::seed_from_u64(1);

        let bare = PixelFeature::from_lab(LabPixel::new(1.0, 0.0, 0.0));
        assert_eq!(
            StochasticMatcher::default().find_match(&bare, &source, &mut rng),
            MatchOutcome::Declined
        );
    }

    #[test]
    fn test_no_match_when_source_has_no_features() {
        let grid = ImageFeatureGrid::filled(3, 3, LabPixel::new(1.0, 0.1, 0.1));
        let source = SourceImage::new(grid);
        let mut rng = StdRng::seed_from_u64(2);
        let outcome =
            StochasticMatcher::default().find_match(&target_pixel(1.0, 0.0), &source, &mut rng);
        assert_eq!(outcome, MatchOutcome::NoMatchFound);
    }

    #[test]
    fn test_zero_attempts_is_no_match() {
        let source = SourceImage::new(prepared(2, 2, &[LabPixel::new(1.0, 0.1, 0.1); 4]));
        let mut rng = StdRng::seed_from_u64(3);
        let matcher = StochasticMatcher::new(0, 0.1, 0.05);
        assert_eq!(
            matcher.find_match(&target_pixel(1.0, 0.0), &source, &mut rng),
            MatchOutcome::NoMatchFound
        );
    }

    #[test]
    fn test_prefers_closest_luminance() {
        // Left half dark and red-ish, right half bright and blue-ish
        let mut pixels = Vec::new();
        for _y in 0..8 {
            for x in 0..8 {
                if x < 4 {
                    pixels.push(LabPixel::new(0.5, 0.3, 0.0));
                } else {
                    pixels.push(LabPixel::new(3.5, 0.0, -0.3));
                }
            }
        }
        let source = SourceImage::new(prepared(8, 8, &pixels));
        let mut rng = StdRng::seed_from_u64(42);
        let matcher = StochasticMatcher::default();

        for _ in 0..10 {
            match matcher.find_match(&target_pixel(3.4, 0.0), &source, &mut rng) {
                MatchOutcome::Matched(m) => {
                    assert_eq!((m.chroma_a, m.chroma_b), (0.0, -0.3));
                    assert!(m.x >= 4);
                }
                other => panic!("expected a match, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_same_seed_same_match() {
        let pixels: Vec<LabPixel> = (0..64)
            .map(|i| LabPixel::new((i % 13) as f64 * 0.3, i as f64 * 0.01, 0.0))
            .collect();
        let source = SourceImage::new(prepared(8, 8, &pixels));
        let matcher = StochasticMatcher::new(20, 0.1, 0.05);
        let target = target_pixel(1.5, 0.1);

        let first = matcher.find_match(&target, &source, &mut StdRng::seed_from_u64(9));
        let second = matcher.find_match(&target, &source, &mut StdRng::seed_from_u64(9));
        assert_eq!(first, second);
    }
}
