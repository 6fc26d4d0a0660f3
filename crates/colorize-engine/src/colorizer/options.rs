//! Colorization options and configuration.

use crate::feature::{FeatureExtractor, DEFAULT_DISPERSION_WINDOW, DEFAULT_ENTROPY_WINDOW};
use crate::matcher::{
    DEFAULT_ATTEMPTS, DEFAULT_DISPERSION_THRESHOLD, DEFAULT_LUMINANCE_THRESHOLD,
};

use super::ColorizeError;

/// How a colorization run assigns chroma.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorizeMethod {
    /// Match a pixel, then spread its chroma to similar neighbors
    #[default]
    Neighbor,
    /// Match every pixel independently
    Simple,
}

/// What to do with a target pixel for which no source candidate was accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NoMatchPolicy {
    /// Leave the pixel uncolored and keep going
    #[default]
    Skip,
    /// Take the chroma of source pixel `(0, 0)`
    Fallback,
    /// Stop the run with [`ColorizeError::NoMatchFound`]
    Abort,
}

/// Tunables of a colorization run.
///
/// # Defaults
///
/// - Dispersion window: 5x5
/// - Entropy window: 11x11
/// - 300 random source samples per matched pixel
/// - Luminance threshold 0.1, dispersion threshold 0.05
/// - Entropy computed, unmatched pixels skipped
///
/// # Example
///
/// ```
/// use colorize_engine::{ColorizeOptions, NoMatchPolicy};
///
/// let options = ColorizeOptions::new()
///     .attempts(50)
///     .no_match(NoMatchPolicy::Fallback);
/// assert_eq!(options.attempts, 50);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ColorizeOptions {
    /// Side of the square dispersion window. Odd, at least 3.
    pub dispersion_window: usize,

    /// Side of the square entropy window. Odd, at least 3.
    pub entropy_window: usize,

    /// Random source samples drawn per matched target pixel.
    pub attempts: usize,

    /// Luminance tolerance for matching and propagation, in LAB units.
    pub luminance_threshold: f64,

    /// Dispersion tolerance for matching and propagation.
    pub dispersion_threshold: f64,

    /// Also compute entropy for both images.
    ///
    /// Entropy does not drive matching; turning it off saves the most
    /// expensive window pass.
    pub compute_entropy: bool,

    /// Handling of pixels without an accepted match.
    pub no_match: NoMatchPolicy,
}

impl Default for ColorizeOptions {
    fn default() -> Self {
        Self {
            dispersion_window: DEFAULT_DISPERSION_WINDOW,
            entropy_window: DEFAULT_ENTROPY_WINDOW,
            attempts: DEFAULT_ATTEMPTS,
            luminance_threshold: DEFAULT_LUMINANCE_THRESHOLD,
            dispersion_threshold: DEFAULT_DISPERSION_THRESHOLD,
            compute_entropy: true,
            no_match: NoMatchPolicy::Skip,
        }
    }
}

impl ColorizeOptions {
    /// Same as `ColorizeOptions::default()`.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn dispersion_window(mut self, side: usize) -> Self {
        self.dispersion_window = side;
        self
    }

    #[inline]
    pub fn entropy_window(mut self, side: usize) -> Self {
        self.entropy_window = side;
        self
    }

    #[inline]
    pub fn attempts(mut self, attempts: usize) -> Self {
        self.attempts = attempts;
        self
    }

    #[inline]
    pub fn luminance_threshold(mut self, threshold: f64) -> Self {
        self.luminance_threshold = threshold;
        self
    }

    #[inline]
    pub fn dispersion_threshold(mut self, threshold: f64) -> Self {
        self.dispersion_threshold = threshold;
        self
    }

    #[inline]
    pub fn compute_entropy(mut self, enabled: bool) -> Self {
        self.compute_entropy = enabled;
        self
    }

    #[inline]
    pub fn no_match(mut self, policy: NoMatchPolicy) -> Self {
        self.no_match = policy;
        self
    }

    /// Check the options and build the feature extractor they describe.
    pub(crate) fn extractor(&self) -> Result<FeatureExtractor, ColorizeError> {
        if self.attempts == 0 {
            return Err(ColorizeError::InvalidOption(
                "attempts must be at least 1".to_string(),
            ));
        }
        for (name, value) in [
            ("luminance_threshold", self.luminance_threshold),
            ("dispersion_threshold", self.dispersion_threshold),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ColorizeError::InvalidOption(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }
        Ok(FeatureExtractor::new(
            self.dispersion_window,
            self.entropy_window,
        )?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feature::FeatureError;

    #[test]
    fn test_default_values() {
        let opts = ColorizeOptions::default();
        assert_eq!(opts.dispersion_window, 5);
        assert_eq!(opts.entropy_window, 11);
        assert_eq!(opts.attempts, 300);
        assert!((opts.luminance_threshold - 0.1).abs() < f64::EPSILON);
        assert!((opts.dispersion_threshold - 0.05).abs() < f64::EPSILON);
        assert!(opts.compute_entropy);
        assert_eq!(opts.no_match, NoMatchPolicy::Skip);
    }

    #[test]
    fn test_new_equals_default() {
        assert_eq!(ColorizeOptions::new(), ColorizeOptions::default());
    }

    #[test]
    fn test_builder_chaining() {
        let opts = ColorizeOptions::new()
            .dispersion_window(3)
            .entropy_window(7)
            .attempts(10)
            .luminance_threshold(0.2)
            .dispersion_threshold(0.1)
            .compute_entropy(false)
            .no_match(NoMatchPolicy::Abort);

        assert_eq!(opts.dispersion_window, 3);
        assert_eq!(opts.entropy_window, 7);
        assert_eq!(opts.attempts, 10);
        assert!(!opts.compute_entropy);
        assert_eq!(opts.no_match, NoMatchPolicy::Abort);
    }

    #[test]
    fn test_validation() {
        assert!(ColorizeOptions::new().extractor().is_ok());
        assert!(matches!(
            ColorizeOptions::new().attempts(0).extractor(),
            Err(ColorizeError::InvalidOption(_))
        ));
        assert!(matches!(
            ColorizeOptions::new().luminance_threshold(-1.0).extractor(),
            Err(ColorizeError::InvalidOption(_))
        ));
        assert!(matches!(
            ColorizeOptions::new().dispersion_threshold(f64::NAN).extractor(),
            Err(ColorizeError::InvalidOption(_))
        ));
        assert_eq!(
            ColorizeOptions::new().dispersion_window(4).extractor(),
            Err(ColorizeError::Feature(FeatureError::InvalidWindow(4)))
        );
    }

    #[test]
    fn test_method_default_is_neighbor() {
        assert_eq!(ColorizeMethod::default(), ColorizeMethod::Neighbor);
    }
}
