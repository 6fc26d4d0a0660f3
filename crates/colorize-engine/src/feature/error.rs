//! Error types for feature extraction.

use thiserror::Error;

/// Error returned by feature setters and the neighborhood calculators.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FeatureError {
    /// Value outside the accepted `[0, 1]` range (or not finite)
    #[error("{feature} value {value} is outside [0, 1]")]
    OutOfRange {
        /// Name of the rejected feature
        feature: &'static str,
        /// The rejected value
        value: f64,
    },

    /// Neighborhood contained no pixels
    #[error("neighborhood is empty")]
    EmptyNeighborhood,

    /// Center pixel of a neighborhood has negative luminance
    #[error("center luminance {0} is negative")]
    NegativeLuminance(f64),

    /// Window side is even or smaller than 3
    #[error("window side {0} must be odd and at least 3")]
    InvalidWindow(usize),

    /// Input slice length does not match the grid dimensions
    #[error("expected {expected} pixels for {width}x{height}, got {actual}")]
    DimensionMismatch {
        width: usize,
        height: usize,
        expected: usize,
        actual: usize,
    },
}
