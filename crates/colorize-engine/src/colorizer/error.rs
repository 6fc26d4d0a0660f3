//! Error type of a colorization run.

use thiserror::Error;

use crate::align::AlignError;
use crate::feature::FeatureError;
use crate::subsample::SubsampleError;

/// Unified error type for the colorization engine.
///
/// Wraps the per-module errors so that application code can `?` any engine
/// call into one type.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ColorizeError {
    /// Target or source has no pixels
    #[error("{0} image is empty")]
    EmptyImage(&'static str),

    /// A [`ColorizeOptions`](super::ColorizeOptions) value is unusable
    #[error("invalid option: {0}")]
    InvalidOption(String),

    #[error("feature extraction failed: {0}")]
    Feature(#[from] FeatureError),

    #[error("luminance alignment failed: {0}")]
    Align(#[from] AlignError),

    #[error("subsampling failed: {0}")]
    Subsample(#[from] SubsampleError),

    /// No source candidate was accepted and the policy is
    /// [`NoMatchPolicy::Abort`](super::NoMatchPolicy::Abort)
    #[error("no source match for target pixel ({x}, {y})")]
    NoMatchFound { x: usize, y: usize },
}
