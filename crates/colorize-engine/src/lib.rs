//! colorize-engine: luminance and texture driven colorization
//!
//! This library colors a greyscale *target* image with the chroma of a color
//! *source* image of similar content. Pixels are compared only through
//! their luminance and a local texture measure; no semantic matching is
//! involved.
//!
//! # Quick Start
//!
//! The [`Colorizer`] builder is the entry point:
//!
//! ```
//! use colorize_engine::{Colorizer, LabPixel, SourceImage, TargetImage};
//!
//! let grey = vec![LabPixel::new(1.5, 0.0, 0.0); 9];
//! let color = vec![LabPixel::new(3.0, 0.2, -0.3); 9];
//!
//! let mut target = TargetImage::from_lab(3, 3, &grey).unwrap();
//! let mut source = SourceImage::from_lab(3, 3, &color).unwrap();
//!
//! let report = Colorizer::new()
//!     .seed(1)
//!     .colorize(&mut target, &mut source)
//!     .unwrap();
//!
//! assert_eq!(report.scale_factor, 2.0);
//! assert_eq!(target.result_lab()[4], LabPixel::new(1.5, 0.2, -0.3));
//! ```
//!
//! # Pipeline
//!
//! 1. **Features**: every pixel of both images gets a relative luminance,
//!    a normalized dispersion (SKO) over a 5x5 window and, optionally, a
//!    normalized entropy over an 11x11 window ([`FeatureExtractor`]).
//! 2. **Alignment**: the target luminance is scaled so its maximum matches
//!    the source maximum ([`LuminanceAligner`]).
//! 3. **Matching**: for each uncolored target pixel, a fixed number of
//!    random source pixels is sampled and the best one under a two-criterion
//!    rule donates its chroma ([`StochasticMatcher`]).
//! 4. **Propagation**: the chroma is copied to similar neighbors below and
//!    to the right, so flat regions are matched only once
//!    ([`NeighborPropagator`]).
//! 5. **Restore**: the target luminance is put back exactly as it was.
//!
//! # Luminance Domain
//!
//! Luminance lives in `[0, LAB_MAX_LUM]` with `LAB_MAX_LUM = 4.2`. Chroma
//! values are taken over unchanged; the engine never interprets them. The
//! conversion from and to displayable color belongs to the caller.
//!
//! # Randomness
//!
//! Matching draws from a [`rand::rngs::StdRng`] seeded once per run. Give the
//! colorizer a [`seed`](Colorizer::seed) for reproducible results.

pub mod align;
pub mod colorizer;
pub mod feature;
pub mod image;
pub mod matcher;
pub mod propagate;
pub mod subsample;


pub use align::{most_common_luminance, AlignError, LuminanceAligner};
pub use colorizer::{
    ColorizeError, ColorizeMethod, ColorizeOptions, ColorizeReport, ColorizeState, Colorizer,
    NoMatchPolicy,
};
pub use feature::{
    FeatureError, FeatureExtractor, ImageFeatureGrid, LabPixel, PixelFeature, LAB_MAX_LUM,
    LAB_MIN_LUM,
};
pub use image::{Colorizable, FeatureImage, SourceImage, TargetImage};
pub use matcher::{MatchOutcome, SourceMatch, StochasticMatcher};
pub use propagate::NeighborPropagator;
pub use subsample::{
    divide_facet, sample_rects, subsample_luminance, Facet, SampleRect, SubsampleError,
};
