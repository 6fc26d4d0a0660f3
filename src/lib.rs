//! GreyToColor
//!
//! Colorizes greyscale PNG images with the colors of a similar color image.
//! The colorization itself lives in the `colorize-engine` crate; this
//! library adds color conversion, PNG I/O, configuration and the service
//! used by the command line. It is exposed for integration testing.

pub mod color;
pub mod error;
pub mod imaging;
pub mod models;
pub mod services;
