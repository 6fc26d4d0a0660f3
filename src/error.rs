use colorize_engine::{ColorizeError, FeatureError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PNG decode error: {0}")]
    PngDecode(String),

    #[error("PNG encode error: {0}")]
    PngEncode(String),

    #[error("Unsupported PNG format: {0}")]
    UnsupportedFormat(String),

    #[error("Pixel count {actual} does not match {width}x{height}")]
    DimensionMismatch {
        width: usize,
        height: usize,
        actual: usize,
    },

    #[error("Image has no pixels")]
    Empty,

    #[error("Feature grid error: {0}")]
    Feature(#[from] FeatureError),
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Image error: {0}")]
    Image(#[from] ImageError),

    #[error("Colorization error: {0}")]
    Colorize(#[from] ColorizeError),

    #[error("Config error: {0}")]
    Config(String),
}
