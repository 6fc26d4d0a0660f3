//! Image files in and out of the engine.

mod convert;
mod png_io;

pub use convert::{lab_pixels, result_to_rgb, source_from_rgb, target_from_rgb};
pub use png_io::{decode_png, encode_png, load_png, save_png, RgbImage};
