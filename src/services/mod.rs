pub mod colorize_service;

pub use colorize_service::{ColorizeOutcome, ColorizeService, ImageInspection};
