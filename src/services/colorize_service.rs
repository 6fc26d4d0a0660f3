use colorize_engine::{
    most_common_luminance, subsample_luminance, ColorizeError, ColorizeReport, FeatureExtractor,
    FeatureImage, ImageFeatureGrid, SourceImage,
};
use std::path::Path;

use crate::error::AppError;
use crate::imaging::{self, RgbImage};
use crate::models::ColorizeConfig;

/// Result of colorizing an in-memory image pair
#[derive(Debug, Clone)]
pub struct ColorizeOutcome {
    pub image: RgbImage,
    pub report: ColorizeReport,
}

/// Luminance summary of one image, as printed by `greytocolor inspect`
#[derive(Debug, Clone, PartialEq)]
pub struct ImageInspection {
    pub width: usize,
    pub height: usize,
    pub min_luminance: f64,
    pub max_luminance: f64,
    pub modal_luminance: f64,
    /// Mean relative luminance per sample rectangle, width facets outer
    pub passport: Vec<f64>,
}

/// Loads images, runs the engine and writes results
pub struct ColorizeService {
    config: ColorizeConfig,
}

impl ColorizeService {
    pub fn new(config: ColorizeConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ColorizeConfig {
        &self.config
    }

    /// Colorize `target` with the chroma of `source`
    pub fn colorize(
        &self,
        target: &RgbImage,
        source: &RgbImage,
    ) -> Result<ColorizeOutcome, AppError> {
        let mut target_image = imaging::target_from_rgb(target)?;
        let mut source_image = imaging::source_from_rgb(source)?;

        let mut colorizer = self.config.to_colorizer();
        let report = colorizer.colorize(&mut target_image, &mut source_image)?;

        Ok(ColorizeOutcome {
            image: imaging::result_to_rgb(&target_image)?,
            report,
        })
    }

    /// Colorize PNG files and write the result as PNG
    pub fn colorize_files(
        &self,
        target: &Path,
        source: &Path,
        output: &Path,
    ) -> Result<ColorizeReport, AppError> {
        let target_rgb = imaging::load_png(target)?;
        let source_rgb = imaging::load_png(source)?;
        tracing::info!(
            target = %target.display(),
            source = %source.display(),
            target_size = %format!("{}x{}", target_rgb.width(), target_rgb.height()),
            source_size = %format!("{}x{}", source_rgb.width(), source_rgb.height()),
            "Colorizing"
        );

        let outcome = self.colorize(&target_rgb, &source_rgb)?;
        imaging::save_png(output, &outcome.image)?;
        Ok(outcome.report)
    }

    /// Luminance range, modal luminance and subsampled passport of an image
    pub fn inspect(&self, image: &RgbImage, samples: usize) -> Result<ImageInspection, AppError> {
        let lab = imaging::lab_pixels(image)?;
        let mut grid = ImageFeatureGrid::from_lab(image.width(), image.height(), &lab)
            .map_err(ColorizeError::from)?;
        let rejected = FeatureExtractor::default().relative_luminance(&mut grid);
        if rejected > 0 {
            tracing::warn!(rejected, "Pixels outside the luminance domain");
        }

        let min_luminance = grid.min_luminance().ok_or(ColorizeError::EmptyImage("inspected"))?;
        let max_luminance = grid.max_luminance().ok_or(ColorizeError::EmptyImage("inspected"))?;
        let modal_luminance =
            most_common_luminance(&grid).ok_or(ColorizeError::EmptyImage("inspected"))?;

        let source = SourceImage::new(grid);
        let passport = subsample_luminance(&source, samples).map_err(ColorizeError::from)?;

        Ok(ImageInspection {
            width: source.width(),
            height: source.height(),
            min_luminance,
            max_luminance,
            modal_luminance,
            passport,
        })
    }

    pub fn inspect_file(&self, path: &Path, samples: usize) -> Result<ImageInspection, AppError> {
        let image = imaging::load_png(path)?;
        self.inspect(&image, samples)
    }
}
