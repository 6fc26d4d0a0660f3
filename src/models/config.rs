use clap::ValueEnum;
use colorize_engine::colorizer::{ColorizeMethod, ColorizeOptions, Colorizer, NoMatchPolicy};
use colorize_engine::feature::{DEFAULT_DISPERSION_WINDOW, DEFAULT_ENTROPY_WINDOW};
use colorize_engine::matcher::{
    DEFAULT_ATTEMPTS, DEFAULT_DISPERSION_THRESHOLD, DEFAULT_LUMINANCE_THRESHOLD,
};
use serde::Deserialize;
use std::path::Path;

use crate::error::AppError;

/// Colorization method as written in config files and on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum MethodSetting {
    /// Match, then propagate to similar neighbors
    #[default]
    Neighbor,
    /// Match every pixel on its own
    Simple,
}

impl From<MethodSetting> for ColorizeMethod {
    fn from(method: MethodSetting) -> Self {
        match method {
            MethodSetting::Neighbor => ColorizeMethod::Neighbor,
            MethodSetting::Simple => ColorizeMethod::Simple,
        }
    }
}

/// Handling of pixels without a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum NoMatchSetting {
    #[default]
    Skip,
    Fallback,
    Abort,
}

impl From<NoMatchSetting> for NoMatchPolicy {
    fn from(setting: NoMatchSetting) -> Self {
        match setting {
            NoMatchSetting::Skip => NoMatchPolicy::Skip,
            NoMatchSetting::Fallback => NoMatchPolicy::Fallback,
            NoMatchSetting::Abort => NoMatchPolicy::Abort,
        }
    }
}

/// Colorization configuration loaded from a YAML file
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ColorizeConfig {
    /// Side of the dispersion window (odd, >= 3)
    pub dispersion_window: usize,

    /// Side of the entropy window (odd, >= 3)
    pub entropy_window: usize,

    /// Random source samples per matched pixel
    pub attempts: usize,

    pub luminance_threshold: f64,

    pub dispersion_threshold: f64,

    pub method: MethodSetting,

    pub no_match: NoMatchSetting,

    /// Fixed random seed for reproducible output
    pub seed: Option<u64>,

    /// Compute entropy alongside dispersion
    pub compute_entropy: bool,
}

impl Default for ColorizeConfig {
    fn default() -> Self {
        Self {
            dispersion_window: DEFAULT_DISPERSION_WINDOW,
            entropy_window: DEFAULT_ENTROPY_WINDOW,
            attempts: DEFAULT_ATTEMPTS,
            luminance_threshold: DEFAULT_LUMINANCE_THRESHOLD,
            dispersion_threshold: DEFAULT_DISPERSION_THRESHOLD,
            method: MethodSetting::default(),
            no_match: NoMatchSetting::default(),
            seed: None,
            compute_entropy: true,
        }
    }
}

impl ColorizeConfig {
    /// Parse a YAML document. Missing fields take their defaults.
    pub fn from_yaml(content: &str) -> Result<Self, AppError> {
        serde_yaml::from_str(content).map_err(|e| AppError::Config(e.to_string()))
    }

    /// Load configuration from a file, falling back to defaults
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match Self::from_yaml(&content) {
                Ok(config) => {
                    tracing::info!(
                        path = %path.display(),
                        method = ?config.method,
                        attempts = config.attempts,
                        "Loaded configuration"
                    );
                    config
                }
                Err(e) => {
                    tracing::warn!(%e, "Failed to parse config, using defaults");
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!(%e, "Failed to read config, using defaults");
                Self::default()
            }
        }
    }

    /// Engine options described by this config
    pub fn options(&self) -> ColorizeOptions {
        ColorizeOptions::new()
            .dispersion_window(self.dispersion_window)
            .entropy_window(self.entropy_window)
            .attempts(self.attempts)
            .luminance_threshold(self.luminance_threshold)
            .dispersion_threshold(self.dispersion_threshold)
            .compute_entropy(self.compute_entropy)
            .no_match(self.no_match.into())
    }

    /// Build the engine's colorizer
    pub fn to_colorizer(&self) -> Colorizer {
        let colorizer = Colorizer::new()
            .options(self.options())
            .method(self.method.into());
        match self.seed {
            Some(seed) => colorizer.seed(seed),
            None => colorizer,
        }
    }
}
