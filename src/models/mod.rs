pub mod config;

pub use config::{ColorizeConfig, MethodSetting, NoMatchSetting};
