//! Screenshot Puller Library
//!
//! Pulls screenshot test artifacts off an Android device and renders them
//! into a static HTML report, optionally rasterized to an image.

pub mod config;
pub mod device;
pub mod fetch;
pub mod manifest;
pub mod package;
pub mod pipeline;
pub mod raster;
pub mod report;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use pipeline::{pull_screenshots, PullOptions, PullOutcome};
pub use utils::errors::PullError;
pub type Result<T> = std::result::Result<T, PullError>;
