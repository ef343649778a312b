//! Utility modules for the screenshot puller.

pub mod errors;
pub mod logger;

pub use errors::{PullError, Result};
