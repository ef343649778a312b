//! Custom error types for the screenshot puller.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PullError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Transport error: `{command}` failed ({status}): {stderr}")]
    Transport {
        command: String,
        status: String,
        stderr: String,
    },

    #[error("Manifest parse error: {0}")]
    ManifestParse(#[from] roxmltree::Error),

    #[error("Manifest format error: {0}")]
    ManifestFormat(String),

    #[error("Invalid name filter: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("{message}")]
    MissingTool { tool: String, message: String },

    #[error("Rasterization failed: {0}")]
    Rasterize(String),

    #[error("Package inspection error: {0}")]
    Package(String),
}

impl PullError {
    /// Build a transport error from a finished bridge command.
    pub fn transport(command: String, output: &std::process::Output) -> Self {
        PullError::Transport {
            command,
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PullError>;
