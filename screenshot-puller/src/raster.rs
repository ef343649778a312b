//! HTML-to-image rasterization.

use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::info;

use crate::{PullError, Result};

const WKHTMLTOIMAGE_DOWNLOADS: &str = "http://wkhtmltopdf.org/downloads.html";

/// Capability for turning the HTML report into an image.
pub trait Rasterizer {
    /// Fail with an actionable message if the tool cannot be run here.
    fn ensure_available(&self) -> Result<()>;

    fn rasterize(&self, html: &Path, output: &Path) -> Result<()>;
}

/// Rasterizer backed by the `wkhtmltoimage` command line tool.
#[derive(Debug, Clone)]
pub struct Wkhtmltoimage {
    program: String,
}

impl Wkhtmltoimage {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn locate(&self) -> Result<PathBuf> {
        which::which(&self.program).map_err(|_| PullError::MissingTool {
            tool: self.program.clone(),
            message: format!(
                "Could not find {} in your path, we need this for generating pngs\n\
                 Download an appropriate version from:\n    {}",
                self.program, WKHTMLTOIMAGE_DOWNLOADS
            ),
        })
    }
}

impl Default for Wkhtmltoimage {
    fn default() -> Self {
        Self::new("wkhtmltoimage")
    }
}

impl Rasterizer for Wkhtmltoimage {
    fn ensure_available(&self) -> Result<()> {
        self.locate().map(|_| ())
    }

    fn rasterize(&self, html: &Path, output: &Path) -> Result<()> {
        let program = self.locate()?;
        info!(html = %html.display(), output = %output.display(), "Rasterizing report");

        let status = Command::new(&program).arg(html).arg(output).status()?;
        if !status.success() {
            return Err(PullError::Rasterize(format!(
                "{} exited with {}",
                program.display(),
                status
            )));
        }
        Ok(())
    }
}
