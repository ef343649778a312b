//! Pull pipeline - sequences resolve, filter, fetch, render and rasterize.
//!
//! Stages run in a fixed order and the first failure aborts the run. The
//! working directory is only removed after a successful rasterization; any
//! earlier failure leaves it in place for inspection.

use std::path::{Path, PathBuf};
use tracing::info;

use crate::device::RemoteTransport;
use crate::fetch::fetch_artifacts;
use crate::manifest::filter::{filter_manifest_file, NameFilter};
use crate::manifest::resolver::resolve_manifest;
use crate::manifest::Manifest;
use crate::raster::Rasterizer;
use crate::report::{copy_assets, render_report};
use crate::Result;

const TEMP_DIR_PREFIX: &str = "screenshots";

/// Pipeline configuration
#[derive(Debug, Clone, Default)]
pub struct PullOptions {
    /// Package (process) whose screenshots to pull
    pub package: String,

    /// Keep only records whose name matches
    pub filter_name_regex: Option<String>,

    /// Rasterize the report here instead of leaving it for a browser
    pub output_image: Option<PathBuf>,

    /// Working directory; a fresh temporary one when unset
    pub working_dir: Option<PathBuf>,
}

/// What the run produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PullOutcome {
    /// Report left on disk for interactive viewing
    Report { html: PathBuf },

    /// Report rasterized; the working directory is gone
    Image { path: PathBuf },
}

/// Run the whole pipeline against `transport`.
pub fn pull_screenshots(
    transport: &dyn RemoteTransport,
    rasterizer: &dyn Rasterizer,
    options: &PullOptions,
) -> Result<PullOutcome> {
    let filter = options
        .filter_name_regex
        .as_deref()
        .map(NameFilter::new)
        .transpose()?;

    let dir = prepare_working_dir(options.working_dir.as_deref())?;
    info!(package = %options.package, dir = %dir.display(), "Pulling screenshots");

    copy_assets(&dir)?;

    resolve_manifest(transport, &options.package, &dir)?;
    filter_manifest_file(&dir, filter.as_ref())?;
    let manifest = Manifest::load(&dir)?;
    fetch_artifacts(transport, &manifest, &dir)?;

    let html = render_report(&dir)?;

    let Some(output) = &options.output_image else {
        return Ok(PullOutcome::Report { html });
    };

    rasterizer.ensure_available()?;
    rasterizer.rasterize(&html, output)?;
    std::fs::remove_dir_all(&dir)?;
    info!(output = %output.display(), "Removed working directory after rasterizing");

    Ok(PullOutcome::Image {
        path: output.clone(),
    })
}

fn prepare_working_dir(requested: Option<&Path>) -> Result<PathBuf> {
    match requested {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            Ok(dir.to_path_buf())
        }
        // Kept on disk: the report outlives this process
        None => Ok(tempfile::Builder::new()
            .prefix(TEMP_DIR_PREFIX)
            .tempdir()?
            .keep()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::fake::FakeDevice;
    use crate::manifest::resolver::candidate_paths;
    use crate::manifest::tests::SAMPLE;
    use crate::raster::tests::FakeRasterizer;
    use crate::PullError;
    use tempfile::TempDir;

    const PACKAGE: &str = "com.example.tests";
    const REMOTE_DIR: &str = "/sdcard/screenshots/com.example.tests/screenshots-default";

    fn device() -> FakeDevice {
        FakeDevice::default()
            .with_file(&candidate_paths(PACKAGE)[0], SAMPLE)
            .with_file(&format!("{}/login_screen_0_0.png", REMOTE_DIR), b"t0".to_vec())
            .with_file(&format!("{}/login_screen_1_0.png", REMOTE_DIR), b"t1".to_vec())
            .with_file(&format!("{}/login_screen_dump.json", REMOTE_DIR), b"{}".to_vec())
            .with_file(&format!("{}/profile.png", REMOTE_DIR), b"p".to_vec())
    }

    fn options(dir: &Path) -> PullOptions {
        PullOptions {
            package: PACKAGE.to_string(),
            working_dir: Some(dir.to_path_buf()),
            ..Default::default()
        }
    }

    #[test]
    fn test_interactive_report() -> Result<()> {
        let work = TempDir::new()?;
        let rasterizer = FakeRasterizer::new(true);

        let outcome = pull_screenshots(&device(), &rasterizer, &options(work.path()))?;

        let PullOutcome::Report { html } = outcome else {
            panic!("expected an interactive report");
        };
        let page = std::fs::read_to_string(&html)?;
        assert!(page.contains(r#"<img src="./login_screen_0_0.png" />"#));
        assert!(page.contains(r#"<img src="./login_screen_1_0.png" />"#));
        assert!(page.contains(r#"<img src="./profile.png" />"#));
        assert!(page.contains("screenshot_error"));

        for asset in ["default.css", "default.js", "background.png", "login_screen_dump.json"] {
            assert!(work.path().join(asset).exists(), "{} missing", asset);
        }
        assert!(rasterizer.calls.borrow().is_empty());
        Ok(())
    }

    #[test]
    fn test_filter_limits_fetch_and_report() -> Result<()> {
        let work = TempDir::new()?;
        let device = device();
        let mut opts = options(work.path());
        opts.filter_name_regex = Some("^login".to_string());

        let outcome = pull_screenshots(&device, &FakeRasterizer::new(true), &opts)?;
        let PullOutcome::Report { html } = outcome else {
            panic!("expected an interactive report");
        };

        let page = std::fs::read_to_string(html)?;
        assert_eq!(page.matches(r#"class="screenshot_name""#).count(), 1);
        assert!(page.contains("login_screen"));
        assert!(!page.contains("profile"));
        assert!(!work.path().join("profile.png").exists());
        assert!(device
            .pulls
            .borrow()
            .iter()
            .all(|(remote, _)| !remote.ends_with("profile.png")));
        Ok(())
    }

    #[test]
    fn test_filter_keeps_order_and_restripes() -> Result<()> {
        let work = TempDir::new()?;
        let mut opts = options(work.path());
        opts.filter_name_regex = Some("^(login_screen|profile)$".to_string());

        let outcome = pull_screenshots(&device(), &FakeRasterizer::new(true), &opts)?;
        let PullOutcome::Report { html } = outcome else {
            panic!("expected an interactive report");
        };
        let page = std::fs::read_to_string(html)?;

        let names: Vec<&str> = page
            .split(r#"<div class="screenshot_name">"#)
            .skip(1)
            .map(|rest| &rest[..rest.find("</div>").unwrap_or(0)])
            .collect();
        assert_eq!(names, vec!["login_screen", "profile"]);

        // settings_crash sat between them; the stripe restarts over what is left
        let classes: Vec<&str> = page
            .split(r#"<div class=""#)
            .skip(1)
            .map(|rest| &rest[..rest.find('"').unwrap_or(0)])
            .filter(|class| class.starts_with("screenshot") && !class.contains('_'))
            .collect();
        assert_eq!(classes, vec!["screenshot alternate", "screenshot"]);
        assert!(!page.contains("settings_crash"));
        Ok(())
    }

    #[test]
    fn test_no_manifest_on_device() -> Result<()> {
        let work = TempDir::new()?;
        let device = FakeDevice::default();

        let outcome = pull_screenshots(&device, &FakeRasterizer::new(true), &options(work.path()))?;
        let PullOutcome::Report { html } = outcome else {
            panic!("expected an interactive report");
        };

        let page = std::fs::read_to_string(html)?;
        assert!(!page.contains("screenshot_name"));
        assert!(Manifest::load(work.path())?.is_empty());
        Ok(())
    }

    #[test]
    fn test_rasterize_removes_working_dir() -> Result<()> {
        let outer = TempDir::new()?;
        let work = outer.path().join("work");
        let image = outer.path().join("report.png");
        let rasterizer = FakeRasterizer::new(true);

        let mut opts = options(&work);
        opts.output_image = Some(image.clone());

        let outcome = pull_screenshots(&device(), &rasterizer, &opts)?;
        assert_eq!(outcome, PullOutcome::Image { path: image.clone() });
        assert!(image.exists());
        assert!(!work.exists());

        let calls = rasterizer.calls.borrow();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].0.ends_with("index.html"));
        Ok(())
    }

    #[test]
    fn test_missing_rasterizer_keeps_working_dir() -> Result<()> {
        let outer = TempDir::new()?;
        let work = outer.path().join("work");
        let rasterizer = FakeRasterizer::new(false);

        let mut opts = options(&work);
        opts.output_image = Some(outer.path().join("report.png"));

        let result = pull_screenshots(&device(), &rasterizer, &opts);
        assert!(matches!(result, Err(PullError::MissingTool { .. })));
        assert!(rasterizer.calls.borrow().is_empty());
        assert!(work.join("index.html").exists());
        assert!(!outer.path().join("report.png").exists());
        Ok(())
    }

    #[test]
    fn test_invalid_filter_fails_before_device_work() -> Result<()> {
        let work = TempDir::new()?;
        let device = device();
        let mut opts = options(work.path());
        opts.filter_name_regex = Some("[".to_string());

        let result = pull_screenshots(&device, &FakeRasterizer::new(true), &opts);
        assert!(matches!(result, Err(PullError::InvalidPattern(_))));
        assert!(device.probes.borrow().is_empty());
        Ok(())
    }

    #[test]
    fn test_transport_failure_aborts_run() -> Result<()> {
        let work = TempDir::new()?;
        // Manifest references files the device does not have
        let device = FakeDevice::default().with_file(&candidate_paths(PACKAGE)[0], SAMPLE);

        let result = pull_screenshots(&device, &FakeRasterizer::new(true), &options(work.path()));
        assert!(matches!(result, Err(PullError::Transport { .. })));
        assert!(!work.path().join("index.html").exists());
        assert!(work.path().join("metadata.xml").exists());
        Ok(())
    }

    #[test]
    fn test_temporary_working_dir() -> Result<()> {
        let device = FakeDevice::default();
        let opts = PullOptions {
            package: PACKAGE.to_string(),
            ..Default::default()
        };

        let outcome = pull_screenshots(&device, &FakeRasterizer::new(true), &opts)?;
        let PullOutcome::Report { html } = outcome else {
            panic!("expected an interactive report");
        };
        let dir = html.parent().map(Path::to_path_buf).unwrap_or_default();
        assert!(dir
            .file_name()
            .is_some_and(|n| n.to_string_lossy().starts_with(TEMP_DIR_PREFIX)));
        std::fs::remove_dir_all(dir)?;
        Ok(())
    }
}
