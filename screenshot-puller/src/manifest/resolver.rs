//! Locates the screenshot manifest on the device.
//!
//! Current instrumentation writes to external storage; older versions wrote
//! into the app's private data directory. Candidates are probed in order and
//! the first one present wins. No manifest at all means no screenshots were
//! captured, which produces an empty manifest rather than an error.

use std::path::Path;
use tracing::{debug, info, warn};

use super::{Manifest, MANIFEST_FILE_NAME};
use crate::device::RemoteTransport;
use crate::Result;

const ROOT_SCREENSHOT_DIR: &str = "/sdcard/screenshots";
const OLD_ROOT_SCREENSHOT_DIR: &str = "/data/data";

/// Where the local manifest came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManifestSource {
    /// Pulled from this remote path
    Remote(String),

    /// Nothing on the device; an empty manifest was written
    Empty,
}

/// Remote manifest paths for `package`, most recent layout first.
pub fn candidate_paths(package: &str) -> Vec<String> {
    vec![
        format!(
            "{}/{}/screenshots-default/{}",
            ROOT_SCREENSHOT_DIR, package, MANIFEST_FILE_NAME
        ),
        format!(
            "{}/{}/app_screenshots-default/{}",
            OLD_ROOT_SCREENSHOT_DIR, package, MANIFEST_FILE_NAME
        ),
    ]
}

/// Produce `<dir>/metadata.xml` for `package`.
pub fn resolve_manifest(
    transport: &dyn RemoteTransport,
    package: &str,
    dir: &Path,
) -> Result<ManifestSource> {
    let local = dir.join(MANIFEST_FILE_NAME);

    for candidate in candidate_paths(package) {
        debug!(path = %candidate, "Probing for screenshot manifest");
        if transport.remote_file_exists(&candidate)? {
            transport.pull(&candidate, &local)?;
            info!(path = %candidate, "Pulled screenshot manifest");
            return Ok(ManifestSource::Remote(candidate));
        }
    }

    warn!(package, "No screenshot manifest found on device, assuming no screenshots");
    Manifest::empty().save(dir)?;
    Ok(ManifestSource::Empty)
}
