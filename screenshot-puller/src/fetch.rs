//! Artifact fetcher - copies every file the manifest references.
//!
//! Each remote file lands in the working directory under its basename.
//! Any failed pull aborts the whole fetch.

use std::path::Path;
use tracing::{debug, info};

use crate::device::RemoteTransport;
use crate::manifest::Manifest;
use crate::{PullError, Result};

/// Fetch result summary
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FetchSummary {
    /// Records that referenced at least one file
    pub records: usize,
    pub images: usize,
    pub view_hierarchies: usize,
}

impl FetchSummary {
    pub fn total_files(&self) -> usize {
        self.images + self.view_hierarchies
    }
}

/// Pull all images and view hierarchy dumps referenced by `manifest` into `dir`.
pub fn fetch_artifacts(
    transport: &dyn RemoteTransport,
    manifest: &Manifest,
    dir: &Path,
) -> Result<FetchSummary> {
    let mut summary = FetchSummary::default();

    for record in manifest.records() {
        let mut pulled_any = false;

        for remote in &record.absolute_file_names {
            pull_into(transport, remote, dir)?;
            summary.images += 1;
            pulled_any = true;
        }

        if let Some(dump) = &record.view_hierarchy {
            pull_into(transport, dump, dir)?;
            summary.view_hierarchies += 1;
            pulled_any = true;
        }

        if pulled_any {
            summary.records += 1;
        }
    }

    info!(
        records = summary.records,
        images = summary.images,
        view_hierarchies = summary.view_hierarchies,
        "Fetched screenshot artifacts"
    );

    Ok(summary)
}

fn pull_into(transport: &dyn RemoteTransport, remote: &str, dir: &Path) -> Result<()> {
    let file_name = Path::new(remote).file_name().ok_or_else(|| {
        PullError::ManifestFormat(format!("remote path has no file name: {}", remote))
    })?;
    let local = dir.join(file_name);

    debug!(remote, local = %local.display(), "Pulling artifact");
    transport.pull(remote, &local)
}
