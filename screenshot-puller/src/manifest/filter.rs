//! Name-based manifest filtering.

use regex::Regex;
use std::path::Path;
use tracing::info;

use super::{Manifest, ScreenshotRecord};
use crate::Result;

/// Regular expression matched against record names.
///
/// The pattern is searched for anywhere in the name; anchor it with `^...$`
/// to require a full match.
#[derive(Debug, Clone)]
pub struct NameFilter {
    pattern: Regex,
}

impl NameFilter {
    pub fn new(pattern: &str) -> Result<Self> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
        })
    }

    /// Records without a name never match.
    pub fn matches(&self, record: &ScreenshotRecord) -> bool {
        record
            .name
            .as_deref()
            .is_some_and(|name| self.pattern.is_match(name))
    }

    pub fn as_str(&self) -> &str {
        self.pattern.as_str()
    }
}

/// Manifest holding only the records whose name matches, in original order.
pub fn filter_manifest(manifest: &Manifest, filter: &NameFilter) -> Result<Manifest> {
    manifest.retain(|record| filter.matches(record))
}

/// Rewrite the manifest in `dir` through `filter`. With no filter the file
/// is not touched.
pub fn filter_manifest_file(dir: &Path, filter: Option<&NameFilter>) -> Result<()> {
    let Some(filter) = filter else {
        return Ok(());
    };

    let manifest = Manifest::load(dir)?;
    let filtered = filter_manifest(&manifest, filter)?;

    info!(
        pattern = filter.as_str(),
        kept = filtered.len(),
        removed = manifest.len() - filtered.len(),
        "Filtered screenshot manifest"
    );

    filtered.save(dir)
}
