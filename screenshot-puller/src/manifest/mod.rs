//! Screenshot manifest types.
//!
//! The manifest is the `metadata.xml` document written on the device by the
//! test instrumentation: a `<screenshots>` root with one `<screenshot>` child
//! per capture. Element names are a compatibility contract with the
//! instrumentation and must not change.
//!
//! Parsed records remember where they sit in the source text, so filtering
//! can drop records without re-serializing (and losing) anything else.

pub mod filter;
pub mod resolver;

use std::ops::Range;
use std::path::Path;

use crate::{PullError, Result};

/// File name of the manifest inside the working directory.
pub const MANIFEST_FILE_NAME: &str = "metadata.xml";

const ROOT_ELEMENT: &str = "screenshots";
const RECORD_ELEMENT: &str = "screenshot";

/// Largest accepted `tile_width`/`tile_height`.
pub const MAX_TILES_PER_SIDE: u32 = 256;

const EMPTY_MANIFEST: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<screenshots>
</screenshots>"#;

/// One named screenshot capture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenshotRecord {
    pub name: Option<String>,
    pub description: Option<String>,

    /// Present when the capture failed; such records have no image.
    pub error: Option<String>,

    pub tile_width: u32,
    pub tile_height: u32,

    /// Auxiliary diagnostics in document order, as (key, text).
    pub extras: Vec<(String, String)>,

    /// Remote paths of the image tiles.
    pub absolute_file_names: Vec<String>,

    /// Remote path of the view hierarchy dump.
    pub view_hierarchy: Option<String>,

    span: Range<usize>,
}

impl ScreenshotRecord {
    fn from_node(node: roxmltree::Node<'_, '_>) -> Result<Self> {
        Ok(Self {
            name: child_text(node, "name").filter(|n| !n.is_empty()),
            description: child_text(node, "description"),
            error: child_text(node, "error"),
            tile_width: child_dimension(node, "tile_width")?,
            tile_height: child_dimension(node, "tile_height")?,
            extras: node
                .children()
                .find(|c| c.has_tag_name("extras"))
                .map(|extras| {
                    extras
                        .children()
                        .filter(|c| c.is_element())
                        .map(|c| {
                            (
                                c.tag_name().name().to_string(),
                                c.text().unwrap_or_default().to_string(),
                            )
                        })
                        .collect()
                })
                .unwrap_or_default(),
            absolute_file_names: node
                .children()
                .filter(|c| c.has_tag_name("absolute_file_name"))
                .filter_map(|c| c.text())
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .collect(),
            view_hierarchy: child_text(node, "view_hierarchy")
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty()),
            span: node.range(),
        })
    }

    /// Whether the capture failed on the device.
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// Whether the image is split into more than one tile.
    pub fn is_tiled(&self) -> bool {
        self.tile_width > 1 || self.tile_height > 1
    }

    /// Local file name of the tile at column `x`, row `y`.
    pub fn tile_file_name(&self, x: u32, y: u32) -> String {
        tile_file_name(self.name.as_deref().unwrap_or_default(), x, y, self.is_tiled())
    }

    /// Remote files this record references, tiles first.
    pub fn remote_files(&self) -> impl Iterator<Item = &str> {
        self.absolute_file_names
            .iter()
            .map(String::as_str)
            .chain(self.view_hierarchy.as_deref())
    }
}

/// `<name>.png` for single-tile captures, `<name>_<x>_<y>.png` otherwise.
pub fn tile_file_name(name: &str, x: u32, y: u32, tiled: bool) -> String {
    if tiled {
        format!("{}_{}_{}.png", name, x, y)
    } else {
        format!("{}.png", name)
    }
}

/// A parsed manifest together with its source text.
#[derive(Debug, Clone)]
pub struct Manifest {
    source: String,
    records: Vec<ScreenshotRecord>,
}

impl Manifest {
    /// Parse manifest text.
    pub fn parse(source: String) -> Result<Self> {
        let records = {
            let doc = roxmltree::Document::parse(&source)?;
            let root = doc.root_element();
            if !root.has_tag_name(ROOT_ELEMENT) {
                return Err(PullError::ManifestFormat(format!(
                    "expected <{}> root element, found <{}>",
                    ROOT_ELEMENT,
                    root.tag_name().name()
                )));
            }

            root.children()
                .filter(|c| c.has_tag_name(RECORD_ELEMENT))
                .map(ScreenshotRecord::from_node)
                .collect::<Result<Vec<_>>>()?
        };

        Ok(Self { source, records })
    }

    /// A well-formed manifest with no records.
    pub fn empty() -> Self {
        Self {
            source: EMPTY_MANIFEST.to_string(),
            records: Vec::new(),
        }
    }

    /// Read `metadata.xml` from a working directory.
    pub fn load(dir: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(dir.join(MANIFEST_FILE_NAME))?;
        Self::parse(source)
    }

    /// Write `metadata.xml` into a working directory.
    pub fn save(&self, dir: &Path) -> Result<()> {
        std::fs::write(dir.join(MANIFEST_FILE_NAME), &self.source)?;
        Ok(())
    }

    pub fn records(&self) -> &[ScreenshotRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// New manifest keeping only the records accepted by `keep`, in order.
    /// Text outside the dropped `<screenshot>` elements is kept verbatim.
    pub fn retain<F>(&self, mut keep: F) -> Result<Self>
    where
        F: FnMut(&ScreenshotRecord) -> bool,
    {
        let mut source = String::with_capacity(self.source.len());
        let mut cursor = 0;

        for record in &self.records {
            if keep(record) {
                continue;
            }
            source.push_str(&self.source[cursor..record.span.start]);
            cursor = record.span.end;
        }
        source.push_str(&self.source[cursor..]);

        Self::parse(source)
    }
}

fn child_text(node: roxmltree::Node<'_, '_>, tag: &str) -> Option<String> {
    node.children()
        .find(|c| c.has_tag_name(tag))
        .map(|c| c.text().unwrap_or_default().to_string())
}

fn child_dimension(node: roxmltree::Node<'_, '_>, tag: &str) -> Result<u32> {
    let value = child_text(node, tag)
        .and_then(|t| t.trim().parse::<u32>().ok())
        .filter(|v| *v > 0)
        .unwrap_or(1);

    if value > MAX_TILES_PER_SIDE {
        return Err(PullError::ManifestFormat(format!(
            "<{}> of {} exceeds the limit of {} tiles",
            tag, value, MAX_TILES_PER_SIDE
        )));
    }
    Ok(value)
}
