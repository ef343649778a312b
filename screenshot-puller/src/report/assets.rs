//! Static files the report references by relative path.

use std::path::Path;
use tracing::debug;

use crate::Result;

pub struct StaticAsset {
    pub file_name: &'static str,
    pub contents: &'static [u8],
}

pub const STATIC_ASSETS: [StaticAsset; 3] = [
    StaticAsset {
        file_name: "default.css",
        contents: include_bytes!("../../assets/default.css"),
    },
    StaticAsset {
        file_name: "default.js",
        contents: include_bytes!("../../assets/default.js"),
    },
    StaticAsset {
        file_name: "background.png",
        contents: include_bytes!("../../assets/background.png"),
    },
];

/// Write the stylesheet, script and background image into `dir`.
pub fn copy_assets(dir: &Path) -> Result<()> {
    for asset in &STATIC_ASSETS {
        let dest = dir.join(asset.file_name);
        std::fs::write(&dest, asset.contents)?;
        debug!(path = %dest.display(), "Copied report asset");
    }
    Ok(())
}
