//! Package name lookup for application bundles.
//!
//! Used by `--apk`: the bundle is inspected with `aapt dump badging` from the
//! configured Android SDK.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::debug;
use walkdir::WalkDir;

use crate::{PullError, Result};

const PACKAGE_LINE_PREFIX: &str = "package:";
const NAME_PREFIX: &str = "name='";

/// Capability for reading the package identifier out of a bundle.
pub trait PackageInspector {
    fn package_name(&self, bundle: &Path) -> Result<String>;
}

/// Inspector backed by the SDK's `aapt` tool.
#[derive(Debug, Clone)]
pub struct Aapt {
    binary: PathBuf,
}

impl Aapt {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Find `aapt` inside an SDK installation.
    pub fn from_sdk(android_sdk: &Path) -> Result<Self> {
        find_aapt(android_sdk).map(Self::new)
    }
}

impl PackageInspector for Aapt {
    fn package_name(&self, bundle: &Path) -> Result<String> {
        debug!(aapt = %self.binary.display(), bundle = %bundle.display(), "Inspecting bundle");

        let output = Command::new(&self.binary)
            .args(["dump", "badging"])
            .arg(bundle)
            .stderr(Stdio::null())
            .output()?;

        if !output.status.success() {
            return Err(PullError::Package(format!(
                "{} dump badging {} exited with {}",
                self.binary.display(),
                bundle.display(),
                output.status
            )));
        }

        parse_badging(&String::from_utf8_lossy(&output.stdout)).ok_or_else(|| {
            PullError::Package(format!("no package name found in {}", bundle.display()))
        })
    }
}

/// Pick `aapt` from `<sdk>/build-tools/<version>/aapt`.
///
/// `android-*` directories are an old layout and only used when nothing else
/// exists. Within each group the lexicographically last version wins.
pub fn find_aapt(android_sdk: &Path) -> Result<PathBuf> {
    let build_tools = android_sdk.join("build-tools");
    if !build_tools.is_dir() {
        return Err(PullError::Package(format!(
            "no build-tools directory in Android SDK at {}",
            android_sdk.display()
        )));
    }

    let mut current = Vec::new();
    let mut legacy = Vec::new();

    for entry in WalkDir::new(&build_tools).min_depth(2).max_depth(2) {
        let entry = entry.map_err(|e| PullError::Io(e.into()))?;
        if entry.file_name() != "aapt" {
            continue;
        }

        let version = entry
            .path()
            .parent()
            .and_then(Path::file_name)
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        if version.starts_with("android-") {
            legacy.push(entry.into_path());
        } else {
            current.push(entry.into_path());
        }
    }

    current.sort();
    legacy.sort();

    current.pop().or_else(|| legacy.pop()).ok_or_else(|| {
        PullError::Package(format!("aapt not found under {}", build_tools.display()))
    })
}

/// Package name from `aapt dump badging` output.
pub fn parse_badging(output: &str) -> Option<String> {
    output
        .lines()
        .find(|line| line.starts_with(PACKAGE_LINE_PREFIX))
        .and_then(parse_package_line)
}

/// Extract the name from a line like
/// `package: name='com.example.tests' versionCode='1' versionName=''`.
pub fn parse_package_line(line: &str) -> Option<String> {
    line.split_whitespace()
        .find_map(|word| word.strip_prefix(NAME_PREFIX))
        .map(|rest| rest.strip_suffix('\'').unwrap_or(rest).to_string())
}
