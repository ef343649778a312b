//! Remote device access.
//!
//! The pipeline only needs two operations from a device: an existence
//! probe and a file pull. Everything device-specific lives behind
//! [`RemoteTransport`].

pub mod adb;

use std::path::Path;

use crate::Result;

pub use adb::AdbTransport;

/// Capability for reading files off a remote device.
pub trait RemoteTransport {
    /// Check whether `path` exists on the device.
    fn remote_file_exists(&self, path: &str) -> Result<bool>;

    /// Copy `remote_path` from the device to `local_path`.
    fn pull(&self, remote_path: &str, local_path: &Path) -> Result<()>;
}

/// Which attached device the bridge should talk to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DeviceTarget {
    /// Whatever single device the bridge picks
    #[default]
    Default,

    /// The only running emulator (`-e`)
    Emulator,

    /// The only USB-connected device (`-d`)
    Usb,

    /// A device by serial number (`-s <serial>`)
    Serial(String),
}

impl DeviceTarget {
    /// Bridge arguments selecting this target, placed before the sub-command.
    pub fn bridge_args(&self) -> Vec<String> {
        match self {
            DeviceTarget::Default => Vec::new(),
            DeviceTarget::Emulator => vec!["-e".to_string()],
            DeviceTarget::Usb => vec!["-d".to_string()],
            DeviceTarget::Serial(serial) => vec!["-s".to_string(), serial.clone()],
        }
    }
}

#[cfg(test)]
pub(crate) mod fake {
    use super::RemoteTransport;
    use crate::{PullError, Result};
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::path::{Path, PathBuf};

    /// In-memory device used by tests across the crate.
    #[derive(Default)]
    pub struct FakeDevice {
        pub files: HashMap<String, Vec<u8>>,
        pub pulls: RefCell<Vec<(String, PathBuf)>>,
        pub probes: RefCell<Vec<String>>,
    }

    impl FakeDevice {
        pub fn with_file(mut self, path: &str, contents: impl Into<Vec<u8>>) -> Self {
            self.files.insert(path.to_string(), contents.into());
            self
        }
    }

    impl RemoteTransport for FakeDevice {
        fn remote_file_exists(&self, path: &str) -> Result<bool> {
            self.probes.borrow_mut().push(path.to_string());
            Ok(self.files.contains_key(path))
        }

        fn pull(&self, remote_path: &str, local_path: &Path) -> Result<()> {
            let contents = self.files.get(remote_path).ok_or_else(|| PullError::Transport {
                command: format!("pull {}", remote_path),
                status: "exit status: 1".to_string(),
                stderr: format!("remote object '{}' does not exist", remote_path),
            })?;
            std::fs::write(local_path, contents)?;
            self.pulls
                .borrow_mut()
                .push((remote_path.to_string(), local_path.to_path_buf()));
            Ok(())
        }
    }
}
