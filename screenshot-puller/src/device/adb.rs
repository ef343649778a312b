//! Device transport backed by the `adb` command line tool.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tracing::debug;

use super::{DeviceTarget, RemoteTransport};
use crate::{PullError, Result};

const EXISTS_MARKER: &str = "EXISTS";
const MISSING_MARKER: &str = "DOES_NOT_EXIST";

/// Runs `adb` synchronously for every probe and pull.
#[derive(Debug, Clone)]
pub struct AdbTransport {
    binary: PathBuf,
    target: DeviceTarget,
}

impl AdbTransport {
    pub fn new(binary: impl Into<PathBuf>, target: DeviceTarget) -> Self {
        Self {
            binary: binary.into(),
            target,
        }
    }

    fn command_args(&self, args: &[&str]) -> Vec<String> {
        let mut all = self.target.bridge_args();
        all.extend(args.iter().map(|a| a.to_string()));
        all
    }

    fn run(&self, args: &[&str]) -> Result<Output> {
        let args = self.command_args(args);
        let command_line = format!("{} {}", self.binary.display(), args.join(" "));
        debug!(command = %command_line, "Running device bridge");

        let output = Command::new(&self.binary)
            .args(&args)
            .output()
            .map_err(|e| PullError::Transport {
                command: command_line.clone(),
                status: "not started".to_string(),
                stderr: e.to_string(),
            })?;

        if !output.status.success() {
            return Err(PullError::transport(command_line, &output));
        }

        Ok(output)
    }
}

impl RemoteTransport for AdbTransport {
    fn remote_file_exists(&self, path: &str) -> Result<bool> {
        let probe = exists_probe(path);
        let output = self.run(&["shell", &probe])?;
        Ok(probe_reports_existing(&String::from_utf8_lossy(&output.stdout)))
    }

    fn pull(&self, remote_path: &str, local_path: &Path) -> Result<()> {
        let local = local_path.to_string_lossy();
        self.run(&["pull", remote_path, &local])?;
        Ok(())
    }
}

/// Shell snippet that prints a marker instead of relying on the remote exit
/// status, which older bridges do not forward.
fn exists_probe(path: &str) -> String {
    format!("ls {} && echo {} || echo {}", path, EXISTS_MARKER, MISSING_MARKER)
}

fn probe_reports_existing(stdout: &str) -> bool {
    stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .last()
        == Some(EXISTS_MARKER)
}
