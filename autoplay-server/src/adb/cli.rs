//! `adb` command-line client

use std::path::PathBuf;
use std::process::Output;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, trace};

use autoplay_utils::{AutoplayError, Result};

use super::{DeviceInfo, Transport};

/// Transport that shells out to the `adb` binary
#[derive(Debug, Clone)]
pub struct AdbCli {
    /// Path (or bare name resolved through PATH) of the adb executable
    adb_path: PathBuf,
}

impl Default for AdbCli {
    fn default() -> Self {
        Self::new("adb")
    }
}

impl AdbCli {
    pub fn new(adb_path: impl Into<PathBuf>) -> Self {
        Self {
            adb_path: adb_path.into(),
        }
    }

    /// Run adb with `args`, failing on spawn errors and non-zero exits
    async fn run(&self, args: &[&str]) -> Result<String> {
        let rendered = format!("adb {}", args.join(" "));
        trace!(command = %rendered, "Running adb");

        let output = Command::new(&self.adb_path)
            .args(args)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| AutoplayError::transport(&rendered, e.to_string()))?;

        check_status(&rendered, output)
    }
}

fn check_status(command: &str, output: Output) -> Result<String> {
    if !output.status.success() {
        return Err(AutoplayError::CommandFailed {
            command: command.to_string(),
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

#[async_trait]
impl Transport for AdbCli {
    async fn list_devices(&self) -> Result<Vec<DeviceInfo>> {
        let output = self.run(&["devices"]).await?;
        let devices = parse_device_list(&output);
        debug!(count = devices.len(), "Listed devices");
        Ok(devices)
    }

    async fn connect(&self, addr: &str) -> Result<String> {
        let output = self.run(&["connect", addr]).await?;
        parse_connect_output(addr, &output)
    }

    async fn shell(&self, device: &str, command: &str) -> Result<String> {
        self.run(&["-s", device, "shell", command]).await
    }
}

/// Parse `adb devices` output into device rows
///
/// Skips the header and the `* daemon ...` chatter adb prints while it
/// starts its server.
pub(crate) fn parse_device_list(output: &str) -> Vec<DeviceInfo> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter(|line| !line.starts_with("List of devices") && !line.starts_with('*'))
        .filter_map(|line| {
            let mut fields = line.split_whitespace();
            let id = fields.next()?;
            let kind = fields.next()?;
            Some(DeviceInfo::new(id, kind))
        })
        .collect()
}

/// Parse `adb connect` output
///
/// adb exits 0 even when the connection is refused, so success is judged
/// from the text alone.
pub(crate) fn parse_connect_output(addr: &str, output: &str) -> Result<String> {
    let line = output.trim();
    for prefix in ["already connected to ", "connected to "] {
        if let Some(id) = line.strip_prefix(prefix) {
            return Ok(id.trim().to_string());
        }
    }
    Err(AutoplayError::ConnectFailed {
        addr: addr.to_string(),
        message: if line.is_empty() {
            "no output from adb connect".to_string()
        } else {
            line.to_string()
        },
    })
}
