//! Device discovery and selection

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use autoplay_utils::{AutoplayError, Result};

use crate::adb::{DeviceInfo, Transport};
use crate::device::Device;

/// Default TCP port for network debugging
pub const DEFAULT_ADB_PORT: u16 = 5555;

/// Picks one device when several are visible
#[async_trait]
pub trait DeviceChooser: Send + Sync {
    async fn choose(&self, devices: &[DeviceInfo]) -> Result<DeviceInfo>;
}

/// Asks on the controlling terminal
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalChooser;

#[async_trait]
impl DeviceChooser for TerminalChooser {
    async fn choose(&self, devices: &[DeviceInfo]) -> Result<DeviceInfo> {
        let devices = devices.to_vec();
        tokio::task::spawn_blocking(move || prompt(&devices, io::stdin().lock(), io::stderr()))
            .await
            .map_err(|e| AutoplayError::internal(format!("device prompt task failed: {}", e)))?
    }
}

/// Numbered prompt; re-asks until a valid choice or end of input
fn prompt<R: BufRead, W: Write>(devices: &[DeviceInfo], mut input: R, mut out: W) -> Result<DeviceInfo> {
    loop {
        writeln!(out, "Which Fire TV would you like to pair with?")?;
        for (idx, device) in devices.iter().enumerate() {
            writeln!(out, "  {}) {} ({})", idx + 1, device.id, device.kind)?;
        }
        write!(out, "Select [1-{}]: ", devices.len())?;
        out.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Err(AutoplayError::DeviceSelection(
                "no selection made".to_string(),
            ));
        }

        match parse_choice(&line, devices) {
            Some(device) => return Ok(device.clone()),
            None => writeln!(out, "Invalid choice: {}", line.trim())?,
        }
    }
}

/// Accepts a 1-based index or a listed device id
fn parse_choice<'a>(line: &str, devices: &'a [DeviceInfo]) -> Option<&'a DeviceInfo> {
    let line = line.trim();
    if let Ok(n) = line.parse::<usize>() {
        return n.checked_sub(1).and_then(|idx| devices.get(idx));
    }
    devices.iter().find(|d| d.id == line)
}

/// Network address for `ip`, adding the port unless one is given
fn network_id(ip: &str, port: u16) -> String {
    if ip.contains(':') {
        ip.to_string()
    } else {
        format!("{}:{}", ip, port)
    }
}

/// Resolve the device to drive
///
/// With an address: use it if already listed, otherwise connect to it.
/// Without: a single listed device is taken as is; several go to the
/// chooser; none is an error.
pub async fn select_device(
    transport: Arc<dyn Transport>,
    ip: Option<&str>,
    port: u16,
    chooser: &dyn DeviceChooser,
) -> Result<Device> {
    let devices = transport.list_devices().await?;

    let id = match ip {
        Some(ip) => {
            let wanted = network_id(ip, port);
            if devices.iter().any(|d| d.id == wanted) {
                info!(device = %wanted, "Using listed device");
                wanted
            } else {
                info!(addr = %wanted, "Device not listed, connecting");
                transport.connect(&wanted).await?
            }
        }
        None => match devices.as_slice() {
            [] => return Err(AutoplayError::NoDevices),
            [only] => {
                if only.kind != "device" {
                    warn!(device = %only.id, kind = %only.kind, "Selected device is not ready");
                }
                only.id.clone()
            }
            many => chooser.choose(many).await?.id,
        },
    };

    info!(device = %id, "Selected device");
    Ok(Device::new(id, transport))
}
