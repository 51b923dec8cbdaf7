//! Fixed-cadence driver for the resume controller

use std::time::Duration;

use tokio::sync::broadcast;
use tracing::{error, info};

use autoplay_utils::Result;

use crate::controller::ResumeController;
use crate::device::Device;
use crate::observability::Metrics;

/// Default pause between cycles
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Drive the controller until a cycle fails or shutdown is requested
///
/// Every cycle is followed by the full interval, whatever it observed.
/// Shutdown is only noticed between cycles; a cycle in flight runs to
/// completion first. A failed cycle ends the loop with its error.
pub async fn run(
    controller: &ResumeController,
    device: &Device,
    interval: Duration,
    mut shutdown_rx: broadcast::Receiver<()>,
) -> Result<()> {
    let metrics = Metrics::global();
    info!(
        device = %device.id(),
        interval_secs = interval.as_secs(),
        "Poll loop started"
    );

    loop {
        if let Err(e) = controller.tick(device).await {
            metrics.record_transport_error();
            error!(device = %device.id(), error = %e, "Poll cycle failed");
            return Err(e);
        }
        metrics.record_cycle();

        tokio::select! {
            _ = tokio::time::sleep(interval) => {}
            _ = shutdown_rx.recv() => {
                info!("Poll loop shutting down");
                return Ok(());
            }
        }
    }
}
