//! Remote control surface

mod http;

pub use http::ControlServer;

use std::sync::Arc;

use crate::device::Device;
use crate::gate::{LoopState, OverridePolicy};

/// Everything a request handler can reach
///
/// Handlers only talk to the loop through `gate`.
pub struct ApiState {
    pub device: Device,
    pub gate: Arc<LoopState>,
    pub policy: OverridePolicy,
}
