use serde::{Deserialize, Serialize};

use super::playback::PlaybackState;

/// Snapshot served by `GET /status`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusReport {
    /// Device the loop is driving
    pub device: String,
    /// Last state recorded by the resume controller
    pub state: PlaybackState,
    /// Whether automated resume is currently suspended
    pub suspended: bool,
}
