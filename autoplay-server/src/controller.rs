//! Resume controller
//!
//! One `tick` is one poll cycle: classify the device, publish what was
//! seen, and resume playback if it stays paused across two reads.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};

use autoplay_protocol::{PlaybackState, ResumeAction};
use autoplay_utils::{DedupLog, Result};

use crate::classifier::Classifier;
use crate::device::Device;
use crate::gate::LoopState;
use crate::observability::Metrics;

/// Default wait between the first paused read and the confirming read
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_secs(5);

/// Decides when to resume playback
pub struct ResumeController {
    classifier: Classifier,
    state: Arc<LoopState>,
    settle_delay: Duration,
    action: ResumeAction,
    status_log: DedupLog,
}

impl ResumeController {
    pub fn new(classifier: Classifier, state: Arc<LoopState>) -> Self {
        Self {
            classifier,
            state,
            settle_delay: DEFAULT_SETTLE_DELAY,
            action: ResumeAction::default(),
            status_log: DedupLog::new(),
        }
    }

    /// Set the wait before the confirming read
    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    /// Set the action used to resume playback
    pub fn with_action(mut self, action: ResumeAction) -> Self {
        self.action = action;
        self
    }

    pub fn state(&self) -> &Arc<LoopState> {
        &self.state
    }

    /// Run one cycle against the device and return the last state observed
    ///
    /// The device session is held for the whole cycle, settle delay
    /// included, so manual key presses land between cycles.
    pub async fn tick(&self, device: &Device) -> Result<PlaybackState> {
        let _session = device.lock_session().await;
        let metrics = Metrics::global();

        let state = self.observe(device).await?;

        if self.state.is_suspended() {
            debug!(device = %device.id(), state = %state, "Suspended, no action");
            metrics.record_suspended_cycle();
            return Ok(state);
        }

        match state {
            PlaybackState::Unknown => {
                self.status_log.info("Unknown state");
                Ok(state)
            }
            PlaybackState::Playing => {
                self.status_log.info("Playing");
                Ok(state)
            }
            PlaybackState::Paused => {
                self.status_log.info(&format!(
                    "Paused, waiting for {} seconds before pressing play",
                    self.settle_delay.as_secs()
                ));
                if !self.settle_delay.is_zero() {
                    tokio::time::sleep(self.settle_delay).await;
                }

                let confirmed = self.observe(device).await?;
                if confirmed.is_playing() {
                    debug!(device = %device.id(), "Playback resumed on its own");
                    return Ok(confirmed);
                }

                self.status_log.info("Paused, pressing play");
                device.perform(&self.action).await?;
                metrics.record_resume_action();
                info!(device = %device.id(), action = ?self.action, "Sent resume action");
                Ok(confirmed)
            }
        }
    }

    /// Classify once and publish the result
    async fn observe(&self, device: &Device) -> Result<PlaybackState> {
        let classification = self.classifier.classify(device).await?;
        self.state.record_observation(classification.state);
        Metrics::global().record_observation(classification.state);
        Ok(classification.state)
    }
}
