//! Override gate between the control endpoint and the resume loop
//!
//! The endpoint and the loop share exactly two facts: what the loop saw
//! last, and whether a human has asked automation to stand down. Each
//! fact has a single writer (loop writes the observation, endpoint writes
//! the suspension), so one atomic per field is enough.

use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};

use serde::{Deserialize, Serialize};
use tracing::info;

use autoplay_protocol::PlaybackState;

/// Shared loop state
#[derive(Debug)]
pub struct LoopState {
    /// Written by the resume controller once per observation
    last_observed: AtomicU8,
    /// Written only by the control endpoint
    suspended: AtomicBool,
}

impl Default for LoopState {
    fn default() -> Self {
        Self::new()
    }
}

impl LoopState {
    pub fn new() -> Self {
        Self {
            last_observed: AtomicU8::new(PlaybackState::Unknown.as_u8()),
            suspended: AtomicBool::new(false),
        }
    }

    /// Record the state the controller just observed
    pub fn record_observation(&self, state: PlaybackState) {
        self.last_observed.store(state.as_u8(), Ordering::SeqCst);
    }

    /// Last state observed by the controller
    pub fn last_observed(&self) -> PlaybackState {
        PlaybackState::from_u8(self.last_observed.load(Ordering::SeqCst))
    }

    /// Suspend or re-arm automated resume
    pub fn set_suspended(&self, suspended: bool) {
        self.suspended.store(suspended, Ordering::SeqCst);
    }

    pub fn is_suspended(&self) -> bool {
        self.suspended.load(Ordering::SeqCst)
    }
}

/// When a manual key press toggles the gate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SuspendPolicy {
    /// Trigger key while playing suspends; trigger key otherwise re-arms
    #[default]
    LastState,
    /// Manual key presses never touch the gate
    Disabled,
}

/// Effect of a manual key press on the gate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateChange {
    Suspended,
    Rearmed,
    Unchanged,
}

/// Decides how manual key presses affect automation
///
/// A person pressing play/pause on something that is playing is pausing it
/// on purpose, and the loop should not fight them. When the loop last saw
/// anything other than `Playing` the same key re-arms it, so pressing
/// play/pause again on paused content hands control back to the loop.
/// Only the literal trigger key is considered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverridePolicy {
    pub policy: SuspendPolicy,
    /// Key that toggles the gate, as sent to `/input/:key`
    pub trigger_key: String,
}

impl Default for OverridePolicy {
    fn default() -> Self {
        Self {
            policy: SuspendPolicy::default(),
            trigger_key: autoplay_protocol::KEYCODE_MEDIA_PLAY_PAUSE.to_string(),
        }
    }
}

impl OverridePolicy {
    pub fn new(policy: SuspendPolicy, trigger_key: impl Into<String>) -> Self {
        Self {
            policy,
            trigger_key: trigger_key.into(),
        }
    }

    /// Apply a manual key press to the gate
    pub fn on_key(&self, key: &str, gate: &LoopState) -> GateChange {
        if self.policy == SuspendPolicy::Disabled || key != self.trigger_key {
            return GateChange::Unchanged;
        }

        if gate.last_observed().is_playing() {
            gate.set_suspended(true);
            info!(key = %key, "Automated resume suspended");
            GateChange::Suspended
        } else {
            gate.set_suspended(false);
            info!(key = %key, "Automated resume re-armed");
            GateChange::Rearmed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loop_state_defaults() {
        let gate = LoopState::new();
        assert_eq!(gate.last_observed(), PlaybackState::Unknown);
        assert!(!gate.is_suspended());
    }

    #[test]
    fn test_record_and_read_observation() {
        let gate = LoopState::new();
        gate.record_observation(PlaybackState::Paused);
        assert_eq!(gate.last_observed(), PlaybackState::Paused);
        gate.record_observation(PlaybackState::Playing);
        assert_eq!(gate.last_observed(), PlaybackState::Playing);
    }

    #[test]
    fn test_trigger_while_playing_suspends() {
        let gate = LoopState::new();
        gate.record_observation(PlaybackState::Playing);

        let change = OverridePolicy::default().on_key("85", &gate);

        assert_eq!(change, GateChange::Suspended);
        assert!(gate.is_suspended());
    }

    #[test]
    fn test_trigger_while_unknown_rearms() {
        let gate = LoopState::new();
        gate.set_suspended(true);
        gate.record_observation(PlaybackState::Unknown);

        let change = OverridePolicy::default().on_key("85", &gate);

        assert_eq!(change, GateChange::Rearmed);
        assert!(!gate.is_suspended());
    }

    #[test]
    fn test_trigger_while_paused_rearms() {
        let gate = LoopState::new();
        gate.set_suspended(true);
        gate.record_observation(PlaybackState::Paused);

        let change = OverridePolicy::default().on_key("85", &gate);

        assert_eq!(change, GateChange::Rearmed);
        assert!(!gate.is_suspended());
        // The observation itself is untouched
        assert_eq!(gate.last_observed(), PlaybackState::Paused);
    }

    #[test]
    fn test_other_keys_leave_gate() {
        let gate = LoopState::new();
        gate.record_observation(PlaybackState::Playing);

        for key in ["19", "20", "66", "KEYCODE_MEDIA_PLAY_PAUSE"] {
            assert_eq!(OverridePolicy::default().on_key(key, &gate), GateChange::Unchanged);
        }
        assert!(!gate.is_suspended());
    }

    #[test]
    fn test_disabled_policy_never_suspends() {
        let gate = LoopState::new();
        gate.record_observation(PlaybackState::Playing);

        let policy = OverridePolicy::new(SuspendPolicy::Disabled, "85");

        assert_eq!(policy.on_key("85", &gate), GateChange::Unchanged);
        assert!(!gate.is_suspended());
    }

    #[test]
    fn test_custom_trigger_key() {
        let gate = LoopState::new();
        gate.record_observation(PlaybackState::Playing);

        let policy = OverridePolicy::new(SuspendPolicy::LastState, "KEYCODE_MEDIA_PAUSE");

        assert_eq!(policy.on_key("85", &gate), GateChange::Unchanged);
        assert_eq!(policy.on_key("KEYCODE_MEDIA_PAUSE", &gate), GateChange::Suspended);
    }
}
