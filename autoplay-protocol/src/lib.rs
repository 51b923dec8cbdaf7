//! autoplay-protocol: Shared value types for firetv-autoplay
//!
//! Defines the playback model observed on the device and the status
//! document served by the control endpoint.

pub mod types;

// Re-export main types at crate root
pub use types::{AppIdentity, PlaybackState, ResumeAction, StatusReport};

/// Android key code for KEYCODE_MEDIA_PLAY_PAUSE
pub const KEYCODE_MEDIA_PLAY_PAUSE: u32 = 85;
