use serde::{Deserialize, Serialize};
use std::fmt;

/// Playback state of the foreground media application
///
/// Recomputed on every poll cycle and never persisted.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackState {
    /// No recognized application, or its state could not be read
    #[default]
    Unknown,
    /// Media is loaded but not advancing
    Paused,
    /// Media is playing
    Playing,
}

impl PlaybackState {
    /// Map an Android `PlaybackState` numeral to a playback state
    ///
    /// Only `STATE_PLAYING` (3) and `STATE_PAUSED` (2) are meaningful here;
    /// buffering, stopped, error and friends all collapse to `Unknown`.
    pub fn from_android_code(code: u32) -> Self {
        match code {
            3 => PlaybackState::Playing,
            2 => PlaybackState::Paused,
            _ => PlaybackState::Unknown,
        }
    }

    /// Compact encoding used by lock-free holders
    pub fn as_u8(self) -> u8 {
        match self {
            PlaybackState::Unknown => 0,
            PlaybackState::Paused => 2,
            PlaybackState::Playing => 3,
        }
    }

    /// Inverse of [`PlaybackState::as_u8`]; unrecognized values are `Unknown`
    pub fn from_u8(value: u8) -> Self {
        Self::from_android_code(u32::from(value))
    }

    pub fn is_playing(self) -> bool {
        self == PlaybackState::Playing
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PlaybackState::Unknown => "unknown",
            PlaybackState::Paused => "paused",
            PlaybackState::Playing => "playing",
        }
    }
}

impl fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Foreground application on the device
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(tag = "kind", content = "package", rename_all = "snake_case")]
pub enum AppIdentity {
    /// Package name of the top-most task
    Detected(String),
    /// The diagnostic dump did not name an application
    #[default]
    NotDetected,
}

impl AppIdentity {
    pub fn detected(package: impl Into<String>) -> Self {
        AppIdentity::Detected(package.into())
    }

    /// Package name, if one was detected
    pub fn package(&self) -> Option<&str> {
        match self {
            AppIdentity::Detected(package) => Some(package),
            AppIdentity::NotDetected => None,
        }
    }
}

impl fmt::Display for AppIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppIdentity::Detected(package) => f.write_str(package),
            AppIdentity::NotDetected => f.write_str("<none>"),
        }
    }
}

/// Action used to nudge a paused player back into playback
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ResumeAction {
    /// `input keyevent <code>`
    KeyEvent(String),
    /// `input press` (trackball click, selects the focused control)
    #[default]
    TrackballPress,
}

impl ResumeAction {
    /// Shell command that performs this action on the device
    pub fn shell_command(&self) -> String {
        match self {
            ResumeAction::KeyEvent(code) => format!("input keyevent {}", code),
            ResumeAction::TrackballPress => "input press".to_string(),
        }
    }
}
