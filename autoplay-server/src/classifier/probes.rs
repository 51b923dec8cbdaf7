//! Per-application playback probes
//!
//! Every pattern that depends on an application's dump format lives here.
//! Supporting another app means adding a probe, not touching the
//! controller.

use lazy_static::lazy_static;
use regex::Regex;

use autoplay_protocol::PlaybackState;

use crate::adb::commands;

/// Reads one application's playback state from a diagnostic dump
pub trait PlaybackProbe: Send + Sync {
    /// Package this probe understands
    fn package(&self) -> &'static str;

    /// Dump command whose output [`PlaybackProbe::interpret`] reads
    fn command(&self) -> &'static str;

    /// Derive the playback state from the command output
    fn interpret(&self, output: &str) -> PlaybackState;
}

lazy_static! {
    // `state=PlaybackState {state=3, position=81234, buffered position=0, speed=1.0, ...}`
    // Greedy within one line: the numeral after the last `state=` wins.
    static ref PLAYBACK_STATE_REGEX: Regex =
        Regex::new(r"state=PlaybackState.*state=(\d+)").unwrap();
}

/// Netflix, read from its media session
#[derive(Debug, Default, Clone, Copy)]
pub struct NetflixProbe;

impl NetflixProbe {
    pub const PACKAGE: &'static str = "com.netflix.ninja";
    /// Start of the Netflix session block; earlier sessions are skipped
    pub const SESSION_MARKER: &'static str = "com.netflix.ninja/Netflix media session";
}

impl PlaybackProbe for NetflixProbe {
    fn package(&self) -> &'static str {
        Self::PACKAGE
    }

    fn command(&self) -> &'static str {
        commands::DUMP_MEDIA_SESSION
    }

    fn interpret(&self, output: &str) -> PlaybackState {
        // Without the marker the whole dump is searched.
        let window = output
            .find(Self::SESSION_MARKER)
            .map(|idx| &output[idx..])
            .unwrap_or(output);

        PLAYBACK_STATE_REGEX
            .captures(window)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse::<u32>().ok())
            .map(PlaybackState::from_android_code)
            .unwrap_or(PlaybackState::Unknown)
    }
}

/// Hulu, inferred from audio routing
///
/// Hulu does not publish a usable media session; an active audio focus
/// holder backed by a binder proxy is the only reliable signal.
#[derive(Debug, Default, Clone, Copy)]
pub struct HuluProbe;

impl HuluProbe {
    pub const PACKAGE: &'static str = "com.hulu.plus";
    pub const AUDIO_MARKER: &'static str = "source:android.os.BinderProxy";
}

impl PlaybackProbe for HuluProbe {
    fn package(&self) -> &'static str {
        Self::PACKAGE
    }

    fn command(&self) -> &'static str {
        commands::DUMP_AUDIO
    }

    fn interpret(&self, output: &str) -> PlaybackState {
        if output.contains(Self::AUDIO_MARKER) {
            PlaybackState::Playing
        } else {
            PlaybackState::Paused
        }
    }
}

/// Probes for every supported application
pub fn default_probes() -> Vec<Box<dyn PlaybackProbe>> {
    vec![Box::new(NetflixProbe), Box::new(HuluProbe)]
}
