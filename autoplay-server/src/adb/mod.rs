//! Transport adapter for the Android debug bridge
//!
//! The rest of the server only needs "run this shell command on that
//! device and hand me everything it printed". [`Transport`] is that seam;
//! [`AdbCli`] fulfils it by driving the `adb` binary.

mod cli;

pub use cli::AdbCli;

use async_trait::async_trait;
use autoplay_utils::Result;

/// Shell commands issued against the device
pub mod commands {
    use lazy_static::lazy_static;
    use regex::Regex;

    lazy_static! {
        static ref KEY_REGEX: Regex = Regex::new(r"^(?:\d{1,4}|KEYCODE_[A-Z0-9_]{1,40})$").unwrap();
    }

    /// Recent task list, top-most task first
    pub const DUMP_RECENTS: &str = "dumpsys activity recents";
    /// Activity manager state including the resumed activity
    pub const DUMP_ACTIVITIES: &str = "dumpsys activity activities";
    /// Media session service dump
    pub const DUMP_MEDIA_SESSION: &str = "dumpsys media_session";
    /// Audio service dump
    pub const DUMP_AUDIO: &str = "dumpsys audio";

    /// Key event injection for an Android key code or `KEYCODE_*` name
    pub fn key_event(key: &str) -> String {
        format!("input keyevent {}", key)
    }

    /// Whether `key` is a decimal key code or a `KEYCODE_*` name
    ///
    /// Keys end up on a device shell command line, so nothing else is let
    /// through.
    pub fn is_valid_key(key: &str) -> bool {
        KEY_REGEX.is_match(key)
    }
}

/// One row of the device listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInfo {
    /// Serial or `host:port`
    pub id: String,
    /// Connection state as reported by adb (`device`, `offline`, `unauthorized`, ...)
    pub kind: String,
}

impl DeviceInfo {
    pub fn new(id: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
        }
    }
}

/// Capability to reach devices over the debug bridge
#[async_trait]
pub trait Transport: Send + Sync {
    /// List the devices the bridge currently knows about
    async fn list_devices(&self) -> Result<Vec<DeviceInfo>>;

    /// Connect to a network device and return the id it is listed under
    async fn connect(&self, addr: &str) -> Result<String>;

    /// Run `command` in a shell on `device` and return its complete output
    async fn shell(&self, device: &str, command: &str) -> Result<String>;
}
