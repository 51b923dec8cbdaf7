//! Configuration schema structs

use std::net::SocketAddr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use autoplay_protocol::ResumeAction;
use autoplay_utils::{LogConfig, LogOutput};

use crate::classifier::ForegroundStrategy;
use crate::discovery::DEFAULT_ADB_PORT;
use crate::gate::{OverridePolicy, SuspendPolicy};

/// Root configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub device: DeviceConfig,
    pub polling: PollingConfig,
    pub api: ApiConfig,
    pub logging: LoggingConfig,
}

/// Which device to drive and how to reach it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    /// Device address; the positional CLI argument wins over this
    pub address: Option<String>,
    /// TCP port appended to bare addresses (default: 5555)
    pub port: u16,
    /// adb executable, bare name or path (default: "adb")
    pub adb_path: String,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            address: None,
            port: DEFAULT_ADB_PORT,
            adb_path: "adb".to_string(),
        }
    }
}

/// Poll loop and resume behaviour
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollingConfig {
    /// Pause between cycles in seconds (default: 1)
    pub interval_secs: u64,
    /// Wait before the confirming read in seconds (default: 5)
    pub settle_secs: u64,
    /// How a paused player is resumed
    pub resume_action: ResumeAction,
    /// How the foreground application is read
    pub foreground_strategy: ForegroundStrategy,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval_secs: 1,
            settle_secs: 5,
            resume_action: ResumeAction::default(),
            foreground_strategy: ForegroundStrategy::default(),
        }
    }
}

impl PollingConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_secs(self.settle_secs)
    }
}

/// HTTP control endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Serve the endpoint (also enabled by `--api`)
    pub enabled: bool,
    /// Listen address (default: 0.0.0.0:8811)
    pub listen_addr: String,
    /// Key whose presses toggle automated resume (default: "85")
    pub suspend_key: String,
    pub suspend_policy: SuspendPolicy,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            listen_addr: "0.0.0.0:8811".to_string(),
            suspend_key: autoplay_protocol::KEYCODE_MEDIA_PLAY_PAUSE.to_string(),
            suspend_policy: SuspendPolicy::default(),
        }
    }
}

impl ApiConfig {
    pub fn socket_addr(&self) -> Option<SocketAddr> {
        self.listen_addr.parse().ok()
    }

    pub fn override_policy(&self) -> OverridePolicy {
        OverridePolicy::new(self.suspend_policy, self.suspend_key.clone())
    }
}

/// Log output settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub output: LogOutput,
    /// Filter directive; AUTOPLAY_LOG takes precedence
    pub filter: Option<String>,
    /// Include file and line in log lines
    pub file_line: bool,
}

impl LoggingConfig {
    /// Build the subscriber configuration
    pub fn to_log_config(&self, verbose: bool) -> LogConfig {
        let mut config = LogConfig::daemon().with_output(self.output);
        if std::env::var(autoplay_utils::LOG_ENV_VAR).is_err() {
            if let Some(filter) = &self.filter {
                config.filter = filter.clone();
            }
        }
        config.file_line = self.file_line;
        config.verbose(verbose)
    }
}
