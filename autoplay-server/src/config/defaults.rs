//! Default configuration values
//!
//! These are embedded in the binary and used when no config file exists.

/// Default configuration as TOML (for reference/documentation)
pub const DEFAULT_CONFIG_TOML: &str = r##"
# firetv-autoplay configuration

[device]
# address = "192.168.1.20"
port = 5555
adb_path = "adb"

[polling]
interval_secs = 1
settle_secs = 5
# or: resume_action = { key_event = "126" }
resume_action = "trackball_press"
# or: "focused-activity"
foreground_strategy = "recents"

[api]
enabled = false
listen_addr = "0.0.0.0:8811"
suspend_key = "85"
# or: "disabled"
suspend_policy = "last-state"

[logging]
output = "stderr"
# filter = "info,autoplay_server=debug"
file_line = false
"##;
