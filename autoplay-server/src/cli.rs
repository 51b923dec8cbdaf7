//! Command-line arguments

use std::path::PathBuf;

use clap::Parser;

use crate::config::AppConfig;

/// Keeps Fire TV playback going by resuming it whenever it pauses
#[derive(Parser, Debug)]
#[command(name = "firetv-autoplay")]
#[command(version)]
pub struct Cli {
    /// Device IP address (or host:port); prompts when several devices are listed
    pub ip: Option<String>,

    /// Enable the HTTP control endpoint
    #[arg(short = 'a', long)]
    pub api: bool,

    /// Control endpoint listen address
    #[arg(long, value_name = "ADDR", env = "AUTOPLAY_LISTEN")]
    pub listen: Option<String>,

    /// Seconds between poll cycles
    #[arg(long, value_name = "SECS")]
    pub interval: Option<u64>,

    /// Configuration file (default: $XDG_CONFIG_HOME/firetv-autoplay/config.toml)
    #[arg(long, value_name = "PATH", env = "AUTOPLAY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Print the default configuration and exit
    #[arg(long)]
    pub print_default_config: bool,
}

impl Cli {
    /// Overlay command-line flags on the file configuration
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(ip) = &self.ip {
            config.device.address = Some(ip.clone());
        }
        if self.api {
            config.api.enabled = true;
        }
        if let Some(listen) = &self.listen {
            config.api.listen_addr = listen.clone();
        }
        if let Some(interval) = self.interval {
            config.polling.interval_secs = interval;
        }
    }
}
