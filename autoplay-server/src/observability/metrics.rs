//! Metrics collection for the autoplay daemon
//!
//! Process-wide counters for the resume loop and the control endpoint,
//! exported in Prometheus text format on `/metrics`.

use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::OnceLock;

use autoplay_protocol::PlaybackState;

/// Point-in-time gauge values collected on each metrics request
#[derive(Debug, Default)]
pub struct GaugeSnapshot {
    /// Whether automated resume is suspended
    pub suspended: bool,
    /// Last state observed by the resume loop
    pub last_observed: PlaybackState,
    /// Process resident set size in bytes (Linux only)
    pub process_memory_bytes: Option<u64>,
    /// Number of open file descriptors (Linux only)
    pub process_open_fds: Option<u64>,
}

impl GaugeSnapshot {
    /// Collect gauge values from /proc on Linux
    #[cfg(target_os = "linux")]
    pub fn collect_process_metrics(&mut self) {
        // Second field of statm is RSS in pages
        if let Ok(content) = std::fs::read_to_string("/proc/self/statm") {
            if let Some(pages) = content
                .split_whitespace()
                .nth(1)
                .and_then(|p| p.parse::<u64>().ok())
            {
                self.process_memory_bytes = Some(pages * 4096);
            }
        }

        if let Ok(entries) = std::fs::read_dir("/proc/self/fd") {
            self.process_open_fds = Some(entries.count() as u64);
        }
    }

    #[cfg(not(target_os = "linux"))]
    pub fn collect_process_metrics(&mut self) {}
}

/// Global metrics collector
pub struct Metrics {
    /// Completed poll cycles
    pub cycles_total: AtomicU64,
    /// Resume actions sent to the device
    pub resume_actions_total: AtomicU64,
    /// Cycles that found the loop suspended
    pub suspended_cycles_total: AtomicU64,
    /// Transport failures seen by the loop or the endpoint
    pub transport_errors_total: AtomicU64,

    /// Observations by playback state
    pub observations_by_state: DashMap<&'static str, AtomicU64>,
    /// Manual key presses by key
    pub key_presses_by_key: DashMap<String, AtomicU64>,
}

impl Metrics {
    pub(crate) fn new() -> Self {
        Self {
            cycles_total: AtomicU64::new(0),
            resume_actions_total: AtomicU64::new(0),
            suspended_cycles_total: AtomicU64::new(0),
            transport_errors_total: AtomicU64::new(0),
            observations_by_state: DashMap::new(),
            key_presses_by_key: DashMap::new(),
        }
    }

    /// Get the global metrics instance
    pub fn global() -> &'static Self {
        static INSTANCE: OnceLock<Metrics> = OnceLock::new();
        INSTANCE.get_or_init(Self::new)
    }

    pub fn record_cycle(&self) {
        self.cycles_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_resume_action(&self) {
        self.resume_actions_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_suspended_cycle(&self) {
        self.suspended_cycles_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_transport_error(&self) {
        self.transport_errors_total.fetch_add(1, Ordering::Relaxed);
    }

    /// Record one classification result
    pub fn record_observation(&self, state: PlaybackState) {
        self.observations_by_state
            .entry(state.as_str())
            .or_insert_with(|| AtomicU64::new(0))
            .fetch_add(1, Ordering::Relaxed);
    }

    /// Record a key forwarded by the control endpoint
    pub fn record_key_press(&self, key: &str) {
        self.key_presses_by_key
            .entry(key.to_string())
            .or_insert_with(|| AtomicU64::new(0))
            .fetch_add(1, Ordering::Relaxed);
    }

    /// Export metrics in Prometheus text format
    pub fn to_prometheus(&self, gauges: &GaugeSnapshot) -> String {
        use std::fmt::Write;

        let mut output = String::with_capacity(2048);

        macro_rules! counter {
            ($name:expr, $help:expr, $value:expr) => {
                let _ = writeln!(output, "# HELP {} {}", $name, $help);
                let _ = writeln!(output, "# TYPE {} counter", $name);
                let _ = writeln!(output, "{} {}", $name, $value.load(Ordering::Relaxed));
            };
        }

        macro_rules! gauge {
            ($name:expr, $help:expr, $value:expr) => {
                let _ = writeln!(output, "# HELP {} {}", $name, $help);
                let _ = writeln!(output, "# TYPE {} gauge", $name);
                let _ = writeln!(output, "{} {}", $name, $value);
            };
        }

        // === Counters ===

        counter!(
            "autoplay_cycles_total",
            "Total poll cycles completed",
            self.cycles_total
        );
        counter!(
            "autoplay_resume_actions_total",
            "Total resume actions sent to the device",
            self.resume_actions_total
        );
        counter!(
            "autoplay_suspended_cycles_total",
            "Total poll cycles skipped while suspended",
            self.suspended_cycles_total
        );
        counter!(
            "autoplay_transport_errors_total",
            "Total transport failures",
            self.transport_errors_total
        );

        if !self.observations_by_state.is_empty() {
            let _ = writeln!(
                output,
                "# HELP autoplay_observations_total Observations by playback state"
            );
            let _ = writeln!(output, "# TYPE autoplay_observations_total counter");
            for entry in self.observations_by_state.iter() {
                let _ = writeln!(
                    output,
                    "autoplay_observations_total{{state=\"{}\"}} {}",
                    entry.key(),
                    entry.value().load(Ordering::Relaxed)
                );
            }
        }

        if !self.key_presses_by_key.is_empty() {
            let _ = writeln!(
                output,
                "# HELP autoplay_key_presses_total Keys forwarded by the control endpoint"
            );
            let _ = writeln!(output, "# TYPE autoplay_key_presses_total counter");
            for entry in self.key_presses_by_key.iter() {
                let _ = writeln!(
                    output,
                    "autoplay_key_presses_total{{key=\"{}\"}} {}",
                    entry.key(),
                    entry.value().load(Ordering::Relaxed)
                );
            }
        }

        // === Gauges ===

        gauge!(
            "autoplay_suspended",
            "Whether automated resume is suspended",
            u8::from(gauges.suspended)
        );
        let _ = writeln!(
            output,
            "# HELP autoplay_last_observed_state Last playback state observed"
        );
        let _ = writeln!(output, "# TYPE autoplay_last_observed_state gauge");
        for state in [
            PlaybackState::Unknown,
            PlaybackState::Paused,
            PlaybackState::Playing,
        ] {
            let _ = writeln!(
                output,
                "autoplay_last_observed_state{{state=\"{}\"}} {}",
                state.as_str(),
                u8::from(gauges.last_observed == state)
            );
        }

        if let Some(memory) = gauges.process_memory_bytes {
            gauge!(
                "autoplay_process_memory_bytes",
                "Process resident set size in bytes",
                memory
            );
        }
        if let Some(fds) = gauges.process_open_fds {
            gauge!(
                "autoplay_process_open_fds",
                "Number of open file descriptors",
                fds
            );
        }

        output
    }
}
