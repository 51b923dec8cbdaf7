//! Observability for the autoplay daemon
//!
//! Logging is set up by `autoplay_utils::logging`; this module holds the
//! process counters.

pub mod metrics;

pub use metrics::{GaugeSnapshot, Metrics};
