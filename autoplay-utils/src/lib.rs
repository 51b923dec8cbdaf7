//! autoplay-utils: Common utilities shared across firetv-autoplay crates
//!
//! This crate provides:
//! - Unified error types ([`AutoplayError`], [`Result`])
//! - Logging infrastructure ([`init_logging_with_config`], [`LogConfig`])
//! - Consecutive-duplicate log suppression ([`DedupLog`])
//! - XDG-compliant path utilities ([`paths`] module)

pub mod dedup;
pub mod error;
pub mod logging;
pub mod paths;

// Re-export main types at crate root for convenience
pub use dedup::DedupLog;
pub use error::{AutoplayError, Result};
pub use logging::{init_logging_with_config, LogConfig, LogOutput, LOG_ENV_VAR};

// Re-export commonly used path functions
pub use paths::{config_dir, config_file, log_dir, state_dir};
