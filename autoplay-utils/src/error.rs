//! Error types for firetv-autoplay
//!
//! Provides a unified error type used across all autoplay crates.

use std::path::PathBuf;

/// Main error type for autoplay operations
#[derive(Debug, thiserror::Error)]
pub enum AutoplayError {
    // === IO Errors ===

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write file {path}: {source}")]
    FileWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    // === Discovery Errors ===

    #[error("No devices found.")]
    NoDevices,

    #[error("Device selection failed: {0}")]
    DeviceSelection(String),

    #[error("Failed to connect to {addr}: {message}")]
    ConnectFailed { addr: String, message: String },

    // === Transport Errors ===

    #[error("Transport error running '{command}': {message}")]
    Transport { command: String, message: String },

    #[error("Command '{command}' exited with {status}: {stderr}")]
    CommandFailed {
        command: String,
        status: String,
        stderr: String,
    },

    // === Configuration Errors ===

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration at {path}: {message}")]
    ConfigInvalid { path: PathBuf, message: String },

    // === Control Endpoint Errors ===

    #[error("HTTP error: {0}")]
    Http(String),

    // === Internal Errors ===

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AutoplayError {
    /// Create a transport error for a specific shell command
    pub fn transport(command: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Transport {
            command: command.into(),
            message: msg.into(),
        }
    }

    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an HTTP error
    pub fn http(msg: impl Into<String>) -> Self {
        Self::Http(msg.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Check if this error is retryable
    ///
    /// Informational only: the poll loop never retries on its own, but an
    /// outer supervisor can use this to decide whether a restart is worth it.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Transport { .. } | Self::CommandFailed { .. } | Self::ConnectFailed { .. }
        )
    }
}

/// Result type alias using AutoplayError
pub type Result<T> = std::result::Result<T, AutoplayError>;
