//! Configuration for the autoplay daemon
//!
//! Read once at startup from TOML; command-line flags override it.

mod defaults;
mod loader;
mod schema;

pub use defaults::DEFAULT_CONFIG_TOML;
pub use loader::ConfigLoader;
pub use schema::*;
