//! Infrastructure: configuration loading and logging setup.

pub mod config;
pub mod logging;

pub use config::{ConfigError, ConfigLoader, EngineConfig};
pub use logging::{init_logging, LogConfig, LogFormat};
