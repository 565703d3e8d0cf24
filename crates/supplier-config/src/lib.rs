//! supplier-config
//!
//! Persistent desk preferences: paging, validation strictness, colors and
//! simulated gateway latency. Owns the Config data structure plus disk
//! persistence helpers.

pub mod error;
pub mod manager;
pub mod model;

pub use error::ConfigError;
pub use manager::{resolve_base_dir, ConfigManager, HOME_ENV};
pub use model::{Config, LatencySettings};
