//! hearth-config
//!
//! Persistent user preferences: home currency, locale, validator thresholds
//! and the default snapshot location, plus disk persistence helpers.

pub mod error;
pub mod manager;
pub mod model;

pub use error::ConfigError;
pub use manager::ConfigManager;
pub use model::{Config, ValidationSettings};
