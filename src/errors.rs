use hearth_config::ConfigError;
use hearth_core::CoreError;
use hearth_domain::PeriodError;
use thiserror::Error;

/// Failures surfaced by the storage, engine and report layers.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error("Invalid period: {0}")]
    Period(#[from] PeriodError),
    #[error("Invalid argument: {0}")]
    Usage(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;
