use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use hearth_core::ValidationThresholds;
use hearth_domain::CurrencyCode;

use crate::ConfigError;

/// Stores user preferences for report generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Home currency; rows without a currency are booked in it.
    #[serde(default)]
    pub currency: CurrencyCode,
    #[serde(default = "Config::default_locale")]
    pub locale: String,
    #[serde(default)]
    pub thresholds: ValidationSettings,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Snapshot opened when the report command gets no path.
    pub default_snapshot: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            currency: CurrencyCode::default(),
            locale: Self::default_locale(),
            thresholds: ValidationSettings::default(),
            default_snapshot: None,
        }
    }
}

impl Config {
    pub fn default_locale() -> String {
        "ru-RU".into()
    }

    /// Snapshot path from the config, or `hearth/snapshot.json` under the
    /// user's data directory.
    pub fn resolve_default_snapshot(&self) -> PathBuf {
        if let Some(path) = &self.default_snapshot {
            return path.clone();
        }

        let base = dirs::data_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."));

        base.join("hearth").join("snapshot.json")
    }

    pub fn validation_thresholds(&self) -> Result<ValidationThresholds, ConfigError> {
        self.thresholds.to_thresholds()
    }
}

/// Validator thresholds as whole percentages, the way users edit them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValidationSettings {
    #[serde(default = "ValidationSettings::default_category_share")]
    pub category_share_warning_percent: f64,
    #[serde(default = "ValidationSettings::default_saturation_margin")]
    pub saturation_margin_percent: f64,
}

impl Default for ValidationSettings {
    fn default() -> Self {
        Self {
            category_share_warning_percent: Self::default_category_share(),
            saturation_margin_percent: Self::default_saturation_margin(),
        }
    }
}

impl ValidationSettings {
    fn default_category_share() -> f64 {
        50.0
    }

    fn default_saturation_margin() -> f64 {
        5.0
    }

    pub fn to_thresholds(&self) -> Result<ValidationThresholds, ConfigError> {
        Ok(ValidationThresholds {
            category_share_warning: fraction(
                "category_share_warning_percent",
                self.category_share_warning_percent,
            )?,
            saturation_margin: fraction("saturation_margin_percent", self.saturation_margin_percent)?,
        })
    }
}

fn fraction(field: &'static str, percent: f64) -> Result<f64, ConfigError> {
    if !percent.is_finite() || !(0.0..=100.0).contains(&percent) {
        return Err(ConfigError::Invalid {
            field,
            reason: format!("expected a percentage between 0 and 100, got {}", percent),
        });
    }
    Ok(percent / 100.0)
}
