use std::{fs, path::PathBuf};

use hearth_config::{Config, ConfigError, ConfigManager, ValidationSettings};
use hearth_domain::CurrencyCode;
use tempfile::tempdir;

#[test]
fn default_config_has_non_empty_fields() {
    let cfg = Config::default();

    assert_eq!(cfg.currency, CurrencyCode::new("RUB"));
    assert!(!cfg.locale.is_empty());
    let thresholds = cfg.validation_thresholds().expect("default thresholds");
    assert_eq!(thresholds.category_share_warning, 0.5);
    assert_eq!(thresholds.saturation_margin, 0.05);
}

#[test]
fn config_manager_persists_and_loads_config() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::with_base_dir(dir.path().join("hearth")).expect("manager");

    let mut cfg = Config::default();
    cfg.currency = CurrencyCode::new("gel");
    cfg.locale = "ka-GE".to_string();
    cfg.default_snapshot = Some(PathBuf::from("/tmp/family.json"));

    manager.save(&cfg).expect("save config");
    assert!(manager.config_path().exists());
    assert!(!manager.config_path().with_extension("json.tmp").exists());

    let loaded = manager.load().expect("load config");
    assert_eq!(loaded, cfg);
    assert_eq!(loaded.currency.as_str(), "GEL");
    assert_eq!(loaded.resolve_default_snapshot(), PathBuf::from("/tmp/family.json"));
}

#[test]
fn missing_file_loads_defaults() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::new(dir.path().join("absent.json"));
    assert_eq!(manager.load().expect("load"), Config::default());
}

#[test]
fn partial_file_fills_in_defaults() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("config.json");
    fs::write(&path, r#"{ "currency": "usd", "thresholds": { "saturation_margin_percent": 10 } }"#)
        .expect("write");

    let loaded = ConfigManager::new(path).load().expect("load");
    assert_eq!(loaded.currency, CurrencyCode::new("USD"));
    assert_eq!(loaded.locale, Config::default_locale());
    assert_eq!(loaded.thresholds.category_share_warning_percent, 50.0);
    assert_eq!(loaded.validation_thresholds().expect("thresholds").saturation_margin, 0.1);
}

#[test]
fn out_of_range_threshold_is_rejected() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::new(dir.path().join("config.json"));
    let cfg = Config {
        thresholds: ValidationSettings {
            category_share_warning_percent: 140.0,
            saturation_margin_percent: 5.0,
        },
        ..Config::default()
    };

    let err = manager.save(&cfg).expect_err("invalid threshold");
    assert!(matches!(
        err,
        ConfigError::Invalid { field: "category_share_warning_percent", .. }
    ));
    assert!(!manager.config_path().exists());
}

#[test]
fn malformed_json_is_a_serde_error() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("config.json");
    fs::write(&path, "{ not json").expect("write");
    let err = ConfigManager::new(path).load().expect_err("malformed");
    assert!(matches!(err, ConfigError::Serde(_)));
}
