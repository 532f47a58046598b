use chrono::NaiveTime;
use spendwise_config::{Config, ConfigError, ConfigManager};
use tempfile::tempdir;

#[test]
fn missing_file_loads_defaults() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).expect("manager");

    let cfg = manager.load().expect("load defaults");

    assert_eq!(cfg, Config::default());
    assert_eq!(cfg.rebalance_at, NaiveTime::from_hms_opt(9, 0, 0).unwrap());
    assert_eq!(cfg.low_allowance_percent, 20);
    assert_eq!(cfg.recent_expense_days, 7);
    assert_eq!(cfg.backup_retention, 5);
    assert_eq!(cfg.backup_interval_minutes, 15);
    assert!(!manager.config_path().exists());
}

#[test]
fn config_manager_persists_and_loads_config() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::new(dir.path().join("config.json"));

    let mut cfg = Config::default();
    cfg.utc_offset_minutes = -300;
    cfg.rebalance_at = NaiveTime::from_hms_opt(7, 30, 0).unwrap();
    cfg.data_dir = Some(dir.path().join("data"));
    cfg.log_filter = Some("spendwise=debug".into());

    manager.save(&cfg).expect("save config");
    let loaded = manager.load().expect("load config");

    assert_eq!(loaded, cfg);
    assert_eq!(loaded.offset().local_minus_utc(), -300 * 60);
    assert_eq!(loaded.resolve_data_dir(), dir.path().join("data"));
    assert!(!dir.path().join("config.json.tmp").exists());
}

#[test]
fn partial_file_fills_in_defaults() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("config.json");
    std::fs::write(&path, r#"{ "utc_offset_minutes": 120 }"#).expect("write");

    let cfg = ConfigManager::new(path).load().expect("load");

    assert_eq!(cfg.utc_offset_minutes, 120);
    assert_eq!(cfg.rebalance_at, Config::default_rebalance_at());
    assert!(cfg.data_dir.is_none());
}

#[test]
fn out_of_range_settings_are_rejected() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::new(dir.path().join("config.json"));

    let mut cfg = Config::default();
    cfg.utc_offset_minutes = 15 * 60;
    assert!(matches!(
        manager.save(&cfg),
        Err(ConfigError::Invalid { field: "utc_offset_minutes", .. })
    ));

    let mut cfg = Config::default();
    cfg.low_allowance_percent = 101;
    assert!(matches!(
        cfg.validate(),
        Err(ConfigError::Invalid { field: "low_allowance_percent", .. })
    ));
}

#[test]
fn malformed_file_is_a_serde_error() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("config.json");
    std::fs::write(&path, "not json").expect("write");

    assert!(matches!(ConfigManager::new(path).load(), Err(ConfigError::Serde(_))));
}

#[test]
fn default_data_dir_ends_with_app_name() {
    let cfg = Config::default();
    assert!(cfg.resolve_data_dir().ends_with("spendwise"));
}
