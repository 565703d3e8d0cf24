use supplier_config::{Config, ConfigManager, LatencySettings};
use tempfile::tempdir;

#[test]
fn default_config_matches_desk_defaults() {
    let cfg = Config::default();

    assert_eq!(cfg.default_page_size, 10);
    assert!(!cfg.strict_corporate_id);
    assert_eq!(cfg.saved_banner_ms, 3000);
    assert_eq!(cfg.latency.submit_ms, 2000);
}

#[test]
fn missing_file_loads_defaults() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::new(dir.path().join("config.json"));

    assert_eq!(manager.load().expect("load config"), Config::default());
}

#[test]
fn config_manager_persists_and_loads_config() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).expect("manager");

    let mut cfg = Config::default();
    cfg.strict_corporate_id = true;
    cfg.default_page_size = 50;
    cfg.latency = LatencySettings::instant();

    manager.save(&cfg).expect("save config");
    assert!(manager.config_path().exists());
    assert!(!manager.config_path().with_extension("json.tmp").exists());

    let loaded = manager.load().expect("load config");
    assert_eq!(loaded, cfg);
}

#[test]
fn corrupt_file_reports_serde_error() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("config.json");
    std::fs::write(&path, "{ not json").expect("write");

    let err = ConfigManager::new(path).load().unwrap_err();
    assert!(err.to_string().starts_with("Serialization error"));
}
