#![allow(dead_code)]

use std::{
    path::{Path, PathBuf},
    sync::Mutex,
};

use assert_cmd::Command;
use once_cell::sync::Lazy;
use supplier_config::{Config, ConfigManager, LatencySettings, HOME_ENV};
use supplier_desk::cli::SCRIPT_ENV;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Creates an isolated desk home whose config answers every gateway call instantly.
pub fn setup_desk_home() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);

    let config = Config {
        latency: LatencySettings::instant(),
        ..Config::default()
    };
    config_manager(&base)
        .save(&config)
        .expect("write test config");
    base
}

pub fn config_manager(home: &Path) -> ConfigManager {
    ConfigManager::with_base_dir(home.to_path_buf()).expect("open config manager")
}

/// Script-mode invocation of the desk binary rooted at `home`.
pub fn desk(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("supplier_desk").expect("binary is built");
    cmd.env(SCRIPT_ENV, "1").env(HOME_ENV, home);
    cmd
}
