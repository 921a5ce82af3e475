//! Common test utilities
#![allow(dead_code)]

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tempfile::TempDir;

/// Create a temporary directory with an ontask.yml file
pub fn create_test_config(content: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("ontask.yml");
    fs::write(&config_path, content).unwrap();
    (temp_dir, config_path)
}

/// Fixed reference time, offset by `secs`
pub fn at(secs: u64) -> SystemTime {
    SystemTime::UNIX_EPOCH + Duration::from_secs(1_600_000_000 + secs)
}

/// Create `path` (and its parents) with the given modification time
pub fn touch(path: &Path, time: SystemTime) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    let file = File::options()
        .create(true)
        .write(true)
        .open(path)
        .unwrap();
    file.set_modified(time).unwrap();
}
