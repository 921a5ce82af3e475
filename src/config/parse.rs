//! Finding, reading and parsing `ontask.yml`

use crate::config::types::Config;
use crate::error::{ConfigError, ConfigResult, OntaskError};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// File names recognised as a taskfile, in order of preference
const CONFIG_FILE_NAMES: &[&str] = &["ontask.yml", "ontask.yaml"];

/// Locate the taskfile for the current directory
pub fn find_config_file() -> ConfigResult<PathBuf> {
    let cwd = env::current_dir()
        .map_err(|e| ConfigError::Invalid(format!("Cannot read current directory: {}", e)))?;
    find_config_file_from(&cwd)
}

/// Look in `start_dir`, then each of its ancestors, for a taskfile
pub fn find_config_file_from(start_dir: &Path) -> ConfigResult<PathBuf> {
    let mut searched = Vec::new();

    for candidate in start_dir
        .ancestors()
        .flat_map(|dir| CONFIG_FILE_NAMES.iter().map(move |name| dir.join(name)))
    {
        if candidate.is_file() {
            return Ok(candidate);
        }
        searched.push(candidate.display().to_string());
    }

    Err(ConfigError::NotFound(searched.join(", ")))
}

/// Read and deserialize the taskfile at `path`
pub fn parse_config_file(path: &Path) -> Result<Config, OntaskError> {
    let contents = fs::read_to_string(path)
        .map_err(|e| ConfigError::Invalid(format!("Cannot read {}: {}", path.display(), e)))?;
    parse_config(&contents)
}

/// Deserialize a taskfile held in memory
pub fn parse_config(yaml: &str) -> Result<Config, OntaskError> {
    Ok(serde_yaml::from_str(yaml)?)
}

/// Discover the taskfile and parse it, returning where it was found
pub fn discover_config() -> Result<(Config, PathBuf), OntaskError> {
    let path = find_config_file()?;
    let config = parse_config_file(&path)?;
    Ok((config, path))
}

/// Load `.env` from the taskfile's directory into the process environment.
///
/// Returns whether a file was found. Variables already set are left alone.
pub fn load_env_file(dir: &Path) -> ConfigResult<bool> {
    let path = dir.join(".env");
    if !path.is_file() {
        return Ok(false);
    }

    dotenvy::from_path(&path).map_err(|e| ConfigError::EnvFile {
        path: path.clone(),
        error: e.to_string(),
    })?;

    Ok(true)
}
