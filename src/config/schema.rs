//! Taskfile validation
//!
//! The engine itself never checks alias chains; a cycle there recurses until
//! the stack runs out. Taskfiles are checked here, before any task is
//! registered, so the binary reports the chain instead.

use crate::config::types::{Config, Task, TaskEntry};
use crate::error::{ConfigError, ConfigResult};
use std::collections::HashSet;

/// Validate a complete taskfile
pub fn validate_config(config: &Config) -> ConfigResult<()> {
    for (name, entry) in &config.tasks {
        if name.is_empty() {
            return Err(ConfigError::EmptyTaskId);
        }
        match entry {
            TaskEntry::Alias(target) if target.is_empty() => {
                return Err(ConfigError::EmptyTaskId);
            }
            TaskEntry::Alias(_) => {}
            TaskEntry::Body(task) => validate_task(name, task)?,
        }
    }

    detect_circular_aliases(config)?;

    Ok(())
}

/// Validate a single task body
pub fn validate_task(name: &str, task: &Task) -> ConfigResult<()> {
    if !task.source.is_empty() && task.target.is_empty() {
        return Err(ConfigError::SourceWithoutTarget(name.to_string()));
    }
    if !task.target.is_empty() && task.source.is_empty() {
        return Err(ConfigError::TargetWithoutSource(name.to_string()));
    }

    if let Some(interpreter) = &task.interpreter {
        validate_interpreter(name, interpreter)?;
    }

    Ok(())
}

fn validate_interpreter(name: &str, interpreter: &[String]) -> ConfigResult<()> {
    if interpreter.is_empty() {
        return Err(ConfigError::Invalid(format!(
            "Task '{}' has an empty interpreter",
            name
        )));
    }
    Ok(())
}

/// Follow every alias chain and fail on the first one that loops
fn detect_circular_aliases(config: &Config) -> ConfigResult<()> {
    let mut cleared: HashSet<&str> = HashSet::new();

    for start in config.tasks.keys() {
        let mut chain: Vec<&str> = Vec::new();
        let mut current = start.as_str();

        while let Some(TaskEntry::Alias(target)) = config.tasks.get(current) {
            if cleared.contains(current) {
                break;
            }
            if chain.contains(&current) {
                chain.push(current);
                return Err(ConfigError::CircularAlias(chain.join(" -> ")));
            }
            chain.push(current);
            current = target.as_str();
        }

        cleared.extend(chain);
    }

    Ok(())
}
