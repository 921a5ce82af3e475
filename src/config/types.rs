//! Serde model of an `ontask.yml` taskfile.
//!
//! Most list-valued keys also accept a single value, so `run: make` and
//! `run: [make]` deserialize to the same thing.

use serde::de::{DeserializeOwned, Deserializer, Error as _};
use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use std::collections::{BTreeMap, HashMap};

/// A whole taskfile
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    /// Project name; `--list` starts with `name: usage`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<String>,

    /// Task identifiers, sorted
    #[serde(default)]
    pub tasks: BTreeMap<String, TaskEntry>,

    /// Interpreter prefix for every command, e.g. `[bash, -c]`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interpreter: Option<Vec<String>>,
}

/// A task is either an alias for another task or a body definition
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum TaskEntry {
    /// Name of the task this one redirects to
    Alias(String),

    /// Work to perform
    Body(Task),
}

/// A task body definition
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Task {
    /// Usage description for `--list`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<String>,

    /// Longer description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Whether this task is hidden from `--list`
    #[serde(default)]
    pub private: bool,

    /// Default parameters, overridden by whatever the caller passes
    #[serde(
        default,
        skip_serializing_if = "HashMap::is_empty",
        deserialize_with = "deserialize_params"
    )]
    pub params: HashMap<String, String>,

    /// Source globs for the staleness check
    #[serde(
        default,
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "one_or_many"
    )]
    pub source: Vec<String>,

    /// Output files for the staleness check
    #[serde(
        default,
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "one_or_many"
    )]
    pub target: Vec<String>,

    /// Globs excluded from the source set
    #[serde(
        default,
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "one_or_many"
    )]
    pub ignore: Vec<String>,

    /// Run items to execute
    #[serde(default, deserialize_with = "one_or_many")]
    pub run: Vec<Run>,

    /// Interpreter override for this task's commands
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interpreter: Option<Vec<String>>,
}

/// One step of a task body
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum Run {
    SimpleCommand(String),

    /// `command:` and/or `task:` keys
    Complex(RunItem),
}

/// A run step; its commands run before its subtasks
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RunItem {
    #[serde(
        default,
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "one_or_many"
    )]
    pub command: Vec<Command>,

    #[serde(
        default,
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "one_or_many"
    )]
    pub task: Vec<SubTask>,
}

/// A shell command, either bare or with options
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum Command {
    Simple(String),
    Complex(CommandDetail),
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CommandDetail {
    /// Text handed to the interpreter
    pub exec: String,

    /// Echoed instead of `exec`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub print: Option<String>,

    /// Whether to skip echoing the command
    #[serde(default)]
    pub quiet: bool,

    /// Working directory for the command, relative to the taskfile
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<String>,
}

/// A nested `Engine::run` call
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum SubTask {
    Simple(String),
    Complex(SubTaskDetail),
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SubTaskDetail {
    pub name: String,

    /// Interpolated against the caller's params first
    #[serde(
        default,
        skip_serializing_if = "HashMap::is_empty",
        deserialize_with = "deserialize_params"
    )]
    pub params: HashMap<String, String>,

    /// Run even if the subtask already ran
    #[serde(default)]
    pub force: bool,
}

/// Parameter values may be any scalar; they are kept as strings
fn deserialize_params<'de, D>(deserializer: D) -> Result<HashMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let map = match Value::deserialize(deserializer)? {
        Value::Null => return Ok(HashMap::new()),
        Value::Mapping(map) => map,
        _ => return Err(D::Error::custom("params must be a mapping")),
    };

    map.into_iter()
        .map(|(key, value)| {
            let key = scalar_to_string(key)
                .ok_or_else(|| D::Error::custom("parameter names must be scalars"))?;
            match scalar_to_string(value) {
                Some(value) => Ok((key, value)),
                None => Err(D::Error::custom(format!(
                    "parameter '{}' must be a scalar",
                    key
                ))),
            }
        })
        .collect()
}

fn scalar_to_string(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Null => Some(String::new()),
        _ => None,
    }
}

/// Accept either one item or a list of them; null is an empty list
fn one_or_many<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(Vec::new()),
        Value::Sequence(items) => items
            .into_iter()
            .map(|item| T::deserialize(item).map_err(D::Error::custom))
            .collect(),
        single => T::deserialize(single)
            .map(|item| vec![item])
            .map_err(D::Error::custom),
    }
}
