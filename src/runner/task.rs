//! Taskfile tasks
//!
//! Turns taskfile definitions into engine entries. A taskfile body runs its
//! items in order: shell commands, then subtasks, item by item. When the task
//! declares `source` and `target` it first checks staleness and returns early
//! if the targets are up to date.

use crate::config::{self, validate_config, validate_task};
use crate::error::{ConfigResult, Result};
use crate::runner::{
    execute_command, interpolate, needs_rebuild, Body, Context, Engine, Entry, GlobOptions,
    Params, DEFAULT_INTERPRETER,
};
use serde_yaml::Value;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Runtime task representation
///
/// This differs from config::Task by carrying the resolved directory and
/// interpreter its commands run with.
#[derive(Debug, Clone)]
pub struct Task {
    /// Task name
    pub name: String,

    /// Defaults merged under the caller's parameters
    pub params: Params,

    /// Source globs for the staleness check
    pub source: Vec<String>,

    /// Target files for the staleness check
    pub target: Vec<String>,

    /// Globs excluded from the sources
    pub ignore: Vec<String>,

    /// Run items to execute
    pub run: Vec<Run>,

    /// Directory commands run in and paths resolve against
    pub base_dir: PathBuf,

    /// Interpreter prefix for commands
    pub interpreter: Vec<String>,
}

impl Task {
    /// Create a runtime task from its taskfile definition
    pub fn from_config(
        name: String,
        config: config::Task,
        base_dir: &Path,
        interpreter: Option<&[String]>,
    ) -> ConfigResult<Self> {
        validate_task(&name, &config)?;

        let interpreter = config
            .interpreter
            .or_else(|| interpreter.map(<[String]>::to_vec))
            .unwrap_or_else(|| DEFAULT_INTERPRETER.iter().map(|s| s.to_string()).collect());

        Ok(Task {
            name,
            params: Params::from(config.params),
            source: config.source,
            target: config.target,
            ignore: config.ignore,
            run: config.run.into_iter().map(Run::from_config).collect(),
            base_dir: base_dir.to_path_buf(),
            interpreter,
        })
    }

    /// Whether this task guards its work with a staleness check
    pub fn has_staleness_check(&self) -> bool {
        !self.source.is_empty() && !self.target.is_empty()
    }

    /// Check sources against targets; true when the task has no check
    pub fn is_stale(&self) -> Result<bool> {
        if !self.has_staleness_check() {
            return Ok(true);
        }
        let options = GlobOptions::default()
            .with_cwd(&self.base_dir)
            .with_ignore(self.ignore.iter().cloned());
        needs_rebuild(&self.source, &self.target, &options)
    }

    /// Execute the task.
    ///
    /// Returns `true` when the run items executed and `false` when the
    /// staleness check skipped them.
    pub fn execute(&self, engine: &mut Engine, params: &Params) -> Result<Value> {
        if !self.is_stale()? {
            engine.logger().log(&self.name, &["Up to date"]);
            return Ok(Value::Bool(false));
        }

        let params = self.params.merged(params);
        let ctx = Context::new(self.name.clone())
            .with_working_dir(self.base_dir.clone())
            .with_interpreter(self.interpreter.clone())
            .with_vars(params.as_map().clone());

        for run in &self.run {
            for cmd in &run.commands {
                execute_command(cmd, &ctx, engine.logger())?;
            }
            for subtask in &run.subtasks {
                let sub_params = subtask.resolve_params(&ctx)?;
                engine.run(&subtask.name, &sub_params, subtask.force)?;
            }
        }

        Ok(Value::Bool(true))
    }

    /// Wrap the task as an engine body
    pub fn into_body(self) -> Body {
        let task = Rc::new(self);
        Rc::new(move |engine: &mut Engine, params: &Params| task.execute(engine, params))
    }
}

/// Register every task of a taskfile with the engine.
///
/// The taskfile is validated first, so nothing is registered when it has an
/// alias cycle or a malformed task.
pub fn register_config(
    engine: &mut Engine,
    config: &config::Config,
    base_dir: &Path,
) -> ConfigResult<()> {
    validate_config(config)?;

    for (name, entry) in &config.tasks {
        match entry {
            config::TaskEntry::Alias(target) => engine.define(name.clone(), Entry::alias(target)),
            config::TaskEntry::Body(task) => {
                let task = Task::from_config(
                    name.clone(),
                    task.clone(),
                    base_dir,
                    config.interpreter.as_deref(),
                )?;
                engine.define(name.clone(), Entry::Body(task.into_body()));
            }
        }
    }

    Ok(())
}

/// Runtime representation of a run item
#[derive(Debug, Clone)]
pub struct Run {
    /// Commands to execute
    pub commands: Vec<Command>,

    /// Subtasks to execute after the commands
    pub subtasks: Vec<SubTask>,
}

impl Run {
    /// Create from config
    pub fn from_config(config: config::Run) -> Self {
        match config {
            config::Run::SimpleCommand(cmd) => Run {
                commands: vec![Command::Simple(cmd)],
                subtasks: Vec::new(),
            },
            config::Run::Complex(item) => Run {
                commands: item
                    .command
                    .into_iter()
                    .map(Command::from_config)
                    .collect(),
                subtasks: item.task.into_iter().map(SubTask::from_config).collect(),
            },
        }
    }
}

/// Runtime representation of a command
#[derive(Debug, Clone)]
pub enum Command {
    /// Simple command string
    Simple(String),

    /// Complex command with options
    Complex {
        exec: String,
        print: String,
        quiet: bool,
        dir: Option<String>,
    },
}

impl Command {
    /// Create from config
    pub fn from_config(config: config::Command) -> Self {
        match config {
            config::Command::Simple(cmd) => Command::Simple(cmd),
            config::Command::Complex(detail) => Command::Complex {
                print: detail.print.clone().unwrap_or_else(|| detail.exec.clone()),
                exec: detail.exec,
                quiet: detail.quiet,
                dir: detail.dir,
            },
        }
    }

    /// Get the command to execute
    pub fn exec(&self) -> &str {
        match self {
            Command::Simple(cmd) => cmd,
            Command::Complex { exec, .. } => exec,
        }
    }

    /// Get what to print
    pub fn print(&self) -> &str {
        match self {
            Command::Simple(cmd) => cmd,
            Command::Complex { print, .. } => print,
        }
    }

    /// Check if this command is quiet
    pub fn is_quiet(&self) -> bool {
        match self {
            Command::Simple(_) => false,
            Command::Complex { quiet, .. } => *quiet,
        }
    }

    /// Get the working directory
    pub fn dir(&self) -> Option<&str> {
        match self {
            Command::Simple(_) => None,
            Command::Complex { dir, .. } => dir.as_deref(),
        }
    }
}

/// Runtime representation of a subtask reference
#[derive(Debug, Clone)]
pub struct SubTask {
    pub name: String,
    pub params: Params,
    pub force: bool,
}

impl SubTask {
    pub fn from_config(config: config::SubTask) -> Self {
        match config {
            config::SubTask::Simple(name) => SubTask {
                name,
                params: Params::new(),
                force: false,
            },
            config::SubTask::Complex(detail) => SubTask {
                name: detail.name,
                params: Params::from(detail.params),
                force: detail.force,
            },
        }
    }

    /// Interpolate parameter values with the calling task's variables
    fn resolve_params(&self, ctx: &Context) -> Result<Params> {
        let mut params = Params::new();
        for (key, value) in self.params.iter() {
            params.insert(key.clone(), interpolate(value, &ctx.vars)?);
        }
        Ok(params)
    }
}
