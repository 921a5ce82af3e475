//! Shell command context
//!
//! Everything a taskfile command needs from the task that runs it.

use std::collections::HashMap;
use std::env;
use std::path::PathBuf;

/// Default interpreter for taskfile commands
pub const DEFAULT_INTERPRETER: &[&str] = &["sh", "-c"];

/// Where and how a task's commands run
#[derive(Debug, Clone)]
pub struct Context {
    /// Task the commands belong to, used for log badges and errors
    pub task: String,

    /// Directory commands run in, unless a command sets its own `dir`
    pub working_dir: PathBuf,

    /// Interpreter prefix (e.g., ["bash", "-c"])
    pub interpreter: Vec<String>,

    /// Variables for interpolation, also exported to the child environment
    pub vars: HashMap<String, String>,
}

impl Context {
    pub fn new(task: impl Into<String>) -> Self {
        Context {
            task: task.into(),
            working_dir: env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            interpreter: DEFAULT_INTERPRETER.iter().map(|s| s.to_string()).collect(),
            vars: HashMap::new(),
        }
    }

    pub fn with_working_dir(mut self, dir: PathBuf) -> Self {
        self.working_dir = dir;
        self
    }

    pub fn with_interpreter(mut self, interpreter: Vec<String>) -> Self {
        self.interpreter = interpreter;
        self
    }

    pub fn with_vars(mut self, vars: HashMap<String, String>) -> Self {
        self.vars = vars;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_new() {
        let ctx = Context::new("build");
        assert_eq!(ctx.task, "build");
        assert_eq!(ctx.interpreter, vec!["sh", "-c"]);
        assert!(ctx.vars.is_empty());
    }

    #[test]
    fn test_context_builders() {
        let mut vars = HashMap::new();
        vars.insert("mode".to_string(), "debug".to_string());

        let ctx = Context::new("build")
            .with_working_dir(PathBuf::from("/tmp"))
            .with_interpreter(vec!["bash".to_string(), "-c".to_string()])
            .with_vars(vars);

        assert_eq!(ctx.working_dir, PathBuf::from("/tmp"));
        assert_eq!(ctx.interpreter, vec!["bash", "-c"]);
        assert_eq!(ctx.vars.get("mode"), Some(&"debug".to_string()));
    }
}
