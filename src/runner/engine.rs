//! Task execution engine
//!
//! Owns the registry and the done set. Tasks run synchronously and depth
//! first, in exactly the order bodies call [`Engine::run`]; every non-forced
//! run of an identifier after the first is a no-op.
//!
//! Alias chains are followed without a cycle guard. An alias that reaches
//! itself recurses until the stack is exhausted, so callers must not register
//! one. Taskfiles are checked for this before loading.

use crate::error::{ExecutionError, Result};
use crate::runner::{Body, DoneSet, Entry, Params, Registry};
use crate::ui::{ConsoleLogger, Logger};
use serde_yaml::Value;
use std::rc::Rc;

pub struct Engine {
    registry: Registry,
    done: DoneSet,
    logger: Rc<dyn Logger>,
}

impl Engine {
    /// Create an engine logging to the console
    pub fn new() -> Self {
        Engine {
            registry: Registry::new(),
            done: DoneSet::new(),
            logger: Rc::new(ConsoleLogger::default()),
        }
    }

    /// Replace the logging side channel
    pub fn with_logger(mut self, logger: Rc<dyn Logger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn logger(&self) -> &dyn Logger {
        self.logger.as_ref()
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Insert or replace the entry for `id`
    pub fn define(&mut self, id: impl Into<String>, entry: Entry) {
        self.registry.define(id, entry);
    }

    /// Register a closure as the body of `id`
    pub fn define_body<F>(&mut self, id: impl Into<String>, f: F)
    where
        F: Fn(&mut Engine, &Params) -> Result<Value> + 'static,
    {
        self.registry.define(id, Entry::body(f));
    }

    /// Alias `id` to each target in turn; the last one wins
    pub fn define_alias<I, S>(&mut self, id: &str, targets: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.registry.define_alias(id, targets);
    }

    pub fn lookup(&self, id: &str) -> Option<&Entry> {
        self.registry.lookup(id)
    }

    /// Run a task.
    ///
    /// Returns `Ok(None)` when the resolved id has already been marked and
    /// `forced` is false. A forced run neither consults nor updates the done
    /// set.
    ///
    /// The id is marked before it is checked for a body, so an undefined id
    /// fails once and is a no-op on every later non-forced run, even if a
    /// body is registered for it in between.
    pub fn run(&mut self, id: &str, params: &Params, forced: bool) -> Result<Option<Value>> {
        let body = match self.registry.lookup(id) {
            Some(Entry::Alias(target)) => {
                let target = target.clone();
                return self.run(&target, params, forced);
            }
            Some(Entry::Body(body)) => Some(Rc::clone(body)),
            None => None,
        };

        if !forced && !self.mark_done(id) {
            return Ok(None);
        }

        match body {
            Some(body) => self.invoke(id, body, params).map(Some),
            None => Err(ExecutionError::UndefinedTask(id.to_string()).into()),
        }
    }

    /// Run a task with default parameters, at most once
    pub fn run_once(&mut self, id: &str) -> Result<Option<Value>> {
        self.run(id, &Params::default(), false)
    }

    /// Run a task regardless of whether it already ran
    pub fn force(&mut self, id: &str, params: &Params) -> Result<Value> {
        self.run(id, params, true)
            .map(|value| value.unwrap_or(Value::Null))
    }

    /// Record `id` as done; false if it already was
    pub fn mark_done(&mut self, id: &str) -> bool {
        self.done.mark(id)
    }

    pub fn is_done(&self, id: &str) -> bool {
        self.done.contains(id)
    }

    /// Forget that `id` ran; false if it had not
    pub fn clear(&mut self, id: &str) -> bool {
        self.done.clear(id)
    }

    /// Completed ids in the order they were marked
    pub fn done_ids(&self) -> Vec<String> {
        self.done.ids().map(str::to_string).collect()
    }

    fn invoke(&mut self, id: &str, body: Body, params: &Params) -> Result<Value> {
        self.logger.log(id, &["Begin"]);
        let value = body(self, params)?;
        self.logger.log(id, &["End"]);
        Ok(value)
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}
