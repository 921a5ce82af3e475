//! Task registry
//!
//! Maps task identifiers to either a body or an alias. Registering an
//! identifier again replaces whatever was there before.

use crate::error::Result;
use crate::runner::{Engine, Params};
use serde_yaml::Value;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// A task body: receives the engine, to run subtasks, and its parameters
pub type Body = Rc<dyn Fn(&mut Engine, &Params) -> Result<Value>>;

/// What an identifier is registered as
#[derive(Clone)]
pub enum Entry {
    /// Redirect to another identifier
    Alias(String),

    /// Work to perform
    Body(Body),
}

impl Entry {
    /// Wrap a closure as a body entry
    pub fn body<F>(f: F) -> Self
    where
        F: Fn(&mut Engine, &Params) -> Result<Value> + 'static,
    {
        Entry::Body(Rc::new(f))
    }

    pub fn alias(target: impl Into<String>) -> Self {
        Entry::Alias(target.into())
    }

    pub fn is_alias(&self) -> bool {
        matches!(self, Entry::Alias(_))
    }
}

impl fmt::Debug for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entry::Alias(target) => f.debug_tuple("Alias").field(target).finish(),
            Entry::Body(_) => f.write_str("Body(..)"),
        }
    }
}

/// Identifier to entry mapping
#[derive(Debug, Default, Clone)]
pub struct Registry {
    entries: HashMap<String, Entry>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the entry for `id`
    pub fn define(&mut self, id: impl Into<String>, entry: Entry) {
        self.entries.insert(id.into(), entry);
    }

    /// Register `id` as an alias of each target in turn.
    ///
    /// Every call overwrites the previous one, so only the last target
    /// remains bound. This is a one-to-one mapping, not a fan-out.
    pub fn define_alias<I, S>(&mut self, id: &str, targets: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for target in targets {
            self.define(id, Entry::Alias(target.into()));
        }
    }

    pub fn lookup(&self, id: &str) -> Option<&Entry> {
        self.entries.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    /// Registered identifiers, sorted
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
