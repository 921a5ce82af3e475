//! Logging side channel
//!
//! Every message is a sequence of string parts joined by a single space. A
//! task badge, when present, is appended as `[badge]` after the message.
//! Implementations must never fail or panic: the engine's behavior does not
//! depend on what a logger does with its input.

use chrono::Local;
use colored::Colorize;
use std::cell::RefCell;

/// Verbosity levels for output
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    Quiet = 0,
    Normal = 1,
    Verbose = 2,
}

impl Default for Verbosity {
    fn default() -> Self {
        Verbosity::Normal
    }
}

/// Message severity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Debug,
    Info,
    Warn,
    Error,
}

/// Receiver for engine and task output
pub trait Logger {
    /// Emit one already-joined message
    fn emit(&self, level: Level, badge: Option<&str>, message: &str);

    /// Informational message with no badge
    fn msg(&self, parts: &[&str]) {
        self.emit(Level::Info, None, &parts.join(" "));
    }

    /// Informational message tagged with a task badge
    fn log(&self, badge: &str, parts: &[&str]) {
        self.emit(Level::Info, Some(badge), &parts.join(" "));
    }

    fn warn(&self, badge: &str, parts: &[&str]) {
        self.emit(Level::Warn, Some(badge), &parts.join(" "));
    }

    fn error(&self, badge: &str, parts: &[&str]) {
        self.emit(Level::Error, Some(badge), &parts.join(" "));
    }

    fn debug(&self, badge: &str, parts: &[&str]) {
        self.emit(Level::Debug, Some(badge), &parts.join(" "));
    }
}

/// Render a message without the timestamp prefix
pub fn format_line(level: Level, badge: Option<&str>, message: &str, color: bool) -> String {
    let label = match (level, color) {
        (Level::Warn, true) => Some("WARNING:".yellow().bold().to_string()),
        (Level::Warn, false) => Some("WARNING:".to_string()),
        (Level::Error, true) => Some("ERROR:".red().bold().to_string()),
        (Level::Error, false) => Some("ERROR:".to_string()),
        _ => None,
    };

    let mut parts = Vec::with_capacity(3);
    if let Some(label) = label {
        parts.push(label);
    }
    if !message.is_empty() {
        parts.push(message.to_string());
    }
    if let Some(badge) = badge {
        let badge = if color {
            badge.cyan().to_string()
        } else {
            badge.to_string()
        };
        parts.push(format!("[{}]", badge));
    }

    parts.join(" ")
}

/// Logger that prints `[HH:MM:SS] message [badge]` lines to the terminal
#[derive(Debug, Default)]
pub struct ConsoleLogger {
    verbosity: Verbosity,
}

impl ConsoleLogger {
    pub fn new(verbosity: Verbosity) -> Self {
        ConsoleLogger { verbosity }
    }

    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    fn timestamp() -> String {
        format!("[{}]", Local::now().format("%H:%M:%S").to_string().bright_black())
    }
}

impl Logger for ConsoleLogger {
    fn emit(&self, level: Level, badge: Option<&str>, message: &str) {
        let line = format_line(level, badge, message, true);
        match level {
            // Problems are reported regardless of quiet mode
            Level::Warn | Level::Error => eprintln!("{} {}", Self::timestamp(), line),
            Level::Info if self.verbosity >= Verbosity::Normal => {
                println!("{} {}", Self::timestamp(), line)
            }
            Level::Debug if self.verbosity >= Verbosity::Verbose => {
                println!("{} {}", Self::timestamp(), line)
            }
            _ => {}
        }
    }
}

/// Logger that drops everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullLogger;

impl Logger for NullLogger {
    fn emit(&self, _level: Level, _badge: Option<&str>, _message: &str) {}
}

/// Logger that keeps uncolored lines in memory
#[derive(Debug, Default)]
pub struct MemoryLogger {
    lines: RefCell<Vec<String>>,
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every line logged so far, in order
    pub fn lines(&self) -> Vec<String> {
        self.lines.borrow().clone()
    }

    /// Lines carrying the given badge
    pub fn lines_for(&self, badge: &str) -> Vec<String> {
        let suffix = format!("[{}]", badge);
        self.lines
            .borrow()
            .iter()
            .filter(|l| l.ends_with(&suffix))
            .cloned()
            .collect()
    }

    pub fn clear(&self) {
        self.lines.borrow_mut().clear();
    }
}

impl Logger for MemoryLogger {
    fn emit(&self, level: Level, badge: Option<&str>, message: &str) {
        self.lines
            .borrow_mut()
            .push(format_line(level, badge, message, false));
    }
}
