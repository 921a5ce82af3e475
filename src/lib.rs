//! ontask - a minimal task orchestration engine for build scripts
//!
//! Register named tasks (closures or aliases), run each at most once per
//! engine, and skip work whose outputs are newer than its inputs.
//!
//! ```no_run
//! use ontask::{needs_rebuild, Engine, GlobOptions, Params, Value};
//!
//! let mut engine = Engine::new();
//! engine.define_body("clean", |_, _| {
//!     std::fs::remove_dir_all("dist").ok();
//!     Ok(Value::Null)
//! });
//! engine.define_body("build", |engine, params| {
//!     if !needs_rebuild(["src/**/*.js"], ["dist/app.js"], &GlobOptions::default())? {
//!         engine.logger().log("build", &["Assets are up to date!"]);
//!         return Ok(Value::Null);
//!     }
//!     engine.run("clean", params, false)?;
//!     Ok(Value::Bool(true))
//! });
//! engine.define_alias("default", ["build"]);
//!
//! engine.run("default", &Params::new(), false)?;
//! # Ok::<(), ontask::OntaskError>(())
//! ```

// Public modules
pub mod cli;
pub mod config;
pub mod error;
pub mod runner;
pub mod ui;

// Re-export commonly used types
pub use error::{OntaskError, Result};
pub use runner::{needs_rebuild, Body, Engine, Entry, GlobOptions, Params, Registry};
pub use serde_yaml::Value;
pub use ui::{ConsoleLogger, Logger, MemoryLogger, NullLogger, Verbosity};

/// Current version of ontask
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
