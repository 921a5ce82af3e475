//! Task execution engine
//!
//! This module holds the task registry, the run-once engine, the staleness
//! check, and the pieces that turn taskfile definitions into task bodies.

pub mod command;
pub mod context;
pub mod done;
pub mod engine;
pub mod interpolate;
pub mod params;
pub mod registry;
pub mod stale;
pub mod task;

// Re-export main types
pub use command::*;
pub use context::*;
pub use done::*;
pub use engine::*;
pub use interpolate::*;
pub use params::*;
pub use registry::*;
pub use stale::*;
pub use task::*;
