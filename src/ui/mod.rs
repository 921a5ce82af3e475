//! Console output
//!
//! The logging side channel used by the engine and by task bodies.

pub mod logger;

pub use logger::*;
