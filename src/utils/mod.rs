//! Generic utility primitives with zero domain knowledge.
//!
//! - `artifact` - Build artifact path resolution
//! - `command` - Command execution with captured output
//! - `io` - File I/O with consistent error handling
//! - `parser` - Text extraction and manipulation

pub mod artifact;
pub mod command;
pub mod io;
pub mod parser;
