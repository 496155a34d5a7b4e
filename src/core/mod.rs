// Public modules
pub mod build;
pub mod config;
pub mod error;
pub mod git;
pub mod manifest;
pub mod package;
pub mod registry;
pub mod release;

// Public modules for CLI access
pub mod defaults;

// Re-export common types for convenience
pub use error::{Error, ErrorCode, Result};
