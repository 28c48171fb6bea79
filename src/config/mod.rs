//! Configuration Management
//!
//! Unified configuration system with hierarchical resolution:
//! 1. Built-in defaults
//! 2. Global config (~/.config/promptspec/config.toml)
//! 3. Project config (.promptspec/config.toml)
//! 4. Environment variables (PROMPTSPEC_*, highest priority)
//!
//! `--config <FILE>` on the command line replaces the whole chain with
//! defaults plus that one file.

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::*;
