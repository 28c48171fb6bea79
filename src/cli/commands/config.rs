//! Config Command
//!
//! Manage promptspec configuration.
//!
//! Usage:
//!   promptspec config show [-f json|yaml]
//!   promptspec config path
//!   promptspec config init [-g] [--force]

use console::style;
use std::path::Path;

use crate::cli::util::{ReportFormat, serialize};
use crate::config::ConfigLoader;
use crate::types::Result;

/// Show the merged effective configuration
pub fn show(format: ReportFormat, config_path: Option<&Path>) -> Result<()> {
    let config = match config_path {
        Some(path) => ConfigLoader::load_from_file(path)?,
        None => ConfigLoader::load()?,
    };
    let text = match serialize(&config, format)? {
        Some(text) => text,
        None => ConfigLoader::render(&config, false)?,
    };
    println!("{}", text);
    Ok(())
}

/// Show configuration file paths
pub fn path() -> Result<()> {
    let mark = |exists: bool| {
        if exists {
            style("✓").green()
        } else {
            style("✗").dim()
        }
    };

    println!("Configuration paths:");
    println!();
    match ConfigLoader::global_config_path() {
        Some(global) => println!("  Global:  {} {}", mark(global.exists()), global.display()),
        None => println!("  Global:  (not available)"),
    }
    let project = ConfigLoader::project_config_path();
    println!("  Project: {} {}", mark(project.exists()), project.display());
    Ok(())
}

/// Write a default config file
pub fn init(global: bool, force: bool) -> Result<()> {
    let path = if global {
        ConfigLoader::init_global(force)?
    } else {
        ConfigLoader::init_project(force)?
    };
    println!(
        "{} Initialized {} configuration",
        style("✓").green(),
        if global { "global" } else { "project" }
    );
    println!("  Config: {}", path.display());
    Ok(())
}
