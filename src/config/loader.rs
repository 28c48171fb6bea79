//! Configuration Loader (Figment-based)
//!
//! Loads and merges configuration from multiple sources using Figment:
//! 1. Built-in defaults (Serialized)
//! 2. Global config (~/.config/promptspec/config.toml)
//! 3. Project config (.promptspec/config.toml)
//! 4. Environment variables (PROMPTSPEC_* prefix, `__` between nested keys)

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::types::Config;
use crate::types::{PromptSpecError, Result, ResultExt};

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with full resolution chain using Figment:
    /// defaults → global → project → env vars
    pub fn load() -> Result<Config> {
        let config: Config = Self::figment()
            .extract()
            .map_err(|e| PromptSpecError::Config(format!("Configuration error: {}", e)))?;

        config.validate()?;
        debug!(
            cache_enabled = config.cache.enabled,
            domains = config.scoring.domains.len(),
            "configuration loaded"
        );

        Ok(config)
    }

    /// The merged provider chain, before extraction
    pub fn figment() -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            debug!("Loading global config from: {}", global_path.display());
            figment = figment.merge(Toml::file(&global_path));
        }

        let project_path = Self::project_config_path();
        if project_path.exists() {
            debug!("Loading project config from: {}", project_path.display());
            figment = figment.merge(Toml::file(&project_path));
        }

        // Field names contain underscores, so nesting uses a double underscore:
        // PROMPTSPEC_SCORING__CLARITY__BASE_SCORE -> scoring.clarity.base_score
        figment.merge(Env::prefixed("PROMPTSPEC_").split("__").lowercase(true))
    }

    /// Load configuration from a specific file only
    pub fn load_from_file(path: &Path) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(path))
            .extract()
            .map_err(|e| PromptSpecError::Config(format!("Configuration error: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    // =========================================================================
    // Path Management
    // =========================================================================

    /// Get path to global config directory (~/.config/promptspec/)
    pub fn global_dir() -> Option<PathBuf> {
        env::var("XDG_CONFIG_HOME")
            .ok()
            .map(PathBuf::from)
            .or_else(|| {
                env::var("HOME")
                    .ok()
                    .map(|home| PathBuf::from(home).join(".config"))
            })
            .map(|p| p.join("promptspec"))
    }

    pub fn global_config_path() -> Option<PathBuf> {
        Self::global_dir().map(|dir| dir.join("config.toml"))
    }

    pub fn project_config_path() -> PathBuf {
        Self::project_dir().join("config.toml")
    }

    pub fn project_dir() -> PathBuf {
        PathBuf::from(".promptspec")
    }

    // =========================================================================
    // Config Commands
    // =========================================================================

    /// Render the effective configuration as TOML or JSON
    pub fn render(config: &Config, as_json: bool) -> Result<String> {
        if as_json {
            Ok(serde_json::to_string_pretty(config)?)
        } else {
            toml::to_string_pretty(config).map_err(|e| PromptSpecError::Config(e.to_string()))
        }
    }

    // =========================================================================
    // Initialization
    // =========================================================================

    /// Write the global config file, returning its path
    pub fn init_global(force: bool) -> Result<PathBuf> {
        let global_dir = Self::global_dir().ok_or_else(|| {
            PromptSpecError::Config("Cannot determine global config directory".to_string())
        })?;
        Self::write_default(&global_dir.join("config.toml"), force)
    }

    /// Write the project config file, returning its path
    pub fn init_project(force: bool) -> Result<PathBuf> {
        Self::write_default(&Self::project_config_path(), force)
    }

    fn write_default(path: &Path, force: bool) -> Result<PathBuf> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(format!("Failed to create {}", parent.display()))?;
        }

        if !path.exists() || force {
            fs::write(path, Self::default_config_file()?)
                .with_context(format!("Failed to write {}", path.display()))?;
            info!("Created config: {}", path.display());
        } else {
            info!("Config exists: {}", path.display());
        }

        Ok(path.to_path_buf())
    }

    // =========================================================================
    // Internal
    // =========================================================================

    /// Default config file content: a header plus every default value
    fn default_config_file() -> Result<String> {
        let body = Self::render(&Config::default(), false)?;
        Ok(format!(
            "# promptspec configuration\n\
             # Project settings in .promptspec/config.toml override the global file;\n\
             # PROMPTSPEC_* environment variables override both.\n\n{}",
            body
        ))
    }
}
