//! Configuration Types
//!
//! All configuration structures with sensible defaults.
//! Supports global (~/.config/promptspec/) and project (.promptspec/) level configuration.

use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::time::Duration;

use crate::analysis::scoring::ScoringSettings;
use crate::constants::{cache, input};
use crate::types::{PromptSpecError, Result};

/// Root configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Configuration version
    pub version: String,

    /// Prompt length bounds
    pub limits: InputLimits,

    /// Scoring weights and per-domain overrides
    pub scoring: ScoringSettings,

    /// Result cache settings
    pub cache: CacheSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            limits: InputLimits::default(),
            scoring: ScoringSettings::default(),
            cache: CacheSettings::default(),
        }
    }
}

impl Config {
    /// Validate configuration values are within acceptable ranges.
    /// Returns `PromptSpecError::Config` on validation failure.
    pub fn validate(&self) -> Result<()> {
        if self.limits.min_prompt_length > self.limits.max_prompt_length {
            return Err(PromptSpecError::Config(format!(
                "limits.min_prompt_length ({}) exceeds max_prompt_length ({})",
                self.limits.min_prompt_length, self.limits.max_prompt_length
            )));
        }

        if self.cache.capacity == 0 {
            return Err(PromptSpecError::Config(
                "cache.capacity must be greater than 0".to_string(),
            ));
        }

        if self.cache.ttl_secs == 0 {
            return Err(PromptSpecError::Config(
                "cache.ttl_secs must be greater than 0".to_string(),
            ));
        }

        if self.cache.cleanup_interval_secs == 0 {
            return Err(PromptSpecError::Config(
                "cache.cleanup_interval_secs must be greater than 0".to_string(),
            ));
        }

        self.scoring.validate()
    }
}

// =============================================================================
// Input Limits
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputLimits {
    /// Minimum prompt length in characters, after trimming
    pub min_prompt_length: usize,
    pub max_prompt_length: usize,
}

impl Default for InputLimits {
    fn default() -> Self {
        Self {
            min_prompt_length: input::MIN_PROMPT_LENGTH,
            max_prompt_length: input::MAX_PROMPT_LENGTH,
        }
    }
}

// =============================================================================
// Cache Configuration
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    /// Memoize analysis results
    pub enabled: bool,

    /// Maximum cached results
    pub capacity: usize,

    /// Result lifetime (seconds)
    pub ttl_secs: u64,

    /// Interval between expiry sweeps (seconds)
    pub cleanup_interval_secs: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            capacity: cache::DEFAULT_CAPACITY,
            ttl_secs: cache::DEFAULT_TTL_SECS,
            cleanup_interval_secs: cache::CLEANUP_INTERVAL_SECS,
        }
    }
}

impl CacheSettings {
    pub fn capacity(&self) -> Result<NonZeroUsize> {
        NonZeroUsize::new(self.capacity).ok_or_else(|| {
            PromptSpecError::Config("cache.capacity must be greater than 0".to_string())
        })
    }

    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }

    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.cleanup_interval_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let mut config = Config::default();
        config.cache.capacity = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("cache.capacity"));
        assert!(config.cache.capacity().is_err());
    }

    #[test]
    fn test_inverted_limits_rejected() {
        let mut config = Config::default();
        config.limits.min_prompt_length = 500;
        config.limits.max_prompt_length = 100;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_bad_scoring_settings_surface() {
        let mut config = Config::default();
        config.scoring.clarity.base_score = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_roundtrip_keeps_overrides() {
        let config = Config::default();
        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&text).unwrap();
        assert_eq!(parsed, config);
    }
}
