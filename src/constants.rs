//! Global Constants
//!
//! Centralized constants for configuration and tuning.
//! All magic numbers should be defined here with documentation.

/// Prompt input bounds
pub mod input {
    /// Minimum prompt length in characters (after trimming)
    pub const MIN_PROMPT_LENGTH: usize = 1;

    /// Maximum prompt length in characters
    pub const MAX_PROMPT_LENGTH: usize = 10_000;
}

/// Drafting constants
pub mod drafting {
    /// Maximum title length in characters
    pub const MAX_TITLE_LENGTH: usize = 80;
}

/// Scoring constants
pub mod scoring {
    /// Decimal places kept on every score
    pub const SCORE_PRECISION: i32 = 2;

    /// Default clarity base score
    pub const CLARITY_BASE: f64 = 0.5;

    /// Default completeness base score
    pub const COMPLETENESS_BASE: f64 = 0.35;
}

/// Improvement constants
pub mod improvement {
    /// Placeholder title proposed for missing or short titles
    pub const PLACEHOLDER_TITLE: &str = "Task Specification";

    /// Domain proposed when the caller supplied none
    pub const DEFAULT_DOMAIN: &str = "general";

    /// Section template proposed for markdown output without sections
    pub const DEFAULT_SECTIONS: [&str; 3] = ["Overview", "Details", "NextSteps"];

    /// Directives appended to shallow instructions
    pub const QUALITY_DIRECTIVES: [&str; 2] = [
        "Include concrete examples to illustrate the expected result.",
        "Define measurable success criteria for the output.",
    ];
}

/// Cache constants
pub mod cache {
    /// Maximum entries in the result cache
    pub const DEFAULT_CAPACITY: usize = 100;

    /// Entry time-to-live (seconds)
    pub const DEFAULT_TTL_SECS: u64 = 3600;

    /// Interval between expiry sweeps (seconds)
    pub const CLEANUP_INTERVAL_SECS: u64 = 300;

    /// Fixed per-entry bookkeeping estimate (bytes)
    pub const ENTRY_OVERHEAD_BYTES: usize = 64;
}

/// Batch processing constants
pub mod batch {
    /// Default number of prompts analyzed concurrently
    pub const DEFAULT_CONCURRENCY: usize = 4;
}
