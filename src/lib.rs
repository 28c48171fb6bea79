//! promptspec - Rule-Based Prompt Analysis
//!
//! Turns a free-text prompt into a structured specification, scores it on
//! two independent 0–1 axes (clarity, completeness), reports gaps and
//! proposes patches that close them. Results are memoized in a bounded,
//! expiring LRU cache safe to share across threads.
//!
//! ## Quick Start
//!
//! ```ignore
//! use promptspec::{AnalysisRequest, Analyzer, ConfigLoader};
//!
//! let config = ConfigLoader::load()?;
//! let analyzer = Analyzer::from_config(&config)?;
//! let analysis = analyzer.analyze(&AnalysisRequest::new("create user authentication"))?;
//! println!("{:.2}", analysis.report.gaps.scores.clarity);
//! ```
//!
//! ## Modules
//!
//! - [`analysis`]: pattern library, scoring, drafting, gap detection, patches
//! - [`cache`]: TTL + LRU result cache and its cleanup sweeper
//! - [`config`]: layered configuration (defaults, files, environment)
//! - [`types`]: specification model, issues, patches, errors

pub mod analysis;
pub mod cache;
pub mod cli;
pub mod config;
pub mod constants;
pub mod types;

// =============================================================================
// Core Re-exports
// =============================================================================

// Configuration
pub use config::{CacheSettings, Config, ConfigLoader, InputLimits};

// Error Types
pub use types::error::{InputError, InputErrorCode, PromptSpecError, Result, ResultExt};

// Model
pub use types::{
    Domain, InputKind, InputRef, Intent, Issue, Metrics, OutputFormat, Patch, PatchOp, Severity,
    Specification,
};

// =============================================================================
// Pipeline Re-exports
// =============================================================================

pub use analysis::scoring::{ScoreBreakdown, ScoringConfig, ScoringSettings, clarity, completeness};
pub use analysis::{
    Analysis, AnalysisOptions, AnalysisReport, AnalysisRequest, Analyzer, GapReport, ScoreReport,
    SchemaReport, SpecValidator, StructuralValidator, detect_gaps, draft, improved_prompt,
    propose,
};

// =============================================================================
// Cache Re-exports
// =============================================================================

pub use cache::{CacheStats, ResultCache, SharedCache, cache_key, spawn_cleanup};
