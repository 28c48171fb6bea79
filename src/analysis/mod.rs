//! Analysis Pipeline
//!
//! Prompt in, report out:
//!
//! ```text
//! validate input → cache lookup → draft → detect gaps → propose patches
//!                → structural validation (optional) → cache store
//! ```
//!
//! Every step after input validation is pure and runs inside a guard: a
//! panicking step is logged and replaced by its baseline result, so one bad
//! input degrades to conservative scores instead of failing the request.

pub mod drafter;
pub mod gaps;
pub mod improve;
pub mod input;
pub mod patterns;
pub mod schema;
pub mod scoring;

pub use drafter::draft;
pub use gaps::{GapDetector, GapReport, detect_gaps};
pub use improve::{improved_prompt, propose};
pub use schema::{SchemaReport, SchemaViolation, SpecValidator, StructuralValidator};

use serde::{Deserialize, Serialize};
use std::any::Any;
use std::cell::Cell;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use tracing::{debug, error};

use crate::cache::{ResultCache, SharedCache, Weigh, cache_key};
use crate::config::{Config, InputLimits};
use crate::types::{
    Domain, Metrics, OutputFormat, Patch, PromptSpecError, Result, SpecContext, SpecIo,
    Specification,
};
use patterns::PATTERN_LIBRARY_VERSION;
use scoring::{ScoreBreakdown, ScoringConfig, ScoringSettings};

// =============================================================================
// Request / Report
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisOptions {
    pub include_validation: bool,
    pub include_improvements: bool,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            include_validation: true,
            include_improvements: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub prompt: String,
    /// Raw domain name; validated by the analyzer
    pub domain: Option<String>,
    #[serde(default)]
    pub options: AnalysisOptions,
}

impl AnalysisRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            domain: None,
            options: AnalysisOptions::default(),
        }
    }

    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    pub fn with_options(mut self, options: AnalysisOptions) -> Self {
        self.options = options;
        self
    }
}

/// Everything the pipeline derived from one prompt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    /// Pattern library version the scores were computed with
    pub pattern_version: String,
    pub spec: Specification,
    pub gaps: GapReport,
    pub patches: Vec<Patch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<SchemaReport>,
}

impl Weigh for AnalysisReport {
    fn weight(&self) -> usize {
        serde_json::to_vec(self).map(|v| v.len()).unwrap_or(0)
    }
}

#[derive(Debug, Clone)]
pub struct Analysis {
    pub report: Arc<AnalysisReport>,
    pub cache_hit: bool,
}

/// Both score tables for one prompt
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreReport {
    pub pattern_version: &'static str,
    pub domain: Option<Domain>,
    pub clarity: ScoreBreakdown,
    pub completeness: ScoreBreakdown,
}

// =============================================================================
// Analyzer
// =============================================================================

pub type ReportCache = SharedCache<Arc<AnalysisReport>>;

pub struct Analyzer {
    settings: ScoringSettings,
    limits: InputLimits,
    cache: Option<ReportCache>,
    validator: Box<dyn SpecValidator>,
}

impl Analyzer {
    /// Analyzer without a cache, using the structural validator
    pub fn new(settings: ScoringSettings, limits: InputLimits) -> Self {
        Self {
            settings,
            limits,
            cache: None,
            validator: Box::new(StructuralValidator),
        }
    }

    /// Analyzer wired from loaded configuration, with a cache when enabled
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;
        let analyzer = Self::new(config.scoring.clone(), config.limits);
        if !config.cache.enabled {
            return Ok(analyzer);
        }
        let cache = ResultCache::new(config.cache.capacity()?, config.cache.ttl());
        Ok(analyzer.with_cache(Arc::new(cache)))
    }

    pub fn with_cache(mut self, cache: ReportCache) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn with_validator(mut self, validator: Box<dyn SpecValidator>) -> Self {
        self.validator = validator;
        self
    }

    pub fn cache(&self) -> Option<&ReportCache> {
        self.cache.as_ref()
    }

    /// Run the full pipeline, answering from the cache when possible
    pub fn analyze(&self, request: &AnalysisRequest) -> Result<Analysis> {
        input::validate_prompt(&request.prompt, &self.limits)?;
        let domain = input::parse_domain(request.domain.as_deref())?;
        let key = cache_key(&request.prompt, domain, &request.options);

        if let Some(cache) = &self.cache
            && let Some(report) = cache.get(&key)
        {
            debug!(key = %key, "analysis served from cache");
            return Ok(Analysis {
                report,
                cache_hit: true,
            });
        }

        let report = Arc::new(self.run_pipeline(&request.prompt, domain, request.options));

        if let Some(cache) = &self.cache {
            cache.set(key, report.clone(), None);
        }

        Ok(Analysis {
            report,
            cache_hit: false,
        })
    }

    /// Per-signal score tables for a prompt, uncached
    pub fn score(&self, prompt: &str, domain: Option<&str>) -> Result<ScoreReport> {
        input::validate_prompt(prompt, &self.limits)?;
        let domain = input::parse_domain(domain)?;
        let config = self.settings.resolve(domain);

        let spec = draft(prompt, domain, &config);
        let normalized = drafter::split_lines(prompt).join(" ");
        let mut unscored = spec;
        unscored.metrics = None;

        Ok(ScoreReport {
            pattern_version: PATTERN_LIBRARY_VERSION,
            domain,
            clarity: scoring::clarity_breakdown(&normalized, domain, &config.clarity),
            completeness: scoring::completeness_breakdown(
                &normalized,
                &unscored,
                &config.completeness,
            ),
        })
    }

    fn run_pipeline(
        &self,
        prompt: &str,
        domain: Option<Domain>,
        options: AnalysisOptions,
    ) -> AnalysisReport {
        let config = self.settings.resolve(domain);

        let spec = guarded(
            "drafter",
            || draft(prompt, domain, &config),
            || baseline_spec(prompt, domain, &config),
        );

        let gaps = guarded(
            "gap_detector",
            || detect_gaps(&spec, &config),
            || GapReport {
                issues: Vec::new(),
                scores: spec.metrics.unwrap_or_else(|| baseline_metrics(&config)),
            },
        );

        let patches = if options.include_improvements {
            guarded(
                "improvement_generator",
                || propose(&spec, &gaps.issues, domain, &config.completeness),
                Vec::new,
            )
        } else {
            Vec::new()
        };

        let validation = options.include_validation.then(|| {
            guarded(
                self.validator.name(),
                || self.validator.validate(&spec),
                || {
                    SchemaReport::from_errors(vec![SchemaViolation::new(
                        "/",
                        "Validator failed to run",
                    )])
                },
            )
        });

        debug!(
            issues = gaps.issues.len(),
            patches = patches.len(),
            clarity = gaps.scores.clarity,
            completeness = gaps.scores.completeness,
            "analysis complete"
        );

        AnalysisReport {
            pattern_version: PATTERN_LIBRARY_VERSION.to_string(),
            spec,
            gaps,
            patches,
            validation,
        }
    }
}

// =============================================================================
// Guard & Baselines
// =============================================================================

thread_local! {
    static GUARD_DEPTH: Cell<usize> = const { Cell::new(0) };
}

/// Whether a pipeline guard on this thread will catch a panic raised now.
/// Process-wide panic hooks use this to stay quiet for recovered faults.
pub fn in_guarded_step() -> bool {
    GUARD_DEPTH.with(Cell::get) > 0
}

/// Run a step; on panic, log the fault and return the fallback instead
fn guarded<T>(
    component: &'static str,
    step: impl FnOnce() -> T,
    fallback: impl FnOnce() -> T,
) -> T {
    GUARD_DEPTH.with(|d| d.set(d.get() + 1));
    let outcome = panic::catch_unwind(AssertUnwindSafe(step));
    GUARD_DEPTH.with(|d| d.set(d.get() - 1));

    match outcome {
        Ok(value) => value,
        Err(payload) => {
            let fault = PromptSpecError::component(component, panic_message(payload.as_ref()));
            error!(component, error = %fault, "pipeline step faulted, using baseline");
            fallback()
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

fn baseline_metrics(config: &ScoringConfig) -> Metrics {
    Metrics {
        clarity: config.clarity.base_score,
        completeness: config.completeness.base_score,
    }
}

/// Minimal specification: the trimmed prompt as the only instruction
fn baseline_spec(prompt: &str, domain: Option<Domain>, config: &ScoringConfig) -> Specification {
    Specification {
        context: SpecContext {
            domain,
            inputs: Vec::new(),
        },
        instructions: vec![prompt.trim().to_string()],
        io: SpecIo {
            format: Some(OutputFormat::Markdown),
            ..Default::default()
        },
        metrics: Some(baseline_metrics(config)),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{InputErrorCode, Intent, Severity};
    use std::num::NonZeroUsize;
    use std::time::Duration;

    fn analyzer() -> Analyzer {
        Analyzer::new(ScoringSettings::default(), InputLimits::default())
    }

    fn cached_analyzer(capacity: usize) -> Analyzer {
        let cache = ResultCache::new(
            NonZeroUsize::new(capacity).unwrap(),
            Duration::from_secs(60),
        );
        analyzer().with_cache(Arc::new(cache))
    }

    #[test]
    fn test_short_prompt_end_to_end() {
        let analysis = analyzer()
            .analyze(&AnalysisRequest::new("create user authentication"))
            .unwrap();
        let report = &analysis.report;

        assert_eq!(report.spec.intent, Intent::GenerateCode);
        assert_eq!(report.spec.instructions, vec!["create user authentication"]);
        assert_eq!(report.spec.io.format, Some(OutputFormat::Markdown));
        assert!(
            report
                .gaps
                .issues
                .iter()
                .any(|i| i.path == "/io/contract/sections" && i.severity == Severity::Warn)
        );

        let domain_patch = report
            .patches
            .iter()
            .find(|p| p.path == "/context/domain")
            .expect("domain patch");
        assert_eq!(domain_patch.value, Some(serde_json::json!("general")));
        assert!(report.validation.as_ref().is_some_and(|v| v.valid));
    }

    #[test]
    fn test_empty_prompt_rejected_before_pipeline() {
        let err = analyzer().analyze(&AnalysisRequest::new("")).unwrap_err();
        assert_eq!(err.input_code(), Some(InputErrorCode::PromptTooShort));
    }

    #[test]
    fn test_invalid_domain_rejected() {
        let err = analyzer()
            .analyze(&AnalysisRequest::new("Summarize the report").with_domain("finance"))
            .unwrap_err();
        assert_eq!(err.input_code(), Some(InputErrorCode::InvalidDomain));
    }

    #[test]
    fn test_options_gate_optional_steps() {
        let request = AnalysisRequest::new("do it").with_options(AnalysisOptions {
            include_validation: false,
            include_improvements: false,
        });
        let analysis = analyzer().analyze(&request).unwrap();
        assert!(analysis.report.patches.is_empty());
        assert!(analysis.report.validation.is_none());
    }

    #[test]
    fn test_repeat_request_hits_cache() {
        let analyzer = cached_analyzer(8);
        let request = AnalysisRequest::new("Explain the borrow checker").with_domain("code");

        let first = analyzer.analyze(&request).unwrap();
        let second = analyzer.analyze(&request).unwrap();
        assert!(!first.cache_hit);
        assert!(second.cache_hit);
        assert!(Arc::ptr_eq(&first.report, &second.report));

        let stats = analyzer.cache().unwrap().stats();
        assert_eq!((stats.hits, stats.misses, stats.size), (1, 1, 1));
        assert!(stats.memory_bytes > 0);
    }

    #[test]
    fn test_options_are_part_of_the_key() {
        let analyzer = cached_analyzer(8);
        let request = AnalysisRequest::new("Explain the borrow checker");
        analyzer.analyze(&request).unwrap();

        let other = request.clone().with_options(AnalysisOptions {
            include_validation: false,
            include_improvements: true,
        });
        assert!(!analyzer.analyze(&other).unwrap().cache_hit);
        assert_eq!(analyzer.cache().unwrap().len(), 2);
    }

    #[test]
    fn test_rejected_input_touches_no_cache_counters() {
        let analyzer = cached_analyzer(8);
        let _ = analyzer.analyze(&AnalysisRequest::new("   "));
        let stats = analyzer.cache().unwrap().stats();
        assert_eq!((stats.hits, stats.misses), (0, 0));
    }

    #[test]
    fn test_from_config_respects_cache_switch() {
        let mut config = Config::default();
        assert!(Analyzer::from_config(&config).unwrap().cache().is_some());
        config.cache.enabled = false;
        assert!(Analyzer::from_config(&config).unwrap().cache().is_none());
    }

    #[test]
    fn test_guard_substitutes_baseline() {
        let value: Vec<Patch> = guarded(
            "improvement_generator",
            || -> Vec<Patch> { panic!("boom") },
            Vec::new,
        );
        assert!(value.is_empty());

        let config = ScoringSettings::default().resolve(None);
        let spec = guarded(
            "drafter",
            || -> Specification { panic!("bad input") },
            || baseline_spec("  raw prompt ", None, &config),
        );
        assert_eq!(spec.instructions, vec!["raw prompt"]);
        assert_eq!(
            spec.metrics,
            Some(Metrics {
                clarity: 0.5,
                completeness: 0.35
            })
        );
    }

    #[test]
    fn test_guard_depth_tracks_active_steps() {
        assert!(!in_guarded_step());
        assert!(guarded("outer", in_guarded_step, || false));

        let _: Vec<Patch> = guarded("drafter", || -> Vec<Patch> { panic!("boom") }, Vec::new);
        assert!(!in_guarded_step());
    }

    #[test]
    fn test_reports_carry_pattern_version() {
        let analyzer = analyzer();
        let analysis = analyzer.analyze(&AnalysisRequest::new("Explain tides")).unwrap();
        assert_eq!(analysis.report.pattern_version, PATTERN_LIBRARY_VERSION);

        let json = serde_json::to_value(analysis.report.as_ref()).unwrap();
        assert_eq!(json["patternVersion"], PATTERN_LIBRARY_VERSION);

        let scores = analyzer.score("Explain tides", None).unwrap();
        assert_eq!(scores.pattern_version, PATTERN_LIBRARY_VERSION);
    }

    struct PanickingValidator;

    impl SpecValidator for PanickingValidator {
        fn name(&self) -> &'static str {
            "panicking"
        }

        fn validate(&self, _spec: &Specification) -> SchemaReport {
            panic!("validator exploded")
        }
    }

    #[test]
    fn test_faulty_validator_degrades_to_invalid_report() {
        let analyzer = analyzer().with_validator(Box::new(PanickingValidator));
        let analysis = analyzer
            .analyze(&AnalysisRequest::new("Compare Rust and Go"))
            .unwrap();
        let validation = analysis.report.validation.as_ref().unwrap();
        assert!(!validation.valid);
        assert_eq!(validation.errors.len(), 1);
    }

    #[test]
    fn test_score_report_matches_draft_metrics() {
        let analyzer = analyzer();
        let text = "List exactly 5 risks.\nDo not exceed 100 words.";
        let scores = analyzer.score(text, Some("product")).unwrap();
        let analysis = analyzer
            .analyze(&AnalysisRequest::new(text).with_domain("product"))
            .unwrap();
        let metrics = analysis.report.spec.metrics.unwrap();
        assert_eq!(scores.clarity.score, metrics.clarity);
        assert_eq!(scores.completeness.score, metrics.completeness);
        assert_eq!(scores.domain, Some(Domain::Product));
    }
}
