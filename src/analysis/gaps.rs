//! Gap Detector
//!
//! Inspects a specification and reports categorized issues together with its
//! score pair. Stateless: the whole specification is re-evaluated on every
//! call and no issue is ever resolved automatically.

use serde::{Deserialize, Serialize};

use super::patterns::VAGUE_RE;
use super::scoring::{ScoringConfig, clarity, completeness};
use crate::types::{Issue, Metrics, OutputFormat, Severity, Specification};

/// Issues in rule order plus the specification's scores
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GapReport {
    pub issues: Vec<Issue>,
    pub scores: Metrics,
}

impl GapReport {
    pub fn count(&self, severity: Severity) -> usize {
        self.issues.iter().filter(|i| i.severity == severity).count()
    }

    pub fn has_errors(&self) -> bool {
        self.count(Severity::Error) > 0
    }

    /// Whether any issue points at `path`
    pub fn touches(&self, path: &str) -> bool {
        self.issues.iter().any(|i| i.path == path)
    }
}

/// Detect gaps in a specification (convenience wrapper)
pub fn detect_gaps(spec: &Specification, config: &ScoringConfig) -> GapReport {
    GapDetector::new(config).detect(spec)
}

pub struct GapDetector<'a> {
    config: &'a ScoringConfig,
}

impl<'a> GapDetector<'a> {
    pub fn new(config: &'a ScoringConfig) -> Self {
        Self { config }
    }

    /// Evaluate every rule in order
    pub fn detect(&self, spec: &Specification) -> GapReport {
        let joined = spec.joined_instructions();

        let issues = [
            missing_format(spec),
            markdown_without_sections(spec),
            empty_instructions(spec),
            vague_instructions(&joined),
            empty_constraints(spec),
            no_inputs(spec),
        ]
        .into_iter()
        .flatten()
        .collect();

        GapReport {
            issues,
            scores: self.scores(spec, &joined),
        }
    }

    /// Existing metrics, or scores re-derived from the instruction text
    fn scores(&self, spec: &Specification, joined: &str) -> Metrics {
        if let Some(metrics) = spec.metrics {
            return metrics;
        }
        Metrics {
            clarity: clarity(joined, spec.context.domain, &self.config.clarity),
            completeness: completeness(joined, spec, &self.config.completeness),
        }
    }
}

// =============================================================================
// Rules
// =============================================================================

fn missing_format(spec: &Specification) -> Option<Issue> {
    spec.io.format.is_none().then(|| {
        Issue::error(
            "/io/format",
            "Output format is required (markdown, json, csv or text)",
        )
    })
}

fn markdown_without_sections(spec: &Specification) -> Option<Issue> {
    (spec.io.format == Some(OutputFormat::Markdown) && spec.io.contract.sections.is_empty())
        .then(|| {
            Issue::warn(
                "/io/contract/sections",
                "Markdown output has no sections; name the sections the answer should contain",
            )
        })
}

fn empty_instructions(spec: &Specification) -> Option<Issue> {
    spec.instructions.is_empty().then(|| {
        Issue::error("/instructions", "At least one instruction is required")
    })
}

fn vague_instructions(joined: &str) -> Option<Issue> {
    let terms: Vec<&str> = VAGUE_RE.find_iter(joined).map(|m| m.as_str()).collect();
    (!terms.is_empty()).then(|| {
        Issue::warn(
            "/instructions",
            format!(
                "Vague language found ({}); replace with specific, measurable wording",
                terms.join(", ")
            ),
        )
    })
}

fn empty_constraints(spec: &Specification) -> Option<Issue> {
    spec.constraints.is_empty().then(|| {
        Issue::info(
            "/constraints",
            "No constraints given; consider length, tone or scope limits",
        )
    })
}

fn no_inputs(spec: &Specification) -> Option<Issue> {
    spec.context.inputs.is_empty().then(|| {
        Issue::info(
            "/context/inputs",
            "No input material linked; reference files, URLs or text if the task depends on them",
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::drafter::draft;
    use crate::analysis::scoring::ScoringSettings;
    use crate::types::{InputKind, InputRef};
    use proptest::prelude::*;

    fn config() -> ScoringConfig {
        ScoringSettings::default().resolve(None)
    }

    #[test]
    fn test_empty_constraints_reported_once_as_info() {
        let spec = Specification {
            instructions: vec!["Translate the README into German".to_string()],
            constraints: vec![],
            io: crate::types::SpecIo {
                format: Some(OutputFormat::Text),
                ..Default::default()
            },
            ..Default::default()
        };
        let report = detect_gaps(&spec, &config());
        let matching: Vec<&Issue> = report
            .issues
            .iter()
            .filter(|i| i.path == "/constraints")
            .collect();
        assert_eq!(matching.len(), 1);
        assert_eq!(matching[0].severity, Severity::Info);
    }

    #[test]
    fn test_rule_order_is_stable() {
        let spec = Specification {
            instructions: vec![],
            ..Default::default()
        };
        let report = detect_gaps(&spec, &config());
        let paths: Vec<&str> = report.issues.iter().map(|i| i.path.as_str()).collect();
        assert_eq!(
            paths,
            vec!["/io/format", "/instructions", "/constraints", "/context/inputs"]
        );
        assert!(report.has_errors());
    }

    #[test]
    fn test_markdown_without_sections_warns() {
        let spec = draft("create user authentication", None, &config());
        let report = detect_gaps(&spec, &config());
        let warn = report
            .issues
            .iter()
            .find(|i| i.path == "/io/contract/sections")
            .expect("sections warning");
        assert_eq!(warn.severity, Severity::Warn);
    }

    #[test]
    fn test_vague_instructions_warn_lists_terms() {
        let spec = draft("Make a really nice landing page", None, &config());
        let report = detect_gaps(&spec, &config());
        let vague = report
            .issues
            .iter()
            .find(|i| i.path == "/instructions" && i.severity == Severity::Warn)
            .expect("vague warning");
        assert!(vague.message.contains("really"));
        assert!(vague.message.contains("nice"));
    }

    #[test]
    fn test_inputs_silence_info() {
        let mut spec = draft("Summarize the attached notes", None, &config());
        spec.context.inputs.push(InputRef::new(InputKind::File, "notes.md"));
        assert!(!detect_gaps(&spec, &config()).touches("/context/inputs"));
    }

    #[test]
    fn test_scores_echo_existing_metrics() {
        let mut spec = draft("Explain lifetimes", None, &config());
        spec.metrics = Some(Metrics {
            clarity: 0.11,
            completeness: 0.22,
        });
        let report = detect_gaps(&spec, &config());
        assert_eq!(report.scores.clarity, 0.11);
        assert_eq!(report.scores.completeness, 0.22);
    }

    #[test]
    fn test_scores_rederived_when_missing() {
        let drafted = draft("Explain lifetimes in Rust with examples", None, &config());
        let mut bare = drafted.clone();
        bare.metrics = None;
        let report = detect_gaps(&bare, &config());
        assert_eq!(report.scores.clarity, drafted.metrics.unwrap().clarity);
        assert!((0.0..=1.0).contains(&report.scores.completeness));
    }

    proptest! {
        #[test]
        fn prop_drafted_specs_never_miss_format(text in "[a-zA-Z0-9 .,\n-]{1,300}") {
            let spec = draft(&text, None, &config());
            let report = detect_gaps(&spec, &config());
            prop_assert!(!report.touches("/io/format"));
        }
    }
}
