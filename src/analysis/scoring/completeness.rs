//! Completeness Score
//!
//! Rewards the parts of a full task description that the specification
//! carries: a usable title, substantive instructions, constraints, domain,
//! output format, sections, completeness vocabulary and examples.

use super::config::CompletenessConfig;
use super::{ScoreBreakdown, Signal, SignalDelta};
use crate::analysis::patterns::{COMPLETENESS_INDICATOR_RE, EXAMPLE_RE, count_matches};
use crate::types::Specification;

/// Completeness score in [0, 1], rounded
pub fn completeness(text: &str, spec: &Specification, config: &CompletenessConfig) -> f64 {
    completeness_breakdown(text, spec, config).score
}

/// Completeness score with the per-signal table
pub fn completeness_breakdown(
    text: &str,
    spec: &Specification,
    config: &CompletenessConfig,
) -> ScoreBreakdown {
    let instruction_words = spec.instruction_word_count();

    let signals = vec![
        title(spec, config),
        instructions_present(spec, config),
        instruction_depth(instruction_words, config),
        instructions_too_short(spec, instruction_words, config),
        flag(
            Signal::Constraints,
            !spec.constraints.is_empty(),
            config.constraints_bonus,
        ),
        flag(
            Signal::Domain,
            spec.context.domain.is_some(),
            config.domain_bonus,
        ),
        flag(
            Signal::OutputFormat,
            spec.io.format.is_some(),
            config.format_bonus,
        ),
        sections(spec, config),
        indicators(text, config),
        examples(text, config),
    ];

    ScoreBreakdown::from_signals(config.base_score, signals)
}

fn flag(signal: Signal, present: bool, bonus: f64) -> SignalDelta {
    if present {
        SignalDelta::new(signal, 1, bonus)
    } else {
        SignalDelta::new(signal, 0, 0.0)
    }
}

fn title(spec: &Specification, config: &CompletenessConfig) -> SignalDelta {
    let len = spec
        .title
        .as_deref()
        .map(|t| t.trim().chars().count())
        .unwrap_or(0);
    flag(
        Signal::Title,
        len >= config.title_min_length,
        config.title_bonus,
    )
}

fn instructions_present(spec: &Specification, config: &CompletenessConfig) -> SignalDelta {
    flag(
        Signal::InstructionsPresent,
        !spec.instructions.is_empty(),
        config.instructions_bonus,
    )
}

/// One bonus per threshold reached
fn instruction_depth(words: usize, config: &CompletenessConfig) -> SignalDelta {
    let reached = config
        .depth_thresholds
        .iter()
        .filter(|&&t| words >= t)
        .count();
    SignalDelta::new(
        Signal::InstructionDepth,
        reached,
        reached as f64 * config.depth_bonus,
    )
}

fn instructions_too_short(
    spec: &Specification,
    words: usize,
    config: &CompletenessConfig,
) -> SignalDelta {
    if !spec.instructions.is_empty() && words < config.too_short_words {
        SignalDelta::new(Signal::InstructionsTooShort, words, -config.too_short_penalty)
    } else {
        SignalDelta::new(Signal::InstructionsTooShort, words, 0.0)
    }
}

fn sections(spec: &Specification, config: &CompletenessConfig) -> SignalDelta {
    let count = spec.io.contract.sections.len();
    SignalDelta::new(Signal::Sections, count, config.sections.apply(count))
}

fn indicators(text: &str, config: &CompletenessConfig) -> SignalDelta {
    let count = count_matches(&COMPLETENESS_INDICATOR_RE, text);
    SignalDelta::new(
        Signal::CompletenessIndicators,
        count,
        config.indicators.apply(count),
    )
}

fn examples(text: &str, config: &CompletenessConfig) -> SignalDelta {
    let count = count_matches(&EXAMPLE_RE, text);
    let bonus = if count > 0 { config.example_bonus } else { 0.0 };
    SignalDelta::new(Signal::Examples, count, bonus)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Domain, OutputFormat};
    use proptest::prelude::*;

    fn cfg() -> CompletenessConfig {
        CompletenessConfig::default()
    }

    fn spec_with(instructions: &[&str]) -> Specification {
        Specification {
            instructions: instructions.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_spec_scores_base() {
        let spec = Specification::default();
        assert_eq!(completeness("", &spec, &cfg()), 0.35);
    }

    #[test]
    fn test_short_instructions_penalized() {
        let spec = spec_with(&["create user authentication"]);
        let b = completeness_breakdown("create user authentication", &spec, &cfg());
        assert_eq!(b.delta(Signal::InstructionsTooShort), -0.1);
        assert_eq!(b.delta(Signal::InstructionDepth), 0.0);
        assert_eq!(b.delta(Signal::InstructionsPresent), 0.1);
    }

    #[test]
    fn test_depth_bonuses_escalate() {
        let words = vec!["token"; 55].join(" ");
        let spec = spec_with(&[&words]);
        let b = completeness_breakdown(&words, &spec, &cfg());
        assert!((b.delta(Signal::InstructionDepth) - 0.1).abs() < 1e-9);
        assert_eq!(b.delta(Signal::InstructionsTooShort), 0.0);
    }

    #[test]
    fn test_title_needs_min_length() {
        let mut spec = spec_with(&["x"]);
        spec.title = Some("Short".to_string());
        assert_eq!(
            completeness_breakdown("", &spec, &cfg()).delta(Signal::Title),
            0.0
        );
        spec.title = Some("A proper title".to_string());
        assert_eq!(
            completeness_breakdown("", &spec, &cfg()).delta(Signal::Title),
            0.1
        );
    }

    #[test]
    fn test_structural_fields_add_bonuses() {
        let mut spec = spec_with(&["Summarize the report"]);
        let before = completeness("", &spec, &cfg());

        spec.constraints.push("Keep the response within 100 words".to_string());
        spec.context.domain = Some(Domain::Docs);
        spec.io.format = Some(OutputFormat::Markdown);
        spec.io.contract.sections = vec!["Overview".to_string(), "Details".to_string()];

        let after = completeness_breakdown("", &spec, &cfg());
        assert!(after.score > before);
        assert_eq!(after.delta(Signal::Constraints), 0.1);
        assert_eq!(after.delta(Signal::Domain), 0.05);
        assert_eq!(after.delta(Signal::OutputFormat), 0.05);
        assert!((after.delta(Signal::Sections) - 0.06).abs() < 1e-9);
    }

    #[test]
    fn test_examples_and_indicators_from_text() {
        let spec = spec_with(&["x"]);
        let text = "Describe the input and output formats, for example a CSV row";
        let b = completeness_breakdown(text, &spec, &cfg());
        assert_eq!(b.delta(Signal::Examples), 0.05);
        // input, output
        assert!((b.delta(Signal::CompletenessIndicators) - 0.04).abs() < 1e-9);
    }

    proptest! {
        #[test]
        fn prop_completeness_in_bounds(
            text in ".{0,300}",
            instructions in prop::collection::vec(".{0,80}", 0..6),
            constraints in prop::collection::vec(".{0,40}", 0..3),
            title in prop::option::of(".{0,30}"),
        ) {
            let spec = Specification {
                title,
                instructions,
                constraints,
                ..Default::default()
            };
            let score = completeness(&text, &spec, &cfg());
            prop_assert!((0.0..=1.0).contains(&score));
            prop_assert_eq!(score, completeness(&text, &spec, &cfg()));
        }
    }
}
