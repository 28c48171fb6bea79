//! Clarity Score
//!
//! Starts from the domain-resolved base and applies, in order: vague-language
//! penalty, clarity-indicator bonus, measurement bonus, concrete-verb bonus,
//! long-sentence penalty, structure bonus, question bonus and domain-term
//! bonus. Each signal is capped on its own before summation.

use super::config::ClarityConfig;
use super::{ScoreBreakdown, Signal, SignalDelta};
use crate::analysis::patterns::{
    CLARITY_INDICATOR_RE, CONCRETE_VERB_RE, MEASUREMENT_RE, QUESTION_RE, SENTENCE_SPLIT_RE,
    VAGUE_RE, count_matches, domain_terms, structure_markers, word_count,
};
use crate::types::Domain;

/// Clarity score in [0, 1], rounded
pub fn clarity(text: &str, domain: Option<Domain>, config: &ClarityConfig) -> f64 {
    clarity_breakdown(text, domain, config).score
}

/// Clarity score with the per-signal table
pub fn clarity_breakdown(
    text: &str,
    domain: Option<Domain>,
    config: &ClarityConfig,
) -> ScoreBreakdown {
    let text = text.trim();
    if text.chars().count() < config.min_text_length {
        return ScoreBreakdown::zero();
    }

    let words = word_count(text);
    let mut signals = vec![
        vague_language(text, words, config),
        clarity_indicators(text, config),
        measurements(text, config),
        concrete_verbs(text, config),
        sentence_length(text, config),
        structure(text, config),
    ];

    if config.question_bonus_enabled {
        signals.push(questions(text, config));
    }
    if config.domain_bonus_enabled
        && let Some(domain) = domain
    {
        signals.push(domain_terminology(text, domain, config));
    }

    ScoreBreakdown::from_signals(config.base_score, signals)
}

fn vague_language(text: &str, words: usize, config: &ClarityConfig) -> SignalDelta {
    let count = count_matches(&VAGUE_RE, text);
    let penalty = if config.proportional_vague_penalty && words > 0 {
        let density = count as f64 / words as f64;
        (density * words as f64 * config.vague.per_match).min(config.vague.cap)
    } else {
        config.vague.apply(count)
    };
    SignalDelta::new(Signal::VagueLanguage, count, -penalty)
}

fn clarity_indicators(text: &str, config: &ClarityConfig) -> SignalDelta {
    let count = count_matches(&CLARITY_INDICATOR_RE, text);
    SignalDelta::new(Signal::ClarityIndicators, count, config.indicators.apply(count))
}

fn measurements(text: &str, config: &ClarityConfig) -> SignalDelta {
    let count = count_matches(&MEASUREMENT_RE, text);
    SignalDelta::new(Signal::Measurements, count, config.measurements.apply(count))
}

fn concrete_verbs(text: &str, config: &ClarityConfig) -> SignalDelta {
    let count = count_matches(&CONCRETE_VERB_RE, text);
    SignalDelta::new(Signal::ConcreteVerbs, count, config.concrete_verbs.apply(count))
}

/// Penalty on mean length of sentences longer than `min_sentence_words`;
/// the very-long penalty replaces the long one rather than stacking.
fn sentence_length(text: &str, config: &ClarityConfig) -> SignalDelta {
    let lengths: Vec<usize> = SENTENCE_SPLIT_RE
        .split(text)
        .map(word_count)
        .filter(|&n| n > config.min_sentence_words)
        .collect();

    if lengths.is_empty() {
        return SignalDelta::new(Signal::SentenceLength, 0, 0.0);
    }

    let mean = lengths.iter().sum::<usize>() as f64 / lengths.len() as f64;
    let penalty = if mean > config.very_long_sentence_words as f64 {
        config.very_long_sentence_penalty
    } else if mean > config.long_sentence_words as f64 {
        config.long_sentence_penalty
    } else {
        0.0
    };

    SignalDelta::new(Signal::SentenceLength, mean.round() as usize, -penalty)
}

fn structure(text: &str, config: &ClarityConfig) -> SignalDelta {
    let count = structure_markers(text);
    let bonus = if count > 0 { config.structure_bonus } else { 0.0 };
    SignalDelta::new(Signal::Structure, count, bonus)
}

fn questions(text: &str, config: &ClarityConfig) -> SignalDelta {
    let count = count_matches(&QUESTION_RE, text);
    SignalDelta::new(Signal::Questions, count, config.questions.apply(count))
}

fn domain_terminology(text: &str, domain: Domain, config: &ClarityConfig) -> SignalDelta {
    let count = count_matches(domain_terms(domain), text);
    SignalDelta::new(Signal::DomainTerms, count, config.domain_terms.apply(count))
}
