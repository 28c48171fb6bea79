//! Scoring Engine
//!
//! Two independent, pure quality scores in [0, 1]:
//!
//! - **Clarity**: how precisely the text states what it wants
//! - **Completeness**: how much of a full task description the spec carries
//!
//! Each score is a table of named signals. A signal is a pure function that
//! returns one capped delta; the engine sums base + deltas, clamps and rounds.
//! Breakdowns keep the per-signal table so every signal is testable alone.

mod clarity;
mod completeness;
pub mod config;

pub use clarity::{clarity, clarity_breakdown};
pub use completeness::{completeness, completeness_breakdown};
pub use config::{
    ClarityConfig, ClarityOverride, CompletenessConfig, CompletenessOverride, DomainOverride,
    ScoringConfig, ScoringSettings, SignalWeight,
};

use serde::Serialize;
use std::fmt;

use crate::constants::scoring::SCORE_PRECISION;

/// Named scoring signals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Signal {
    // Clarity
    VagueLanguage,
    ClarityIndicators,
    Measurements,
    ConcreteVerbs,
    SentenceLength,
    Structure,
    Questions,
    DomainTerms,
    // Completeness
    Title,
    InstructionsPresent,
    InstructionDepth,
    InstructionsTooShort,
    Constraints,
    Domain,
    OutputFormat,
    Sections,
    CompletenessIndicators,
    Examples,
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Signal::VagueLanguage => "vague_language",
            Signal::ClarityIndicators => "clarity_indicators",
            Signal::Measurements => "measurements",
            Signal::ConcreteVerbs => "concrete_verbs",
            Signal::SentenceLength => "sentence_length",
            Signal::Structure => "structure",
            Signal::Questions => "questions",
            Signal::DomainTerms => "domain_terms",
            Signal::Title => "title",
            Signal::InstructionsPresent => "instructions_present",
            Signal::InstructionDepth => "instruction_depth",
            Signal::InstructionsTooShort => "instructions_too_short",
            Signal::Constraints => "constraints",
            Signal::Domain => "domain",
            Signal::OutputFormat => "output_format",
            Signal::Sections => "sections",
            Signal::CompletenessIndicators => "completeness_indicators",
            Signal::Examples => "examples",
        };
        f.write_str(name)
    }
}

/// One signal's contribution; penalties are negative
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SignalDelta {
    pub signal: Signal,
    /// Raw matches or units observed
    pub count: usize,
    pub delta: f64,
}

impl SignalDelta {
    pub fn new(signal: Signal, count: usize, delta: f64) -> Self {
        Self {
            signal,
            count,
            delta,
        }
    }
}

/// Base score, every signal's delta, and the final clamped score
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub base: f64,
    pub signals: Vec<SignalDelta>,
    pub score: f64,
}

impl ScoreBreakdown {
    /// Sum base and deltas in table order, clamp to [0, 1], round
    pub fn from_signals(base: f64, signals: Vec<SignalDelta>) -> Self {
        let raw = signals.iter().fold(base, |acc, s| acc + s.delta);
        Self {
            base,
            signals,
            score: round_score(raw.clamp(0.0, 1.0)),
        }
    }

    /// Breakdown for text that cannot be scored
    pub fn zero() -> Self {
        Self {
            base: 0.0,
            signals: Vec::new(),
            score: 0.0,
        }
    }

    /// Delta of one signal, 0 when absent
    pub fn delta(&self, signal: Signal) -> f64 {
        self.signals
            .iter()
            .filter(|s| s.signal == signal)
            .map(|s| s.delta)
            .sum()
    }
}

/// Round to the fixed score precision
pub fn round_score(value: f64) -> f64 {
    let factor = 10f64.powi(SCORE_PRECISION);
    (value * factor).round() / factor
}
