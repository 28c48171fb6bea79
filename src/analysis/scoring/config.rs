//! Scoring Configuration
//!
//! Numeric parameter sets for both scoring functions. Defaults live in
//! `ScoringSettings::default()`; a per-domain override is merged shallowly on
//! top by [`ScoringSettings::resolve`], producing an immutable
//! [`ScoringConfig`]. The weights are hand-tuned configuration, not derived
//! from labeled data.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::constants::scoring::{CLARITY_BASE, COMPLETENESS_BASE};
use crate::types::{Domain, PromptSpecError, Result};

/// Per-match magnitude with an upper bound
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SignalWeight {
    pub per_match: f64,
    pub cap: f64,
}

impl SignalWeight {
    pub const fn new(per_match: f64, cap: f64) -> Self {
        Self { per_match, cap }
    }

    /// `min(count × per_match, cap)`
    pub fn apply(&self, count: usize) -> f64 {
        (count as f64 * self.per_match).min(self.cap)
    }
}

// =============================================================================
// Clarity
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClarityConfig {
    pub base_score: f64,
    /// Trimmed texts shorter than this score 0
    pub min_text_length: usize,

    pub vague: SignalWeight,
    /// Scale the vague penalty by match density × word count
    pub proportional_vague_penalty: bool,
    pub indicators: SignalWeight,
    pub measurements: SignalWeight,
    pub concrete_verbs: SignalWeight,

    /// Sentences with this many words or fewer are ignored for length
    pub min_sentence_words: usize,
    pub long_sentence_words: usize,
    pub long_sentence_penalty: f64,
    pub very_long_sentence_words: usize,
    pub very_long_sentence_penalty: f64,

    pub structure_bonus: f64,

    pub question_bonus_enabled: bool,
    pub questions: SignalWeight,
    pub domain_bonus_enabled: bool,
    pub domain_terms: SignalWeight,
}

impl Default for ClarityConfig {
    fn default() -> Self {
        Self {
            base_score: CLARITY_BASE,
            min_text_length: 3,
            vague: SignalWeight::new(0.05, 0.3),
            proportional_vague_penalty: false,
            indicators: SignalWeight::new(0.05, 0.2),
            measurements: SignalWeight::new(0.05, 0.15),
            concrete_verbs: SignalWeight::new(0.03, 0.15),
            min_sentence_words: 3,
            long_sentence_words: 25,
            long_sentence_penalty: 0.05,
            very_long_sentence_words: 40,
            very_long_sentence_penalty: 0.1,
            structure_bonus: 0.1,
            question_bonus_enabled: true,
            questions: SignalWeight::new(0.02, 0.05),
            domain_bonus_enabled: true,
            domain_terms: SignalWeight::new(0.02, 0.1),
        }
    }
}

// =============================================================================
// Completeness
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompletenessConfig {
    pub base_score: f64,

    pub title_bonus: f64,
    pub title_min_length: usize,

    pub instructions_bonus: f64,
    /// Joined instruction word counts unlocking one depth bonus each
    pub depth_thresholds: [usize; 3],
    pub depth_bonus: f64,
    pub too_short_words: usize,
    pub too_short_penalty: f64,

    pub constraints_bonus: f64,
    pub domain_bonus: f64,
    pub format_bonus: f64,

    pub sections: SignalWeight,
    pub indicators: SignalWeight,
    pub example_bonus: f64,
}

impl Default for CompletenessConfig {
    fn default() -> Self {
        Self {
            base_score: COMPLETENESS_BASE,
            title_bonus: 0.1,
            title_min_length: 8,
            instructions_bonus: 0.1,
            depth_thresholds: [20, 50, 100],
            depth_bonus: 0.05,
            too_short_words: 10,
            too_short_penalty: 0.1,
            constraints_bonus: 0.1,
            domain_bonus: 0.05,
            format_bonus: 0.05,
            sections: SignalWeight::new(0.03, 0.1),
            indicators: SignalWeight::new(0.02, 0.1),
            example_bonus: 0.05,
        }
    }
}

impl CompletenessConfig {
    /// Word count below which instructions count as shallow
    pub fn min_depth_words(&self) -> usize {
        self.depth_thresholds[0]
    }
}

// =============================================================================
// Domain Overrides
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClarityOverride {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vague: Option<SignalWeight>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain_terms: Option<SignalWeight>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompletenessOverride {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub constraints_bonus: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example_bonus: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DomainOverride {
    pub clarity: ClarityOverride,
    pub completeness: CompletenessOverride,
}

impl ClarityConfig {
    fn weights(&self) -> [(&'static str, SignalWeight); 6] {
        [
            ("vague", self.vague),
            ("indicators", self.indicators),
            ("measurements", self.measurements),
            ("concrete_verbs", self.concrete_verbs),
            ("questions", self.questions),
            ("domain_terms", self.domain_terms),
        ]
    }

    fn magnitudes(&self) -> [(&'static str, f64); 3] {
        [
            ("long_sentence_penalty", self.long_sentence_penalty),
            ("very_long_sentence_penalty", self.very_long_sentence_penalty),
            ("structure_bonus", self.structure_bonus),
        ]
    }

    /// Copy with every set override field replacing the default
    pub fn merged(&self, o: &ClarityOverride) -> Self {
        Self {
            base_score: o.base_score.unwrap_or(self.base_score),
            vague: o.vague.unwrap_or(self.vague),
            domain_terms: o.domain_terms.unwrap_or(self.domain_terms),
            ..self.clone()
        }
    }
}

impl CompletenessConfig {
    fn weights(&self) -> [(&'static str, SignalWeight); 2] {
        [("sections", self.sections), ("indicators", self.indicators)]
    }

    fn magnitudes(&self) -> [(&'static str, f64); 8] {
        [
            ("title_bonus", self.title_bonus),
            ("instructions_bonus", self.instructions_bonus),
            ("depth_bonus", self.depth_bonus),
            ("too_short_penalty", self.too_short_penalty),
            ("constraints_bonus", self.constraints_bonus),
            ("domain_bonus", self.domain_bonus),
            ("format_bonus", self.format_bonus),
            ("example_bonus", self.example_bonus),
        ]
    }

    /// Copy with every set override field replacing the default
    pub fn merged(&self, o: &CompletenessOverride) -> Self {
        Self {
            base_score: o.base_score.unwrap_or(self.base_score),
            constraints_bonus: o.constraints_bonus.unwrap_or(self.constraints_bonus),
            example_bonus: o.example_bonus.unwrap_or(self.example_bonus),
            ..self.clone()
        }
    }
}

// =============================================================================
// Settings & Resolution
// =============================================================================

/// Resolved, immutable parameters for one domain
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoringConfig {
    pub clarity: ClarityConfig,
    pub completeness: CompletenessConfig,
}

/// Defaults plus per-domain overrides, as loaded from configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringSettings {
    pub clarity: ClarityConfig,
    pub completeness: CompletenessConfig,
    /// Keyed by domain name (code, docs, data, product, research)
    pub domains: BTreeMap<String, DomainOverride>,
}

impl Default for ScoringSettings {
    fn default() -> Self {
        let mut domains = BTreeMap::new();
        domains.insert(
            Domain::Code.to_string(),
            DomainOverride {
                clarity: ClarityOverride {
                    base_score: Some(0.45),
                    ..Default::default()
                },
                completeness: CompletenessOverride {
                    base_score: Some(0.3),
                    constraints_bonus: Some(0.12),
                    ..Default::default()
                },
            },
        );
        domains.insert(
            Domain::Data.to_string(),
            DomainOverride {
                clarity: ClarityOverride {
                    base_score: Some(0.45),
                    ..Default::default()
                },
                ..Default::default()
            },
        );
        domains.insert(
            Domain::Product.to_string(),
            DomainOverride {
                completeness: CompletenessOverride {
                    base_score: Some(0.4),
                    example_bonus: Some(0.08),
                    ..Default::default()
                },
                ..Default::default()
            },
        );

        Self {
            clarity: ClarityConfig::default(),
            completeness: CompletenessConfig::default(),
            domains,
        }
    }
}

impl ScoringSettings {
    /// Merge the domain override (if any) over the defaults
    pub fn resolve(&self, domain: Option<Domain>) -> ScoringConfig {
        match domain.and_then(|d| self.domains.get(d.as_str())) {
            Some(o) => ScoringConfig {
                clarity: self.clarity.merged(&o.clarity),
                completeness: self.completeness.merged(&o.completeness),
            },
            None => ScoringConfig {
                clarity: self.clarity.clone(),
                completeness: self.completeness.clone(),
            },
        }
    }

    /// Reject out-of-range parameters and unknown domain keys.
    ///
    /// Weights, caps, bonuses and penalties are magnitudes: the sign of each
    /// signal is fixed, so a negative value would flip its direction.
    pub fn validate(&self) -> Result<()> {
        for domain in std::iter::once(None).chain(Domain::ALL.into_iter().map(Some)) {
            let scope = domain.map_or("default", |d| d.as_str());
            let resolved = self.resolve(domain);
            check_magnitudes(
                scope,
                "clarity",
                resolved.clarity.weights(),
                resolved.clarity.magnitudes(),
            )?;
            check_magnitudes(
                scope,
                "completeness",
                resolved.completeness.weights(),
                resolved.completeness.magnitudes(),
            )?;
        }

        for domain in Domain::ALL {
            let resolved = self.resolve(Some(domain));
            for (name, base) in [
                ("clarity.base_score", resolved.clarity.base_score),
                ("completeness.base_score", resolved.completeness.base_score),
            ] {
                if !(0.0..=1.0).contains(&base) {
                    return Err(PromptSpecError::Config(format!(
                        "{} for domain {} must be between 0.0 and 1.0, got {}",
                        name, domain, base
                    )));
                }
            }
        }

        if let Some(key) = self
            .domains
            .keys()
            .find(|k| k.parse::<Domain>().is_err())
        {
            return Err(PromptSpecError::Config(format!(
                "Unknown scoring domain '{}'. Valid values: code, docs, data, product, research",
                key
            )));
        }

        let t = self.completeness.depth_thresholds;
        if !(t[0] < t[1] && t[1] < t[2]) {
            return Err(PromptSpecError::Config(format!(
                "completeness.depth_thresholds must be strictly increasing, got {:?}",
                t
            )));
        }

        if self.clarity.long_sentence_words >= self.clarity.very_long_sentence_words {
            return Err(PromptSpecError::Config(
                "clarity.long_sentence_words must be below very_long_sentence_words".to_string(),
            ));
        }

        Ok(())
    }
}

fn check_magnitudes<const W: usize, const M: usize>(
    scope: &str,
    section: &str,
    weights: [(&'static str, SignalWeight); W],
    magnitudes: [(&'static str, f64); M],
) -> Result<()> {
    let values = weights
        .into_iter()
        .flat_map(|(name, w)| [(name, "per_match", w.per_match), (name, "cap", w.cap)])
        .chain(magnitudes.into_iter().map(|(name, v)| (name, "", v)));

    for (name, part, value) in values {
        if value.is_finite() && value >= 0.0 {
            continue;
        }
        let field = if part.is_empty() {
            name.to_string()
        } else {
            format!("{}.{}", name, part)
        };
        return Err(PromptSpecError::Config(format!(
            "{}.{} ({} scoring) must be a non-negative number, got {}",
            section, field, scope, value
        )));
    }
    Ok(())
}
