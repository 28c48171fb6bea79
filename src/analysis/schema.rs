//! Structural Validation
//!
//! Shape checks on a specification at the schema boundary:
//! - Version tag matches
//! - Instructions present and non-blank
//! - Output format present
//! - Metrics within [0, 1]
//! - Contract sections non-blank and unique
//! - URL inputs parse
//!
//! Conformance against an externally supplied schema document plugs in
//! through [`SpecValidator`].

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use url::Url;

use crate::types::{InputKind, SPEC_VERSION, Specification};

/// One structural violation, located by a pointer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaViolation {
    pub path: String,
    pub message: String,
}

impl SchemaViolation {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaReport {
    pub valid: bool,
    pub errors: Vec<SchemaViolation>,
}

impl SchemaReport {
    pub fn from_errors(errors: Vec<SchemaViolation>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }
}

/// Validates a specification's shape
pub trait SpecValidator: Send + Sync {
    fn name(&self) -> &'static str;

    fn validate(&self, spec: &Specification) -> SchemaReport;
}

/// Built-in validator for the specification data model
#[derive(Debug, Clone, Copy, Default)]
pub struct StructuralValidator;

impl SpecValidator for StructuralValidator {
    fn name(&self) -> &'static str {
        "structural"
    }

    fn validate(&self, spec: &Specification) -> SchemaReport {
        let mut errors = Vec::new();

        if spec.version != SPEC_VERSION {
            errors.push(SchemaViolation::new(
                "/version",
                format!("Expected version {}, found {}", SPEC_VERSION, spec.version),
            ));
        }

        if spec.instructions.is_empty() {
            errors.push(SchemaViolation::new(
                "/instructions",
                "Must contain at least one entry",
            ));
        }
        for (i, instruction) in spec.instructions.iter().enumerate() {
            if instruction.trim().is_empty() {
                errors.push(SchemaViolation::new(
                    format!("/instructions/{}", i),
                    "Must not be blank",
                ));
            }
        }

        if spec.io.format.is_none() {
            errors.push(SchemaViolation::new("/io/format", "Required field missing"));
        }

        let mut seen = HashSet::new();
        for (i, section) in spec.io.contract.sections.iter().enumerate() {
            let path = format!("/io/contract/sections/{}", i);
            if section.trim().is_empty() {
                errors.push(SchemaViolation::new(path, "Must not be blank"));
            } else if !seen.insert(section.as_str()) {
                errors.push(SchemaViolation::new(
                    path,
                    format!("Duplicate section '{}'", section),
                ));
            }
        }

        for (i, input) in spec.context.inputs.iter().enumerate() {
            if input.kind == InputKind::Url && Url::parse(&input.value).is_err() {
                errors.push(SchemaViolation::new(
                    format!("/context/inputs/{}/value", i),
                    format!("Invalid URL '{}'", input.value),
                ));
            }
        }

        if let Some(metrics) = spec.metrics {
            for (name, value) in [
                ("clarity", metrics.clarity),
                ("completeness", metrics.completeness),
            ] {
                if !(0.0..=1.0).contains(&value) {
                    errors.push(SchemaViolation::new(
                        format!("/metrics/{}", name),
                        format!("Score {} outside [0, 1]", value),
                    ));
                }
            }
        }

        SchemaReport::from_errors(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::drafter::draft;
    use crate::analysis::scoring::ScoringSettings;
    use crate::types::{InputRef, Metrics};

    #[test]
    fn test_drafted_spec_is_valid() {
        let config = ScoringSettings::default().resolve(None);
        let spec = draft(
            "Compare https://a.example/x and notes.md, give an overview",
            None,
            &config,
        );
        let report = StructuralValidator.validate(&spec);
        assert!(report.valid, "{:?}", report.errors);
    }

    #[test]
    fn test_violations_collected() {
        let mut spec = Specification {
            version: "0.9".to_string(),
            instructions: vec!["  ".to_string()],
            ..Default::default()
        };
        spec.io.contract.sections = vec!["Overview".to_string(), "Overview".to_string()];
        spec.context
            .inputs
            .push(InputRef::new(InputKind::Url, "not a url"));
        spec.metrics = Some(Metrics {
            clarity: 1.5,
            completeness: 0.2,
        });

        let report = StructuralValidator.validate(&spec);
        assert!(!report.valid);
        let paths: Vec<&str> = report.errors.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(
            paths,
            vec![
                "/version",
                "/instructions/0",
                "/io/format",
                "/io/contract/sections/1",
                "/context/inputs/0/value",
                "/metrics/clarity",
            ]
        );
    }
}
