//! Specification Model
//!
//! The structured artifact derived from a prompt. Specifications are plain
//! values: the drafter builds one per request and every later stage only
//! reads it.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Schema version tag carried by every specification
pub const SPEC_VERSION: &str = "1.0";

// =============================================================================
// Intent
// =============================================================================

/// What the prompt asks for, inferred from lexical cues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    #[default]
    General,
    GenerateCode,
    Analyze,
    Explain,
    Translate,
    Refactor,
    Classify,
    Plan,
    Compare,
    Summarize,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::General => "general",
            Intent::GenerateCode => "generate_code",
            Intent::Analyze => "analyze",
            Intent::Explain => "explain",
            Intent::Translate => "translate",
            Intent::Refactor => "refactor",
            Intent::Classify => "classify",
            Intent::Plan => "plan",
            Intent::Compare => "compare",
            Intent::Summarize => "summarize",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Domain
// =============================================================================

/// Optional topical tag narrowing scoring defaults
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Domain {
    Code,
    Docs,
    Data,
    Product,
    Research,
}

impl Domain {
    pub const ALL: [Domain; 5] = [
        Domain::Code,
        Domain::Docs,
        Domain::Data,
        Domain::Product,
        Domain::Research,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::Code => "code",
            Domain::Docs => "docs",
            Domain::Data => "data",
            Domain::Product => "product",
            Domain::Research => "research",
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Domain {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "code" => Ok(Domain::Code),
            "docs" => Ok(Domain::Docs),
            "data" => Ok(Domain::Data),
            "product" => Ok(Domain::Product),
            "research" => Ok(Domain::Research),
            _ => Err(format!(
                "Unknown domain: {}. Valid values: code, docs, data, product, research",
                s
            )),
        }
    }
}

// =============================================================================
// Output Format
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Markdown,
    Json,
    Csv,
    Text,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Markdown => "markdown",
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "text",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Context
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputKind {
    File,
    Text,
    Url,
}

impl InputKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            InputKind::File => "file",
            InputKind::Text => "text",
            InputKind::Url => "url",
        }
    }
}

/// A typed reference to material the prompt works on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputRef {
    #[serde(rename = "type")]
    pub kind: InputKind,
    pub value: String,
}

impl InputRef {
    pub fn new(kind: InputKind, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpecContext {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<Domain>,
    pub inputs: Vec<InputRef>,
}

// =============================================================================
// I/O Contract
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputContract {
    pub sections: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpecIo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<OutputFormat>,
    pub contract: OutputContract,
}

/// Cached score pair, always derivable from the text
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    pub clarity: f64,
    pub completeness: f64,
}

// =============================================================================
// Specification
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Specification {
    pub version: String,
    #[serde(default)]
    pub intent: Intent,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub context: SpecContext,
    #[serde(default)]
    pub instructions: Vec<String>,
    #[serde(default)]
    pub constraints: Vec<String>,
    #[serde(default)]
    pub io: SpecIo,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metrics: Option<Metrics>,
}

impl Default for Specification {
    fn default() -> Self {
        Self {
            version: SPEC_VERSION.to_string(),
            intent: Intent::General,
            title: None,
            context: SpecContext::default(),
            instructions: Vec::new(),
            constraints: Vec::new(),
            io: SpecIo::default(),
            metrics: None,
        }
    }
}

impl Specification {
    /// Instructions joined with single spaces
    pub fn joined_instructions(&self) -> String {
        self.instructions.join(" ")
    }

    /// Word count of the joined instruction text
    pub fn instruction_word_count(&self) -> usize {
        self.instructions
            .iter()
            .map(|i| i.split_whitespace().count())
            .sum()
    }
}
