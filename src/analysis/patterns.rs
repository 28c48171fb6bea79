//! Pattern Library
//!
//! Static, versioned lexical patterns consumed by scoring and drafting.
//!
//! ## Design Principles
//! - Every pattern set is compiled once and shared (`LazyLock<Regex>`)
//! - Term lists are matched case-insensitively on word boundaries
//! - Multi-word terms tolerate any run of whitespace between words
//!
//! ## Pattern Sets
//! - Scoring: vague terms, clarity indicators, measurements, concrete verbs,
//!   structure markers, questions, completeness indicators, example phrases,
//!   domain terminology
//! - Drafting: intent rules, section cues, output-format cues, word limits,
//!   prohibitions, input references

use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

use crate::types::{Domain, Intent, OutputFormat};

/// Bumped whenever a term list or rule order changes scoring output
pub const PATTERN_LIBRARY_VERSION: &str = "1.0";

// =============================================================================
// Term Lists
// =============================================================================

const VAGUE_TERMS: &[&str] = &[
    "very",
    "really",
    "quite",
    "rather",
    "somewhat",
    "fairly",
    "good",
    "nice",
    "bad",
    "great",
    "stuff",
    "things",
    "thing",
    "something",
    "somehow",
    "whatever",
    "etc",
    "maybe",
    "probably",
    "perhaps",
    "kind of",
    "sort of",
    "a lot",
    "various",
    "several",
    "some",
    "better",
    "appropriate",
    "properly",
];

const CLARITY_INDICATORS: &[&str] = &[
    "specifically",
    "specific",
    "exactly",
    "precisely",
    "explicitly",
    "must",
    "required",
    "requires",
    "shall",
    "should",
    "ensure",
    "only",
    "always",
    "never",
    "each",
    "every",
];

const CONCRETE_VERBS: &[&str] = &[
    "create",
    "write",
    "build",
    "implement",
    "generate",
    "list",
    "describe",
    "explain",
    "compare",
    "analyze",
    "analyse",
    "summarize",
    "summarise",
    "translate",
    "refactor",
    "classify",
    "design",
    "calculate",
    "extract",
    "convert",
    "validate",
    "test",
    "document",
    "outline",
    "draft",
    "review",
    "fix",
    "optimize",
    "return",
    "parse",
    "format",
    "rank",
];

const COMPLETENESS_INDICATORS: &[&str] = &[
    "input",
    "inputs",
    "output",
    "outputs",
    "step",
    "steps",
    "criteria",
    "criterion",
    "format",
    "requirement",
    "requirements",
    "constraint",
    "constraints",
    "deliverable",
    "deliverables",
    "success",
    "acceptance",
    "scope",
    "goal",
    "goals",
    "audience",
    "context",
];

const CODE_TERMS: &[&str] = &[
    "function",
    "class",
    "api",
    "endpoint",
    "module",
    "unit test",
    "interface",
    "database",
    "schema",
    "algorithm",
    "library",
    "framework",
    "runtime",
    "error handling",
    "async",
    "type",
    "struct",
    "repository",
];

const DOCS_TERMS: &[&str] = &[
    "documentation",
    "readme",
    "guide",
    "tutorial",
    "reference",
    "section",
    "heading",
    "audience",
    "changelog",
    "glossary",
    "table of contents",
];

const DATA_TERMS: &[&str] = &[
    "dataset",
    "csv",
    "column",
    "row",
    "table",
    "query",
    "sql",
    "aggregate",
    "pipeline",
    "metric",
    "visualization",
    "schema",
];

const PRODUCT_TERMS: &[&str] = &[
    "user story",
    "feature",
    "roadmap",
    "stakeholder",
    "requirement",
    "persona",
    "acceptance criteria",
    "mvp",
    "kpi",
    "launch",
    "customer",
];

const RESEARCH_TERMS: &[&str] = &[
    "hypothesis",
    "methodology",
    "literature",
    "citation",
    "study",
    "evidence",
    "findings",
    "sample size",
    "peer-reviewed",
    "experiment",
];

/// Build a case-insensitive, word-bounded alternation from a term list
fn term_regex(terms: &[&str]) -> Regex {
    let alternation = terms
        .iter()
        .map(|t| regex::escape(t).replace(' ', r"\s+"))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"(?i)\b(?:{})\b", alternation)).expect("term list regex")
}

fn regex(pattern: &str) -> Regex {
    Regex::new(pattern).expect("pattern library regex")
}

// =============================================================================
// Scoring Patterns
// =============================================================================

pub static VAGUE_RE: LazyLock<Regex> = LazyLock::new(|| term_regex(VAGUE_TERMS));

pub static CLARITY_INDICATOR_RE: LazyLock<Regex> =
    LazyLock::new(|| term_regex(CLARITY_INDICATORS));

pub static CONCRETE_VERB_RE: LazyLock<Regex> = LazyLock::new(|| term_regex(CONCRETE_VERBS));

pub static COMPLETENESS_INDICATOR_RE: LazyLock<Regex> =
    LazyLock::new(|| term_regex(COMPLETENESS_INDICATORS));

/// Numeric quantities with a unit, percentages, and bounded counts
pub static MEASUREMENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    regex(
        r"(?i)\b(?:at least|at most|no more than|no less than|up to|maximum of|minimum of|exactly)\s+\d+|\b\d+(?:\.\d+)?\s*(?:words?|characters?|chars|sentences?|paragraphs?|lines?|items?|bullets?|points?|steps?|examples?|pages?|columns?|rows?|seconds?|minutes?|hours?|days?|ms|kb|mb|gb)\b|\b\d+(?:\.\d+)?\s*%",
    )
});

/// A whole token that can open a list item or a heading
static MARKER_TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    regex(r"^(?:(?P<bullet>[-*•])|(?P<number>\d{1,3})[.)]|(?P<heading>#{1,6}))$")
});

pub static QUESTION_RE: LazyLock<Regex> = LazyLock::new(|| regex(r"\?"));

pub static SENTENCE_SPLIT_RE: LazyLock<Regex> = LazyLock::new(|| regex(r"[.!?]+"));

pub static EXAMPLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    regex(r"(?i)\b(?:examples?|for instance|for example|such as|sample)\b|\be\.g\.")
});

static CODE_TERM_RE: LazyLock<Regex> = LazyLock::new(|| term_regex(CODE_TERMS));
static DOCS_TERM_RE: LazyLock<Regex> = LazyLock::new(|| term_regex(DOCS_TERMS));
static DATA_TERM_RE: LazyLock<Regex> = LazyLock::new(|| term_regex(DATA_TERMS));
static PRODUCT_TERM_RE: LazyLock<Regex> = LazyLock::new(|| term_regex(PRODUCT_TERMS));
static RESEARCH_TERM_RE: LazyLock<Regex> = LazyLock::new(|| term_regex(RESEARCH_TERMS));

/// Terminology regex for a domain
pub fn domain_terms(domain: Domain) -> &'static Regex {
    match domain {
        Domain::Code => &CODE_TERM_RE,
        Domain::Docs => &DOCS_TERM_RE,
        Domain::Data => &DATA_TERM_RE,
        Domain::Product => &PRODUCT_TERM_RE,
        Domain::Research => &RESEARCH_TERM_RE,
    }
}

// =============================================================================
// Drafting Patterns
// =============================================================================

/// Intent rules in declaration order; the first match wins
const INTENT_RULES: &[(Intent, &str)] = &[
    (
        Intent::Refactor,
        r"(?i)\b(?:refactor\w*|restructure|clean\s+up|rewrite)\b",
    ),
    (
        Intent::Translate,
        r"(?i)\b(?:translat\w*|into\s+(?:english|spanish|french|german|japanese|korean|chinese|portuguese|italian))\b",
    ),
    (
        Intent::Summarize,
        r"(?i)\b(?:summari[sz]\w*|summary|tl;?dr|condense|recap)\b",
    ),
    (
        Intent::Compare,
        r"(?i)\b(?:compare|comparison|versus|vs|contrast|difference\s+between|pros\s+and\s+cons)\b",
    ),
    (
        Intent::Classify,
        r"(?i)\b(?:classify|classification|categori[sz]e|label|sort\s+into)\b",
    ),
    (
        Intent::Plan,
        r"(?i)\b(?:plan|roadmap|strategy|milestones?|timeline)\b",
    ),
    (
        Intent::GenerateCode,
        r"(?i)\b(?:create|build|implement|write|develop|generate|code|program)\b",
    ),
    (
        Intent::Analyze,
        r"(?i)\b(?:analy[sz]e|analysis|evaluate|assess|review|audit|investigate)\b",
    ),
    (
        Intent::Explain,
        r"(?i)\b(?:explain|describe|clarify|teach|what\s+is|how\s+does|why\s+does)\b",
    ),
];

pub static INTENT_RES: LazyLock<Vec<(Intent, Regex)>> = LazyLock::new(|| {
    INTENT_RULES
        .iter()
        .map(|(intent, pattern)| (*intent, regex(pattern)))
        .collect()
});

/// Output section cues in the fixed order sections are appended
const SECTION_CUES: &[(&str, &str)] = &[
    (
        "Overview",
        r"(?i)\b(?:overview|summary|summari[sz]e|introduction|intro)\b",
    ),
    (
        "Details",
        r"(?i)\b(?:details?|steps?|step-by-step|instructions|walkthrough|how\s+to)\b",
    ),
    (
        "NextSteps",
        r"(?i)\b(?:next\s+steps?|conclusion|recommendations?|follow[-\s]?up|action\s+items)\b",
    ),
    (
        "Examples",
        r"(?i)\b(?:examples?|for\s+instance|sample)\b|\be\.g\.",
    ),
];

pub static SECTION_RES: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    SECTION_CUES
        .iter()
        .map(|(name, pattern)| (*name, regex(pattern)))
        .collect()
});

/// Explicit output-format cues; markdown is the fallback
const FORMAT_CUES: &[(OutputFormat, &str)] = &[
    (OutputFormat::Json, r"(?i)\bjson\b"),
    (OutputFormat::Csv, r"(?i)\bcsv\b|\bcomma[-\s]separated\b"),
    (OutputFormat::Text, r"(?i)\bplain[-\s]?text\b|\btext\s+only\b"),
    (OutputFormat::Markdown, r"(?i)\bmarkdown\b"),
];

pub static FORMAT_RES: LazyLock<Vec<(OutputFormat, Regex)>> = LazyLock::new(|| {
    FORMAT_CUES
        .iter()
        .map(|(format, pattern)| (*format, regex(pattern)))
        .collect()
});

/// "N words" word limit, capturing N
pub static WORD_LIMIT_RE: LazyLock<Regex> = LazyLock::new(|| regex(r"(?i)\b(\d+)\s+words?\b"));

/// Lines that forbid something become constraints
pub static PROHIBITION_RE: LazyLock<Regex> = LazyLock::new(|| {
    regex(r"(?i)\b(?:do\s+not|don't|must\s+not|never|avoid|without)\b")
});

pub static URL_RE: LazyLock<Regex> =
    LazyLock::new(|| regex(r#"https?://[^\s<>"'`)\]]+"#));

pub static FILE_PATH_RE: LazyLock<Regex> = LazyLock::new(|| {
    regex(
        r"(?i)\b((?:[\w.-]+/)*[\w-]+\.(?:rs|py|ts|tsx|js|jsx|json|csv|md|txt|ya?ml|toml|sql|html|css|go|java|rb|cpp|xml|pdf))\b",
    )
});

/// Fenced code blocks, capturing the body
pub static FENCED_BLOCK_RE: LazyLock<Regex> =
    LazyLock::new(|| regex(r"(?s)```[^\n]*\n(.*?)```"));

// =============================================================================
// Helpers
// =============================================================================

/// Number of non-overlapping matches
pub fn count_matches(re: &Regex, text: &str) -> usize {
    re.find_iter(text).count()
}

/// Markers that form a real list or heading.
///
/// Scored text has its lines joined, so markers are read from whitespace
/// tokens: a bullet glyph counts once it repeats, numbered items count once
/// an ascending run from 1 reaches two items, and heading hashes always
/// count. A lone dash or a sentence ending in a number is prose. Appending
/// words to a text never adds a marker.
pub fn structure_markers(text: &str) -> usize {
    let mut bullets: HashMap<&str, usize> = HashMap::new();
    let mut next_number = 1u32;
    let mut headings = 0;

    for token in text.split_whitespace() {
        let Some(caps) = MARKER_TOKEN_RE.captures(token) else {
            continue;
        };
        if let Some(glyph) = caps.name("bullet") {
            *bullets.entry(glyph.as_str()).or_default() += 1;
        } else if let Some(number) = caps.name("number") {
            if number.as_str().parse::<u32>().ok() == Some(next_number) {
                next_number += 1;
            }
        } else {
            headings += 1;
        }
    }

    let listed: usize = bullets.values().filter(|&&n| n >= 2).sum();
    let items = next_number as usize - 1;
    let numbered = if items >= 2 { items } else { 0 };
    listed + numbered + headings
}

/// Whitespace-delimited word count
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}
