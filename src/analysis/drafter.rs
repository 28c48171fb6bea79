//! Spec Drafter
//!
//! Converts raw prompt text into a [`Specification`]. Lines are trimmed and
//! joined into a normalized text that drives intent, section and format
//! detection. Completeness is scored last, after every structural field is
//! populated.

use tracing::debug;
use url::Url;

use super::patterns::{
    FENCED_BLOCK_RE, FILE_PATH_RE, FORMAT_RES, INTENT_RES, PROHIBITION_RE, SECTION_RES,
    SENTENCE_SPLIT_RE, URL_RE, WORD_LIMIT_RE,
};
use super::scoring::{ScoringConfig, clarity, completeness};
use crate::constants::drafting::MAX_TITLE_LENGTH;
use crate::types::{
    Domain, InputKind, InputRef, Intent, Metrics, OutputContract, OutputFormat, SpecContext,
    SpecIo, Specification, SPEC_VERSION,
};

/// Draft a specification from prompt text
pub fn draft(text: &str, domain: Option<Domain>, config: &ScoringConfig) -> Specification {
    let lines = split_lines(text);
    let normalized = lines.join(" ");

    let instructions = if lines.is_empty() {
        vec![normalized.clone()]
    } else {
        lines.clone()
    };

    let mut spec = Specification {
        version: SPEC_VERSION.to_string(),
        intent: infer_intent(&normalized),
        title: derive_title(&lines, &normalized),
        context: SpecContext {
            domain,
            inputs: detect_inputs(text),
        },
        instructions,
        constraints: extract_constraints(&lines, &normalized),
        io: SpecIo {
            format: Some(detect_format(&normalized)),
            contract: OutputContract {
                sections: detect_sections(&normalized),
            },
        },
        metrics: None,
    };

    let clarity = clarity(&normalized, domain, &config.clarity);
    let completeness = completeness(&normalized, &spec, &config.completeness);
    spec.metrics = Some(Metrics {
        clarity,
        completeness,
    });

    debug!(
        intent = %spec.intent,
        instructions = spec.instructions.len(),
        constraints = spec.constraints.len(),
        sections = spec.io.contract.sections.len(),
        clarity,
        completeness,
        "drafted specification"
    );

    spec
}

/// Trimmed, non-empty lines
pub fn split_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(String::from)
        .collect()
}

/// First matching rule in declaration order, else `General`
pub fn infer_intent(normalized: &str) -> Intent {
    INTENT_RES
        .iter()
        .find(|(_, re)| re.is_match(normalized))
        .map(|(intent, _)| *intent)
        .unwrap_or_default()
}

fn derive_title(lines: &[String], normalized: &str) -> Option<String> {
    let source = match lines.first() {
        Some(line) => line.as_str(),
        None => SENTENCE_SPLIT_RE.split(normalized).next().unwrap_or(""),
    };
    let title: String = source.trim().chars().take(MAX_TITLE_LENGTH).collect();
    let title = title.trim_end().to_string();
    (!title.is_empty()).then_some(title)
}

/// Word limit first, then prohibition lines in order, without duplicates
fn extract_constraints(lines: &[String], normalized: &str) -> Vec<String> {
    let mut constraints = Vec::new();

    if let Some(limit) = WORD_LIMIT_RE
        .captures(normalized)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse::<u32>().ok())
    {
        constraints.push(format!("Keep the response within {} words", limit));
    }

    for line in lines {
        if PROHIBITION_RE.is_match(line) && !constraints.contains(line) {
            constraints.push(line.clone());
        }
    }

    constraints
}

fn detect_sections(normalized: &str) -> Vec<String> {
    let mut sections: Vec<String> = Vec::new();
    for (name, re) in SECTION_RES.iter() {
        if re.is_match(normalized) && !sections.iter().any(|s| s == name) {
            sections.push(name.to_string());
        }
    }
    sections
}

fn detect_format(normalized: &str) -> OutputFormat {
    FORMAT_RES
        .iter()
        .find(|(_, re)| re.is_match(normalized))
        .map(|(format, _)| *format)
        .unwrap_or_default()
}

/// URLs, file paths outside URLs, and fenced blocks, in that order
fn detect_inputs(text: &str) -> Vec<InputRef> {
    let mut inputs: Vec<InputRef> = Vec::new();
    let mut push = |input: InputRef| {
        if !inputs.contains(&input) {
            inputs.push(input);
        }
    };

    let without_blocks = FENCED_BLOCK_RE.replace_all(text, " ");
    for m in URL_RE.find_iter(&without_blocks) {
        let candidate = m.as_str().trim_end_matches(['.', ',', ';', ':']);
        if Url::parse(candidate).is_ok() {
            push(InputRef::new(InputKind::Url, candidate));
        }
    }

    let without_urls = URL_RE.replace_all(&without_blocks, " ");
    for caps in FILE_PATH_RE.captures_iter(&without_urls) {
        if let Some(path) = caps.get(1) {
            push(InputRef::new(InputKind::File, path.as_str()));
        }
    }

    for caps in FENCED_BLOCK_RE.captures_iter(text) {
        if let Some(body) = caps.get(1) {
            let body = body.as_str().trim();
            if !body.is_empty() {
                push(InputRef::new(InputKind::Text, body));
            }
        }
    }

    inputs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::scoring::ScoringSettings;

    fn config() -> ScoringConfig {
        ScoringSettings::default().resolve(None)
    }

    #[test]
    fn test_create_user_authentication() {
        let spec = draft("create user authentication", None, &config());
        assert_eq!(spec.intent, Intent::GenerateCode);
        assert_eq!(spec.instructions, vec!["create user authentication"]);
        assert_eq!(spec.io.format, Some(OutputFormat::Markdown));
        assert_eq!(spec.title.as_deref(), Some("create user authentication"));
        assert!(spec.context.domain.is_none());
        assert!(spec.constraints.is_empty());
        assert!(spec.metrics.is_some());
    }

    #[test]
    fn test_intent_first_match_wins() {
        // "summary" (summarize) is declared before "write" (generate_code)
        assert_eq!(infer_intent("write a summary of the meeting"), Intent::Summarize);
        assert_eq!(infer_intent("refactor and then explain"), Intent::Refactor);
        assert_eq!(infer_intent("explain how tides work"), Intent::Explain);
        assert_eq!(infer_intent("hello there"), Intent::General);
    }

    #[test]
    fn test_lines_become_instructions() {
        let text = "Build a REST API\n\n  - list users  \n- delete users\n";
        let spec = draft(text, Some(Domain::Code), &config());
        assert_eq!(
            spec.instructions,
            vec!["Build a REST API", "- list users", "- delete users"]
        );
        assert_eq!(spec.title.as_deref(), Some("Build a REST API"));
        assert_eq!(spec.context.domain, Some(Domain::Code));
    }

    #[test]
    fn test_title_truncated() {
        let long = "a".repeat(200);
        let spec = draft(&long, None, &config());
        assert_eq!(spec.title.map(|t| t.chars().count()), Some(MAX_TITLE_LENGTH));
    }

    #[test]
    fn test_word_limit_constraint() {
        let spec = draft("Summarize this article in 150 words", None, &config());
        assert_eq!(spec.constraints, vec!["Keep the response within 150 words"]);
    }

    #[test]
    fn test_prohibition_lines_become_constraints() {
        let text = "Write release notes\nDo not mention internal ticket numbers\nAvoid jargon";
        let spec = draft(text, None, &config());
        assert_eq!(
            spec.constraints,
            vec!["Do not mention internal ticket numbers", "Avoid jargon"]
        );
    }

    #[test]
    fn test_sections_in_fixed_order_without_duplicates() {
        let spec = draft(
            "Give examples first, then an overview, the details and next steps. More examples.",
            None,
            &config(),
        );
        assert_eq!(
            spec.io.contract.sections,
            vec!["Overview", "Details", "NextSteps", "Examples"]
        );
    }

    #[test]
    fn test_format_detection() {
        assert_eq!(detect_format("return the result as JSON"), OutputFormat::Json);
        assert_eq!(detect_format("export a csv file"), OutputFormat::Csv);
        assert_eq!(detect_format("answer in plain text"), OutputFormat::Text);
        assert_eq!(detect_format("just answer"), OutputFormat::Markdown);
    }

    #[test]
    fn test_input_detection() {
        let text = "Review src/main.rs and https://example.com/spec.json.\n```\nfn main() {}\n```";
        let inputs = detect_inputs(text);
        assert_eq!(
            inputs,
            vec![
                InputRef::new(InputKind::Url, "https://example.com/spec.json"),
                InputRef::new(InputKind::File, "src/main.rs"),
                InputRef::new(InputKind::Text, "fn main() {}"),
            ]
        );
    }

    #[test]
    fn test_draft_is_idempotent() {
        let text = "Compare Rust and Go for CLI tools.\nUse a table. Include examples.";
        assert_eq!(
            draft(text, Some(Domain::Code), &config()),
            draft(text, Some(Domain::Code), &config())
        );
    }

    #[test]
    fn test_metrics_match_scoring_engine() {
        let text = "Explain ownership in Rust\nMust cover borrowing, for example with slices";
        let cfg = config();
        let spec = draft(text, None, &cfg);
        let normalized = split_lines(text).join(" ");
        let metrics = spec.metrics.unwrap();
        assert_eq!(metrics.clarity, clarity(&normalized, None, &cfg.clarity));
        let mut unscored = spec.clone();
        unscored.metrics = None;
        assert_eq!(
            metrics.completeness,
            completeness(&normalized, &unscored, &cfg.completeness)
        );
    }
}
