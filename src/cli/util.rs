//! CLI Common Utilities
//!
//! Shared input handling and context loading for CLI commands.

use serde::Serialize;
use std::io::{IsTerminal, Read};
use std::path::Path;

use crate::analysis::Analyzer;
use crate::config::{Config, ConfigLoader};
use crate::types::{InputError, PromptSpecError, Result};

/// How a command prints its result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
    Yaml,
}

impl std::str::FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(ReportFormat::Text),
            "json" => Ok(ReportFormat::Json),
            "yaml" => Ok(ReportFormat::Yaml),
            _ => Err(format!(
                "Invalid format '{}'. Valid values: text, json, yaml",
                s
            )),
        }
    }
}

/// Serialize a value in a machine format; `None` for text
pub fn serialize<T: serde::Serialize>(value: &T, format: ReportFormat) -> Result<Option<String>> {
    match format {
        ReportFormat::Text => Ok(None),
        ReportFormat::Json => Ok(Some(serde_json::to_string_pretty(value)?)),
        ReportFormat::Yaml => Ok(Some(serde_yaml::to_string(value)?)),
    }
}

#[derive(Serialize)]
struct Rejection<'a> {
    error: &'a InputError,
}

/// An input rejection as `{"error": {code, field, message, suggestion}}` in
/// a machine format; `None` for text output or any other error
pub fn rejection(err: &PromptSpecError, format: ReportFormat) -> Result<Option<String>> {
    match err {
        PromptSpecError::Input(error) => serialize(&Rejection { error }, format),
        _ => Ok(None),
    }
}

/// Command execution context
pub struct CommandContext {
    pub config: Config,
    pub analyzer: Analyzer,
}

impl CommandContext {
    /// Load configuration (an explicit file wins over the layered chain)
    /// and build the analyzer from it
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let config = match config_path {
            Some(path) => ConfigLoader::load_from_file(path)?,
            None => ConfigLoader::load()?,
        };
        let analyzer = Analyzer::from_config(&config)?;
        Ok(Self { config, analyzer })
    }
}

/// Prompt from the argument, or from stdin when absent or `-`
pub fn read_prompt(arg: Option<String>) -> Result<String> {
    match arg {
        Some(text) if text != "-" => Ok(text),
        _ => {
            let mut stdin = std::io::stdin();
            if stdin.is_terminal() {
                return Err(InputError::missing_prompt().into());
            }
            let mut buf = String::new();
            stdin.read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

/// Non-blank lines of a batch file, one prompt each
pub fn read_batch_file(path: &Path) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path)?;
    Ok(parse_batch(&content))
}

fn parse_batch(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_format_parse() {
        assert_eq!("JSON".parse::<ReportFormat>().unwrap(), ReportFormat::Json);
        assert_eq!("yaml".parse::<ReportFormat>().unwrap(), ReportFormat::Yaml);
        assert!("xml".parse::<ReportFormat>().is_err());
    }

    #[test]
    fn test_batch_skips_blank_and_comment_lines() {
        let prompts = parse_batch("# prompts\nExplain tides\n\n  Compare A and B  \n");
        assert_eq!(prompts, vec!["Explain tides", "Compare A and B"]);
    }

    #[test]
    fn test_text_format_serializes_nothing() {
        let value = serde_json::json!({ "a": 1 });
        assert!(serialize(&value, ReportFormat::Text).unwrap().is_none());
        let yaml = serialize(&value, ReportFormat::Yaml).unwrap().unwrap();
        assert!(yaml.contains("a: 1"));
    }

    #[test]
    fn test_rejection_serialized_for_machine_formats() {
        let err: PromptSpecError = InputError::too_short(2, 5).into();
        let json = rejection(&err, ReportFormat::Json).unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["error"]["code"], "PROMPT_TOO_SHORT");
        assert_eq!(value["error"]["field"], "prompt");

        let yaml = rejection(&err, ReportFormat::Yaml).unwrap().unwrap();
        assert!(yaml.contains("code: PROMPT_TOO_SHORT"));

        assert!(rejection(&err, ReportFormat::Text).unwrap().is_none());
        let other = PromptSpecError::Config("bad".to_string());
        assert!(rejection(&other, ReportFormat::Json).unwrap().is_none());
    }

    #[test]
    fn test_missing_prompt_is_an_input_error() {
        let err: PromptSpecError = InputError::missing_prompt().into();
        assert_eq!(err.input_code(), Some(crate::types::InputErrorCode::PromptTooShort));
    }

    #[test]
    fn test_batch_file_roundtrip() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("prompts.txt");
        std::fs::write(&path, "one\ntwo\n").unwrap();
        assert_eq!(read_batch_file(&path).unwrap(), vec!["one", "two"]);
    }
}
