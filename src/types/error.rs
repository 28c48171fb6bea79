//! Unified Error Type System
//!
//! Centralized error types for the entire application.
//!
//! ## Error Families
//!
//! - **Input**: prompt or domain rejected before the pipeline runs. Carries a
//!   machine-readable code, a human message and a suggested fix.
//! - **Component**: a pipeline step faulted. Never surfaced to callers of the
//!   analyzer; the step's baseline result is substituted and the fault logged.
//! - **System**: IO, serialization and configuration failures at the edges.

use serde::Serialize;
use thiserror::Error;

// =============================================================================
// Input Error Codes
// =============================================================================

/// Machine-readable codes for rejected input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InputErrorCode {
    /// Prompt is empty or below the minimum length
    PromptTooShort,
    /// Prompt exceeds the maximum length
    PromptTooLong,
    /// Domain is not one of the supported values
    InvalidDomain,
}

impl std::fmt::Display for InputErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PromptTooShort => write!(f, "PROMPT_TOO_SHORT"),
            Self::PromptTooLong => write!(f, "PROMPT_TOO_LONG"),
            Self::InvalidDomain => write!(f, "INVALID_DOMAIN"),
        }
    }
}

// =============================================================================
// Input Error
// =============================================================================

/// Structured input rejection: what failed, why, and how to fix it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InputError {
    pub code: InputErrorCode,
    /// Field that failed validation
    pub field: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl std::fmt::Display for InputError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}: {}", self.code, self.field, self.message)?;
        if let Some(suggestion) = &self.suggestion {
            write!(f, " ({})", suggestion)?;
        }
        Ok(())
    }
}

impl std::error::Error for InputError {}

impl InputError {
    pub fn new(code: InputErrorCode, field: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            field,
            message: message.into(),
            suggestion: None,
        }
    }

    /// Attach a suggested fix
    pub fn suggest(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    pub fn too_short(len: usize, min: usize) -> Self {
        Self::new(
            InputErrorCode::PromptTooShort,
            "prompt",
            format!("prompt has {} characters, minimum is {}", len, min),
        )
        .suggest("Describe the task you want performed in at least a few words")
    }

    /// Nothing to analyze: no argument and stdin is a terminal
    pub fn missing_prompt() -> Self {
        Self::new(InputErrorCode::PromptTooShort, "prompt", "no prompt given")
            .suggest("Pass the prompt as an argument or pipe it on stdin")
    }

    pub fn too_long(len: usize, max: usize) -> Self {
        Self::new(
            InputErrorCode::PromptTooLong,
            "prompt",
            format!("prompt has {} characters, maximum is {}", len, max),
        )
        .suggest("Split the prompt into smaller tasks or remove pasted material")
    }

    pub fn invalid_domain(value: &str) -> Self {
        Self::new(
            InputErrorCode::InvalidDomain,
            "domain",
            format!("unknown domain '{}'", value),
        )
        .suggest("Use one of: code, docs, data, product, research")
    }
}

// =============================================================================
// Application Error
// =============================================================================

#[derive(Debug, Error)]
pub enum PromptSpecError {
    // -------------------------------------------------------------------------
    // System Errors (auto From impl)
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    // -------------------------------------------------------------------------
    // Domain Errors
    // -------------------------------------------------------------------------
    #[error("Invalid input {0}")]
    Input(InputError),

    /// A pipeline component faulted; callers of the analyzer never see this
    #[error("Component '{component}' failed: {message}")]
    Component {
        component: &'static str,
        message: String,
    },

    #[error("Config error: {0}")]
    Config(String),
}

impl From<InputError> for PromptSpecError {
    fn from(err: InputError) -> Self {
        PromptSpecError::Input(err)
    }
}

pub type Result<T> = std::result::Result<T, PromptSpecError>;

impl PromptSpecError {
    /// Create a component fault
    pub fn component(component: &'static str, message: impl Into<String>) -> Self {
        Self::Component {
            component,
            message: message.into(),
        }
    }

    /// Input error code, if this is an input rejection
    pub fn input_code(&self) -> Option<InputErrorCode> {
        match self {
            Self::Input(e) => Some(e.code),
            _ => None,
        }
    }
}

/// Context extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn with_context<C: Into<String>>(self, context: C) -> Result<T>;
}

impl<T, E: std::error::Error + Send + Sync + 'static> ResultExt<T> for std::result::Result<T, E> {
    fn with_context<C: Into<String>>(self, context: C) -> Result<T> {
        self.map_err(|e| PromptSpecError::Config(format!("{}: {}", context.into(), e)))
    }
}

// =============================================================================
// Tests
// =============================================================================
