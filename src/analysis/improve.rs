//! Improvement Generator
//!
//! Turns gap findings into proposed patches. Rules are independent and each
//! targets its own path, so the output never contains two patches for the
//! same location. Patches are proposals only; nothing here applies them.

use serde_json::{Value, json};

use super::scoring::CompletenessConfig;
use crate::constants::improvement::{
    DEFAULT_DOMAIN, DEFAULT_SECTIONS, PLACEHOLDER_TITLE, QUALITY_DIRECTIVES,
};
use crate::types::{Domain, Issue, Patch, Severity, Specification};

/// Propose patches for a specification in fixed rule order
pub fn propose(
    spec: &Specification,
    issues: &[Issue],
    caller_domain: Option<Domain>,
    config: &CompletenessConfig,
) -> Vec<Patch> {
    [
        sections_patch(issues),
        title_patch(spec, config),
        domain_patch(spec, caller_domain),
        instructions_patch(spec, config),
    ]
    .into_iter()
    .flatten()
    .collect()
}

fn sections_patch(issues: &[Issue]) -> Option<Patch> {
    let flagged = issues
        .iter()
        .any(|i| i.path == "/io/contract/sections" && i.severity == Severity::Warn);
    flagged.then(|| Patch::add("/io/contract", json!({ "sections": DEFAULT_SECTIONS })))
}

fn title_patch(spec: &Specification, config: &CompletenessConfig) -> Option<Patch> {
    match spec.title.as_deref() {
        None => Some(Patch::add("/title", json!(PLACEHOLDER_TITLE))),
        Some(title) if title.trim().chars().count() < config.title_min_length => {
            Some(Patch::replace("/title", json!(PLACEHOLDER_TITLE)))
        }
        Some(_) => None,
    }
}

fn domain_patch(spec: &Specification, caller_domain: Option<Domain>) -> Option<Patch> {
    if spec.context.domain.is_some() {
        return None;
    }
    let value = caller_domain.map_or(DEFAULT_DOMAIN, |d| d.as_str());
    Some(Patch::add("/context/domain", json!(value)))
}

fn instructions_patch(spec: &Specification, config: &CompletenessConfig) -> Option<Patch> {
    if spec.instruction_word_count() >= config.min_depth_words() {
        return None;
    }
    let mut expanded = spec.instructions.clone();
    expanded.extend(QUALITY_DIRECTIVES.iter().map(|d| d.to_string()));
    Some(Patch::replace("/instructions", json!(expanded)))
}

// =============================================================================
// Display
// =============================================================================

/// Prompt text with the proposed patches folded in, for display
pub fn improved_prompt(spec: &Specification, patches: &[Patch]) -> String {
    let patched = |path: &str| -> Option<&Value> {
        patches
            .iter()
            .find(|p| p.path == path)
            .and_then(|p| p.value.as_ref())
    };

    let title = patched("/title")
        .and_then(Value::as_str)
        .map(String::from)
        .or_else(|| spec.title.clone());

    let domain = patched("/context/domain")
        .and_then(Value::as_str)
        .map(String::from)
        .or_else(|| spec.context.domain.map(|d| d.to_string()));

    let instructions: Vec<String> = patched("/instructions")
        .and_then(string_list)
        .unwrap_or_else(|| spec.instructions.clone());

    let sections: Vec<String> = patched("/io/contract")
        .and_then(|v| v.get("sections"))
        .and_then(string_list)
        .unwrap_or_else(|| spec.io.contract.sections.clone());

    let mut out = Vec::new();
    if let Some(title) = title {
        out.push(format!("# {}", title));
    }
    if let Some(domain) = domain {
        out.push(format!("Domain: {}", domain));
    }
    out.push(String::new());
    out.extend(instructions);

    if !spec.constraints.is_empty() {
        out.push(String::new());
        out.push("Constraints:".to_string());
        out.extend(spec.constraints.iter().map(|c| format!("- {}", c)));
    }

    if let Some(format) = spec.io.format {
        out.push(String::new());
        if sections.is_empty() {
            out.push(format!("Respond in {}.", format));
        } else {
            out.push(format!(
                "Respond in {} with sections: {}.",
                format,
                sections.join(", ")
            ));
        }
    }

    out.join("\n").trim().to_string()
}

fn string_list(value: &Value) -> Option<Vec<String>> {
    value.as_array().map(|items| {
        items
            .iter()
            .filter_map(Value::as_str)
            .map(String::from)
            .collect()
    })
}
