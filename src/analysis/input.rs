//! Input validation ahead of the pipeline

use crate::config::InputLimits;
use crate::constants::improvement::DEFAULT_DOMAIN;
use crate::types::{Domain, InputError};

/// Check prompt length (characters, after trimming) against the limits
pub fn validate_prompt(prompt: &str, limits: &InputLimits) -> Result<(), InputError> {
    let len = prompt.trim().chars().count();
    if len < limits.min_prompt_length.max(1) {
        return Err(InputError::too_short(len, limits.min_prompt_length.max(1)));
    }
    if len > limits.max_prompt_length {
        return Err(InputError::too_long(len, limits.max_prompt_length));
    }
    Ok(())
}

/// Parse an optional domain string; blank and "general" mean no domain
pub fn parse_domain(value: Option<&str>) -> Result<Option<Domain>, InputError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) if v.eq_ignore_ascii_case(DEFAULT_DOMAIN) => Ok(None),
        Some(v) => v
            .parse::<Domain>()
            .map(Some)
            .map_err(|_| InputError::invalid_domain(v)),
    }
}
