//! Cache key derivation

use serde::Serialize;
use serde_json::{Value, json};
use sha2::{Digest, Sha256};

use crate::types::Domain;

/// Hex SHA-256 of a JSON value's serialized form
pub fn digest_key(value: &Value) -> String {
    let bytes = serde_json::to_vec(value).unwrap_or_default();
    format!("{:x}", Sha256::digest(&bytes))
}

/// Key for one analysis request: prompt, domain and options together
pub fn cache_key<O: Serialize>(prompt: &str, domain: Option<Domain>, options: &O) -> String {
    let options = serde_json::to_value(options).unwrap_or(Value::Null);
    digest_key(&json!({
        "prompt": prompt,
        "domain": domain.map(|d| d.as_str()),
        "options": options,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Opts {
        validate: bool,
    }

    #[test]
    fn test_key_is_hex_sha256() {
        let key = cache_key("hello", None, &Opts { validate: true });
        assert_eq!(key.len(), 64);
        assert!(key.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_every_input_changes_key() {
        let base = cache_key("hello", None, &Opts { validate: true });
        assert_eq!(base, cache_key("hello", None, &Opts { validate: true }));
        assert_ne!(base, cache_key("hello!", None, &Opts { validate: true }));
        assert_ne!(base, cache_key("hello", Some(Domain::Code), &Opts { validate: true }));
        assert_ne!(base, cache_key("hello", None, &Opts { validate: false }));
    }
}
