//! Request signing for the provider's upload API.
//!
//! Signature = hex(SHA-1(`k1=v1&k2=v2...` + api_secret)) over the parameters sorted by
//! name. `file`, `api_key`, `resource_type`, `cloud_name` and empty values are not signed.

use sha1::{Digest, Sha1};
use std::collections::BTreeMap;

const UNSIGNED_PARAMS: [&str; 5] = ["file", "api_key", "resource_type", "cloud_name", "signature"];

/// Build the string-to-sign from a parameter map.
pub(crate) fn string_to_sign(params: &BTreeMap<&str, String>) -> String {
    params
        .iter()
        .filter(|(key, value)| !UNSIGNED_PARAMS.contains(*key) && !value.is_empty())
        .map(|(key, value)| format!("{}={}", key, value))
        .collect::<Vec<_>>()
        .join("&")
}

pub(crate) fn sign_params(params: &BTreeMap<&str, String>, api_secret: &str) -> String {
    let mut hasher = Sha1::new();
    hasher.update(string_to_sign(params).as_bytes());
    hasher.update(api_secret.as_bytes());
    hex::encode(hasher.finalize())
}

/// Escape a value for the `key=value|key=value` context parameter.
pub(crate) fn escape_context_value(value: &str) -> String {
    value.replace('\\', "\\\\").replace('=', "\\=").replace('|', "\\|")
}
