//! Session-scoped cache key derivation.
//!
//! Keys follow `ptit:{session_id}:{api_type}[:{params_hash}]`. The hash
//! covers the request parameters sorted by name, so the same logical
//! request always derives the same key regardless of the order the
//! parameters were supplied in.

use std::collections::BTreeMap;
use std::fmt;

/// Namespace prefix shared by every key this engine writes.
pub const KEY_NAMESPACE: &str = "ptit";

/// Length of the hex digest appended for parameterized requests.
const PARAMS_HASH_LEN: usize = 8;

/// The upstream API a cache entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiType {
    Schedule,
    Exams,
    CurrentSemester,
}

impl ApiType {
    pub fn as_str(self) -> &'static str {
        match self {
            ApiType::Schedule => "schedule",
            ApiType::Exams => "exams",
            ApiType::CurrentSemester => "current_semester",
        }
    }
}

impl fmt::Display for ApiType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Named request parameters feeding the key digest.
///
/// Backed by a `BTreeMap` so iteration is always name-sorted; insertion
/// order cannot leak into the derived key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheParams(BTreeMap<String, String>);

impl CacheParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a parameter, replacing any previous value under the name.
    pub fn with(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.0.insert(name.into(), value.to_string());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Name-sorted `name=value` pairs joined by `&`, the digest input.
    fn canonical(&self) -> String {
        self.0
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect::<Vec<_>>()
            .join("&")
    }
}

/// Digests parameters into the 8-character key suffix.
pub fn params_hash(params: &CacheParams) -> String {
    let digest = blake3::hash(params.canonical().as_bytes());
    digest.to_hex()[..PARAMS_HASH_LEN].to_string()
}

/// Derives the cache key for one API request in one session.
pub fn api_key(session_id: &str, api_type: ApiType, params: &CacheParams) -> String {
    let base = format!("{KEY_NAMESPACE}:{session_id}:{api_type}");
    if params.is_empty() {
        base
    } else {
        format!("{base}:{}", params_hash(params))
    }
}

/// Prefix under which every key of a session lives; scanning it yields
/// the keys removed by bulk session invalidation.
pub fn session_prefix(session_id: &str) -> String {
    format!("{KEY_NAMESPACE}:{session_id}:")
}
