//! Conversation session identity.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Explicit session context passed to every cache and aggregation call.
///
/// Carrying the session id as a value, rather than recovering it from
/// shared state, keeps the cache namespace a session touches auditable at
/// every call site.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionContext {
    id: String,
}

impl SessionContext {
    /// Creates a context with a freshly generated session id.
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
        }
    }

    /// Wraps an existing conversation session id.
    pub fn from_id(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}
